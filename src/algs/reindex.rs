//! Region-local reindexing of triangle connectivity.
//!
//! A region's triangles reference vertices of the file-wide table. The
//! reduced mesh keeps only the referenced vertices, numbered by their rank in
//! ascending global order, which is also the order field samples are stored
//! in on disk.

use crate::data::mesh::ReducedMesh;
use crate::mesh_error::TcadMeshError;
use crate::topology::elements::Triangle;
use itertools::Itertools;

/// Compact `triangles` against `global_vertices`.
///
/// Distinct global indices are ranked in ascending order; rank `i` becomes
/// local vertex `i`. Triangle order and corner order are preserved. The
/// result is a pure function of the inputs.
///
/// Empty `triangles` give an empty mesh. An index past the end of
/// `global_vertices` fails with [`TcadMeshError::IndexOutOfRange`].
pub fn reindex(
    triangles: &[Triangle],
    global_vertices: &[[f64; 2]],
) -> Result<ReducedMesh, TcadMeshError> {
    let flat: Vec<usize> = triangles.iter().flatten().copied().collect();

    // sort positions by global index, then rank runs of equal indices
    let mut order: Vec<usize> = (0..flat.len()).collect();
    order.sort_unstable_by_key(|&pos| flat[pos]);

    let mut local_of = vec![0usize; flat.len()];
    let mut local_to_global = Vec::new();
    let runs = order.iter().chunk_by(|&&pos| flat[pos]);
    for (rank, (global, positions)) in (&runs).into_iter().enumerate() {
        local_to_global.push(global);
        for &pos in positions {
            local_of[pos] = rank;
        }
    }

    if let Some(&max) = local_to_global.last() {
        if max >= global_vertices.len() {
            return Err(TcadMeshError::IndexOutOfRange {
                index: max,
                len: global_vertices.len(),
            });
        }
    }

    let vertices = local_to_global.iter().map(|&g| global_vertices[g]).collect();
    let triangles = local_of
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();

    Ok(ReducedMesh {
        vertices,
        triangles,
        local_to_global,
    })
}
