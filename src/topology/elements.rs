//! Decoding of packed TDR connectivity blocks.
//!
//! A 2D region stores its elements as one flat integer array of fixed-size
//! records `[tag, v0, v1, v2]`, e.g. `[2, 275, 278, 276, 2, 276, 283, 281, ...]`,
//! where `tag` is the element kind and `v*` are global vertex indices.

use crate::mesh_error::TcadMeshError;
use crate::topology::cell_type::CellType;

/// Number of integers per connectivity record.
pub const RECORD_STRIDE: usize = 4;

/// Three global (or, after reindexing, local) vertex indices.
pub type Triangle = [usize; 3];

/// Decode a raw connectivity block into triangles, preserving record order.
///
/// Fails with [`TcadMeshError::MalformedConnectivity`] if the block length is
/// not a multiple of [`RECORD_STRIDE`], and with
/// [`TcadMeshError::UnsupportedElementType`] on the first record whose tag is
/// not the triangle tag.
pub fn decode_elements(raw: &[i64]) -> Result<Vec<Triangle>, TcadMeshError> {
    if raw.len() % RECORD_STRIDE != 0 {
        return Err(TcadMeshError::MalformedConnectivity { len: raw.len() });
    }

    // all tags are checked before any index so a mixed block reports the
    // element type rather than whatever its foreign record happens to hold
    if let Some((record, chunk)) = raw
        .chunks_exact(RECORD_STRIDE)
        .enumerate()
        .find(|(_, chunk)| chunk[0] != CellType::TRIANGLE_TAG)
    {
        return Err(TcadMeshError::UnsupportedElementType {
            record,
            tag: chunk[0],
        });
    }

    raw.chunks_exact(RECORD_STRIDE)
        .enumerate()
        .map(|(record, chunk)| -> Result<Triangle, TcadMeshError> {
            let mut tri = [0usize; 3];
            for (slot, &value) in tri.iter_mut().zip(&chunk[1..]) {
                *slot = usize::try_from(value)
                    .map_err(|_| TcadMeshError::NegativeIndex { record, value })?;
            }
            Ok(tri)
        })
        .collect()
}
