//! Rectangular cropping and axis cutlines over reduced meshes.

use crate::algs::reindex::reindex;
use crate::data::mesh::{ReducedMesh, RegionFieldData};
use crate::geometry::bounds::{Axis, AxisRange};
use crate::mesh_error::TcadMeshError;
use crate::topology::elements::Triangle;
use serde::Serialize;

/// A mesh together with the triangles kept by a crop.
///
/// Vertices are not touched; `mask[t]` tells whether triangle `t` survived.
#[derive(Clone, Debug)]
pub struct CroppedMesh<'a> {
    mesh: &'a ReducedMesh,
    mask: Vec<bool>,
}

impl<'a> CroppedMesh<'a> {
    #[inline]
    pub fn mesh(&self) -> &'a ReducedMesh {
        self.mesh
    }

    #[inline]
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub fn kept_count(&self) -> usize {
        self.mask.iter().filter(|&&keep| keep).count()
    }

    /// Surviving triangles in their original order.
    pub fn triangles(&self) -> impl Iterator<Item = &'a Triangle> + '_ {
        self.mesh
            .triangles
            .iter()
            .zip(&self.mask)
            .filter_map(|(tri, &keep)| keep.then_some(tri))
    }

    /// Drop unused vertices of the surviving triangles.
    ///
    /// `values`, if given, are samples on the uncropped mesh and are gathered
    /// onto the compacted vertices. The compacted `local_to_global` refers to
    /// the uncropped mesh's local indices.
    pub fn compact(
        &self,
        values: Option<&[f64]>,
    ) -> Result<(ReducedMesh, Option<Vec<f64>>), TcadMeshError> {
        let kept: Vec<Triangle> = self.triangles().copied().collect();
        let compacted = reindex(&kept, &self.mesh.vertices)?;
        let gathered = match values {
            Some(values) => Some(
                compacted
                    .local_to_global
                    .iter()
                    .map(|&i| {
                        values.get(i).copied().ok_or(TcadMeshError::IndexOutOfRange {
                            index: i,
                            len: values.len(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };
        Ok((compacted, gathered))
    }
}

/// Keep the triangles whose corners all lie within `xlim` and `ylim`.
///
/// Limits may be given in either order; an absent limit does not constrain
/// that axis, and with both absent every triangle is kept. Returns `None`
/// when no triangle survives.
pub fn crop_triangles(
    mesh: &ReducedMesh,
    xlim: Option<(f64, f64)>,
    ylim: Option<(f64, f64)>,
) -> Option<CroppedMesh<'_>> {
    let xlim = xlim.map(|(a, b)| AxisRange::new(a, b));
    let ylim = ylim.map(|(a, b)| AxisRange::new(a, b));

    let mask: Vec<bool> = (0..mesh.triangle_count())
        .map(|t| {
            let Some(corners) = mesh.triangle_coords(t) else {
                return false;
            };
            let inside = |lim: Option<AxisRange>, axis: Axis| {
                lim.is_none_or(|r| corners.iter().all(|p| r.contains(p[axis.index()])))
            };
            inside(xlim, Axis::X) && inside(ylim, Axis::Y)
        })
        .collect();

    if (xlim.is_some() || ylim.is_some()) && !mask.iter().any(|&keep| keep) {
        return None;
    }
    Some(CroppedMesh { mesh, mask })
}

/// Samples picked up along a line of constant coordinate.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Cutline {
    /// Coordinate along the other axis, one per picked vertex.
    pub positions: Vec<f64>,
    pub values: Vec<f64>,
}

/// Vertices whose `axis` coordinate is within `max(tolerance, closest)` of
/// `at`, with their field sample, in vertex order.
///
/// Vertices and samples are paired by position. `None` when `data` carries
/// no field or its sample count differs from the vertex count (possible
/// under [`FieldAlignment::Ignore`](crate::io::tdr::FieldAlignment::Ignore)).
pub fn cutline(data: &RegionFieldData, axis: Axis, at: f64, tolerance: f64) -> Option<Cutline> {
    let field = data.field.as_ref()?;
    let vertices = &data.mesh.vertices;
    if field.len() != vertices.len() {
        log::warn!(
            "no cutline for {}/{}: {} samples for {} vertices",
            data.region,
            field.name,
            field.len(),
            vertices.len()
        );
        return None;
    }
    let distance = |p: &[f64; 2]| (p[axis.index()] - at).abs();

    let Some(closest) = vertices.iter().map(distance).reduce(f64::min) else {
        return Some(Cutline::default());
    };
    let threshold = tolerance.max(closest);

    let mut out = Cutline::default();
    for (p, &value) in vertices.iter().zip(&field.values) {
        if distance(p) <= threshold {
            out.positions.push(p[axis.other().index()]);
            out.values.push(value);
        }
    }
    Some(out)
}

/// Cut at constant `x`.
pub fn xcutline(data: &RegionFieldData, x: f64, tolerance: f64) -> Option<Cutline> {
    cutline(data, Axis::X, x, tolerance)
}

/// Cut at constant `y`.
pub fn ycutline(data: &RegionFieldData, y: f64, tolerance: f64) -> Option<Cutline> {
    cutline(data, Axis::Y, y, tolerance)
}
