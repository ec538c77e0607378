//! Reduced per-region meshes and the field samples aligned to them.

use crate::topology::elements::Triangle;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Compact, region-local triangle mesh.
///
/// `vertices[i]` is global vertex `local_to_global[i]`; `local_to_global` is
/// strictly ascending and every entry of `triangles` indexes `vertices`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReducedMesh {
    pub vertices: Vec<[f64; 2]>,
    pub triangles: Vec<Triangle>,
    pub local_to_global: Vec<usize>,
}

impl ReducedMesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Triangles expressed in global vertex indices again.
    ///
    /// `None` if a triangle refers past `local_to_global`, which only a
    /// hand-assembled mesh can do.
    pub fn global_triangles(&self) -> Option<Vec<Triangle>> {
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                let global = |local: usize| self.local_to_global.get(local).copied();
                Some([global(a)?, global(b)?, global(c)?])
            })
            .collect()
    }

    /// Corner coordinates of triangle `t`; `None` if `t` or one of its
    /// corners is out of range.
    pub fn triangle_coords(&self, t: usize) -> Option<[[f64; 2]; 3]> {
        let [a, b, c] = *self.triangles.get(t)?;
        let corner = |v: usize| self.vertices.get(v).copied();
        Some([corner(a)?, corner(b)?, corner(c)?])
    }
}

/// Samples of one quantity on one region, one per reduced vertex.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldValues {
    pub name: String,
    pub values: Vec<f64>,
    /// Hex SHA-256 of the values, when requested via `ReadOptions::checksum`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl FieldValues {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
            checksum: None,
        }
    }

    /// Attach a checksum of the current values.
    pub fn with_checksum(mut self) -> Self {
        self.checksum = Some(values_checksum(&self.values));
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Result of a region (and optional field) query.
///
/// The mesh is shared between every field of the same region.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegionFieldData {
    pub region: String,
    pub mesh: Arc<ReducedMesh>,
    pub field: Option<FieldValues>,
}

impl RegionFieldData {
    /// `(vertices, triangles, values)` in the shape plotting consumers take.
    pub fn as_parts(&self) -> (&[[f64; 2]], &[Triangle], Option<&[f64]>) {
        (
            &self.mesh.vertices,
            &self.mesh.triangles,
            self.field.as_ref().map(|f| f.values.as_slice()),
        )
    }
}

/// Hex SHA-256 over the little-endian bytes of `values`.
pub fn values_checksum(values: &[f64]) -> String {
    let mut hasher = Sha256::new();
    for v in values {
        hasher.update(v.to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> ReducedMesh {
        ReducedMesh {
            vertices: vec![[1.0, 0.0], [1.0, 1.0], [5.0, 5.0]],
            triangles: vec![[1, 2, 0]],
            local_to_global: vec![1, 2, 4],
        }
    }

    #[test]
    fn global_triangles_maps_back() {
        assert_eq!(square().global_triangles(), Some(vec![[2, 4, 1]]));
    }

    #[test]
    fn triangle_coords_gathers_corners() {
        assert_eq!(
            square().triangle_coords(0),
            Some([[1.0, 1.0], [5.0, 5.0], [1.0, 0.0]])
        );
    }

    #[test]
    fn out_of_range_lookups_are_none() {
        let mut mesh = square();
        assert_eq!(mesh.triangle_coords(1), None);
        mesh.triangles.push([0, 1, 3]);
        assert_eq!(mesh.triangle_coords(1), None);
        assert_eq!(mesh.global_triangles(), None);
    }

    #[test]
    fn checksum_depends_on_values() {
        let a = values_checksum(&[1.0, 2.0]);
        assert_eq!(a.len(), 64);
        assert_eq!(a, values_checksum(&[1.0, 2.0]));
        assert_ne!(a, values_checksum(&[2.0, 1.0]));
    }
}
