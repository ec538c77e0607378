//! Element type tags found in TDR connectivity blocks.

use std::fmt;

/// Element kinds a TDR `elements_<n>` dataset can tag.
///
/// Only [`CellType::Triangle`] is decoded; the others name the element in
/// [`TcadMeshError::UnsupportedElementType`](crate::mesh_error::TcadMeshError::UnsupportedElementType).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize)]
pub enum CellType {
    /// 0D point.
    Point,
    /// 1D segment/edge.
    Segment,
    /// 2D simplex (triangle).
    Triangle,
    /// 2D tensor-product cell (rectangle).
    Quadrilateral,
    /// 2D polygon.
    Polygon,
    /// 3D simplex (tet).
    Tetrahedron,
    /// 3D pyramid.
    Pyramid,
    /// 3D wedge/prism.
    Prism,
    /// 3D tensor-product cell (brick).
    Hexahedron,
    /// 3D tetrahedron-brick hybrid.
    TetraBrick,
    /// Generic polyhedron.
    Polyhedron,
}

impl CellType {
    /// Raw tag written in front of every triangle record.
    pub const TRIANGLE_TAG: i64 = 2;

    /// Map a raw tag to a known element kind.
    pub fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            0 => Some(CellType::Point),
            1 => Some(CellType::Segment),
            2 => Some(CellType::Triangle),
            3 => Some(CellType::Quadrilateral),
            4 => Some(CellType::Polygon),
            5 => Some(CellType::Tetrahedron),
            6 => Some(CellType::Pyramid),
            7 => Some(CellType::Prism),
            8 => Some(CellType::Hexahedron),
            9 => Some(CellType::TetraBrick),
            10 => Some(CellType::Polyhedron),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CellType::Point => "point",
            CellType::Segment => "segment",
            CellType::Triangle => "triangle",
            CellType::Quadrilateral => "quadrilateral",
            CellType::Polygon => "polygon",
            CellType::Tetrahedron => "tetrahedron",
            CellType::Pyramid => "pyramid",
            CellType::Prism => "prism",
            CellType::Hexahedron => "hexahedron",
            CellType::TetraBrick => "tetra-brick",
            CellType::Polyhedron => "polyhedron",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `"quadrilateral (tag 3)"`, or `"unknown (tag 42)"` for tags outside the
/// table.
pub(crate) fn describe_tag(tag: &i64) -> String {
    match CellType::from_tag(*tag) {
        Some(kind) => format!("{kind} (tag {tag})"),
        None => format!("unknown (tag {tag})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_tag_round_trips() {
        assert_eq!(CellType::from_tag(CellType::TRIANGLE_TAG), Some(CellType::Triangle));
    }

    #[test]
    fn unknown_tags_are_none() {
        assert_eq!(CellType::from_tag(-1), None);
        assert_eq!(CellType::from_tag(42), None);
    }

    #[test]
    fn tags_are_described_by_kind() {
        assert_eq!(describe_tag(&3), "quadrilateral (tag 3)");
        assert_eq!(describe_tag(&9), "tetra-brick (tag 9)");
        assert_eq!(describe_tag(&42), "unknown (tag 42)");
    }
}
