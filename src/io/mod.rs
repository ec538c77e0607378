//! TDR container access.
//!
//! This module provides the [`HierarchicalStore`] seam between the extraction
//! logic and the on-disk format, the path layout of a TDR collection, and the
//! [`TdrFile`](tdr::TdrFile) container built on top of it.
//!
//! # Layout
//! ```text
//! collection/geometry_0/vertex              compound table {x, y}
//! collection/geometry_0/region_<n>          group, attr `name`
//! collection/geometry_0/region_<n>/elements_0
//! collection/geometry_0/state_0/<dataset>   group, attrs `region`, `quantity`, `name`
//! collection/geometry_0/state_0/<dataset>/values
//! ```

#[cfg(feature = "hdf5")]
pub mod hdf5;
pub mod memory;
pub mod query;
pub mod resolver;
pub mod tdr;

use crate::mesh_error::TcadMeshError;

/// Geometry root holding the vertex table and all regions.
pub const GROUP_GEOMETRY: &str = "collection/geometry_0";
/// Global vertex table.
pub const DATASET_VERTEX: &str = "collection/geometry_0/vertex";
/// Root of the per-state field datasets.
pub const GROUP_STATE: &str = "collection/geometry_0/state_0";
/// Name prefix of region groups; the suffix is the numeric region key.
pub const REGION_PREFIX: &str = "region_";
/// Connectivity dataset inside a region group.
pub const DATASET_ELEMENTS: &str = "elements_0";
/// Sample dataset inside a state dataset group.
pub const DATASET_VALUES: &str = "values";

pub const ATTR_NAME: &str = "name";
pub const ATTR_REGION: &str = "region";
pub const ATTR_QUANTITY: &str = "quantity";

/// Join a group path and a child name.
pub fn join(group: &str, child: &str) -> String {
    if group.is_empty() {
        child.to_string()
    } else {
        format!("{group}/{child}")
    }
}

/// Read access to a hierarchical (HDF5-like) store.
///
/// Paths are `/`-separated and relative to the file root. Attribute values
/// cross this boundary as UTF-8 text: byte strings are decoded and integer
/// attributes are formatted in decimal, so callers never compare encodings.
pub trait HierarchicalStore {
    /// Whether a group or dataset exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Names (not paths) of the direct children of `group`.
    fn members(&self, group: &str) -> Result<Vec<String>, TcadMeshError>;

    /// Text value of attribute `name` on the object at `path`, if present.
    fn attr(&self, path: &str, name: &str) -> Result<Option<String>, TcadMeshError>;

    /// Full contents of an integer dataset.
    fn read_ints(&self, dataset: &str) -> Result<Vec<i64>, TcadMeshError>;

    /// Full contents of a floating-point dataset.
    fn read_floats(&self, dataset: &str) -> Result<Vec<f64>, TcadMeshError>;

    /// `(x, y)` rows of a compound vertex table.
    fn read_vertices(&self, dataset: &str) -> Result<Vec<[f64; 2]>, TcadMeshError>;

    /// Release underlying resources. Must tolerate repeated calls.
    fn close(&mut self) {}
}
