#![cfg_attr(docsrs, feature(doc_cfg))]
//! # tcad-mesh
//!
//! tcad-mesh reads 2D TCAD device-simulation output stored in TDR collections
//! (HDF5-backed), rebuilds a compact triangle mesh for every region, and
//! aligns simulated quantities (potential, carrier densities, fields, ...)
//! with the mesh vertices for plotting and serialization.
//!
//! ## Pipeline
//! - [`io::tdr::TdrFile`] opens the collection and lazily loads the global
//!   vertex table.
//! - [`topology::elements::decode_elements`] turns a region's packed
//!   connectivity block into triangles.
//! - [`io::resolver`] maps region and quantity names to store entries.
//! - [`algs::reindex::reindex`] compacts a region's triangles to local
//!   vertex numbering.
//! - [`TdrFile::get`](io::tdr::TdrFile::get) and
//!   [`TdrFile::get_all`](io::tdr::TdrFile::get_all) combine the above and
//!   memoize per `(region, field)` until the file is closed.
//!
//! Absent regions and fields are not errors: lookups return `None` and bulk
//! queries leave the entry out.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! tcad-mesh = { version = "0.1", features = ["hdf5"] }
//! ```
//!
//! ```no_run
//! use tcad_mesh::prelude::*;
//!
//! # fn main() -> Result<(), TcadMeshError> {
//! let mut file = TdrFile::open("device_des.tdr")?;
//! if let Some(data) = file.get("Silicon", Some("ElectrostaticPotential"))? {
//!     let (vertices, triangles, values) = data.as_parts();
//!     println!("{} vertices, {} triangles, field: {}", vertices.len(), triangles.len(), values.is_some());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Without the `hdf5` feature, `.json` snapshots written by
//! [`io::memory::MemoryStore`] can still be opened.

pub mod algs;
pub mod data;
pub mod geometry;
pub mod io;
pub mod mesh_error;
pub mod topology;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::reindex::reindex;
    pub use crate::data::mesh::{FieldValues, ReducedMesh, RegionFieldData};
    pub use crate::geometry::bounds::{Axis, AxisRange, Dimensions};
    pub use crate::geometry::crop::{CroppedMesh, Cutline, crop_triangles, cutline};
    pub use crate::io::HierarchicalStore;
    pub use crate::io::memory::MemoryStore;
    pub use crate::io::query::RegionFieldMap;
    pub use crate::io::resolver::{FieldHandle, RegionHandle};
    pub use crate::io::tdr::{FieldAlignment, ReadOptions, TdrFile};
    pub use crate::mesh_error::TcadMeshError;
    pub use crate::topology::cache::InvalidateCache;
    pub use crate::topology::cell_type::CellType;
    pub use crate::topology::elements::{Triangle, decode_elements};
}
