//! TcadMeshError: Unified error type for tcad-mesh public APIs
//!
//! Absence (an unknown region, a quantity that a region does not carry) is
//! never an error; lookups report it as `Ok(None)` and bulk queries simply
//! omit the entry.

use crate::topology::cell_type::describe_tag;
use thiserror::Error;

/// Unified error type for TDR extraction operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TcadMeshError {
    /// A required file, group, or dataset is missing.
    #[error("not found: {0}")]
    NotFound(String),
    /// The container was closed; derived data is no longer reachable.
    #[error("operation on a closed TDR container")]
    ClosedResource,
    /// A connectivity record carries a tag other than triangle.
    #[error(
        "unsupported element type {} in record {record} (only triangles are supported)",
        describe_tag(.tag)
    )]
    UnsupportedElementType { record: usize, tag: i64 },
    /// The connectivity block length is not a multiple of the record stride.
    #[error("malformed connectivity block: length {len} is not a multiple of 4")]
    MalformedConnectivity { len: usize },
    /// A vertex index points past the end of the global vertex table.
    #[error("vertex index {index} out of range for vertex table of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// A connectivity record references a negative vertex index.
    #[error("negative vertex index {value} in record {record}")]
    NegativeIndex { record: usize, value: i64 },
    /// A field's sample count does not match the reduced vertex count.
    #[error(
        "field `{field}` on region `{region}` has {values} values for {vertices} vertices"
    )]
    FieldLengthMismatch {
        region: String,
        field: String,
        vertices: usize,
        values: usize,
    },
    /// An attribute exists but its value cannot be interpreted.
    #[error("invalid attribute `{attr}` on `{path}`: {value}")]
    InvalidAttribute {
        path: String,
        attr: String,
        value: String,
    },
    /// The storage backend reported a failure.
    #[error("store error: {0}")]
    Store(String),
    /// No backend compiled in for this file type.
    #[error("no storage backend available for `{0}` (enable the `hdf5` feature)")]
    BackendUnavailable(String),
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(String),
    /// A JSON store snapshot could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl From<std::io::Error> for TcadMeshError {
    fn from(err: std::io::Error) -> Self {
        TcadMeshError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TcadMeshError {
    fn from(err: serde_json::Error) -> Self {
        TcadMeshError::Snapshot(err.to_string())
    }
}

#[cfg(feature = "hdf5")]
impl From<hdf5::Error> for TcadMeshError {
    fn from(err: hdf5::Error) -> Self {
        TcadMeshError::Store(err.to_string())
    }
}
