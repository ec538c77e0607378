//! Mesh algorithms on decoded connectivity.

pub mod reindex;
