//! Element-level topology: connectivity decoding and cache plumbing.

pub mod cache;
pub mod cell_type;
pub mod elements;
