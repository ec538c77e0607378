//! Geometric helpers over reduced meshes.

pub mod bounds;
pub mod crop;
