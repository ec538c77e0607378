//! Extracted data handed to consumers.

pub mod mesh;
