//! Core data structures and traits for tridbscan
//!
//! This crate provides the planar geometry primitives consumed by the clustering
//! engine: exact coordinates, canonical edges and triangles, plus the shared
//! error type and neighborhood query trait.

pub mod coordinate;
pub mod edge;
pub mod triangle;
pub mod traits;
pub mod error;

pub use coordinate::*;
pub use edge::*;
pub use triangle::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point2, Vector2};
