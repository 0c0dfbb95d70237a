//! # tridbscan Algorithms
//!
//! Density-based clustering of planar points that reuses an existing
//! triangulation as its proximity structure.
//!
//! This crate provides the proximity graph built from a triangle list, the
//! bounded-walk neighborhood expander, the per-vertex state machine, the
//! cluster model and the clustering engine that ties them together.

pub mod proximity_graph;
pub mod neighborhood;
pub mod state;
pub mod cluster;
pub mod dbscan;

// Re-export commonly used items
pub use proximity_graph::*;
pub use neighborhood::*;
pub use state::*;
pub use cluster::*;
pub use dbscan::*;
