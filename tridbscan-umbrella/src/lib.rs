//! # tridbscan
//!
//! Density-based clustering of planar points, accelerated by the adjacency of
//! an existing triangulation instead of a spatial index.
//!
//! This is the umbrella crate that provides convenient access to all tridbscan
//! functionality. You can use this crate to get everything in one place, or use
//! individual crates for more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Geometry primitives (Coordinate, Edge, Triangle) and errors
//! - **Algorithms**: Proximity graph, bounded neighborhood walk and the clustering engine
//!
//! ## Quick Start
//!
//! ```rust
//! use tridbscan::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     // Triangles come from any external triangulation of the points
//!     let c = Coordinate::new;
//!     let triangles = vec![
//!         Triangle::new(c(0.0, 0.0), c(1.0, 0.0), c(0.0, 1.0)),
//!         Triangle::new(c(1.0, 0.0), c(1.0, 1.0), c(0.0, 1.0)),
//!         Triangle::new(c(40.0, 40.0), c(41.0, 40.0), c(40.0, 41.0)),
//!     ];
//!
//!     let clustering = run(&triangles, 2.0, 3)?;
//!     assert_eq!(clustering.partition().len(), 1);
//!     assert_eq!(clustering.noise().count(), 3);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables core and algorithms
//! - `algorithms`: Proximity graph and clustering engine
//! - `all`: Enables all features

// Re-export core functionality
pub use tridbscan_core::*;

// Re-export sub-crates
#[cfg(feature = "algorithms")]
pub use tridbscan_algorithms as algorithms;

/// Convenient imports for common use cases
pub mod prelude {
    pub use tridbscan_core::*;

    #[cfg(feature = "algorithms")]
    pub use tridbscan_algorithms::*;
}
