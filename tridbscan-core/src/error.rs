//! Error types for tridbscan

use crate::{Coordinate, Triangle};
use thiserror::Error;

/// Main error type for tridbscan operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Two or more corners of an input triangle coincide
    #[error("Degenerate triangle {triangle}: corners are not pairwise distinct")]
    DegenerateTriangle { triangle: Triangle },

    /// The incident-edge lookup for a vertex/neighbor pair did not find exactly one edge
    #[error("Inconsistent topology: vertex {vertex} has {matches} incident edges to neighbor {neighbor}, expected exactly 1")]
    InconsistentTopology {
        vertex: Coordinate,
        neighbor: Coordinate,
        matches: usize,
    },

    #[error("Unknown vertex: {0}")]
    UnknownVertex(Coordinate),
}

/// Result type alias for tridbscan operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error signals a malformed input triangulation.
    ///
    /// Construction errors are unrecoverable for the given input; no partially
    /// built graph is ever returned alongside them.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidData(_)
                | Error::DegenerateTriangle { .. }
                | Error::InconsistentTopology { .. }
        )
    }
}
