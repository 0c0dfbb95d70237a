//! Undirected edges between two coordinates

use crate::coordinate::Coordinate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// An unordered pair of coordinates with a precomputed length.
///
/// Endpoints are canonicalized on construction so that `Edge::new(a, b)` and
/// `Edge::new(b, a)` are the same edge with bit-identical lengths. Only the
/// endpoints are serialized; the length is recomputed on the way back in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "(Coordinate, Coordinate)", into = "(Coordinate, Coordinate)")]
pub struct Edge {
    start: Coordinate,
    end: Coordinate,
    length: f64,
}

impl Edge {
    /// Create a canonical edge between two coordinates
    pub fn new(a: Coordinate, b: Coordinate) -> Self {
        let (start, end) = if b < a { (b, a) } else { (a, b) };
        Self {
            start,
            end,
            length: start.distance(&end),
        }
    }

    /// The lesser endpoint under coordinate ordering
    pub fn start(&self) -> Coordinate {
        self.start
    }

    /// The greater endpoint under coordinate ordering
    pub fn end(&self) -> Coordinate {
        self.end
    }

    pub fn endpoints(&self) -> (Coordinate, Coordinate) {
        (self.start, self.end)
    }

    /// Euclidean length, computed once at construction
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Whether `coordinate` is one of the two endpoints
    pub fn touches(&self, coordinate: &Coordinate) -> bool {
        self.start == *coordinate || self.end == *coordinate
    }

    /// The endpoint opposite `coordinate`, if `coordinate` is an endpoint
    pub fn opposite(&self, coordinate: &Coordinate) -> Option<Coordinate> {
        if self.start == *coordinate {
            Some(self.end)
        } else if self.end == *coordinate {
            Some(self.start)
        } else {
            None
        }
    }

    /// Whether the edge joins two identical coordinates
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

impl From<(Coordinate, Coordinate)> for Edge {
    fn from((a, b): (Coordinate, Coordinate)) -> Self {
        Self::new(a, b)
    }
}

impl From<Edge> for (Coordinate, Coordinate) {
    fn from(edge: Edge) -> Self {
        edge.endpoints()
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for Edge {}

impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Edge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
    }
}
