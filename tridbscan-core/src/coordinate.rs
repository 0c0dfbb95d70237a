//! Coordinate type and related functionality

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A planar point with double precision coordinates.
///
/// Equality, hashing and ordering are exact (no epsilon). Two coordinates name
/// the same vertex only when both components are identical, with the single
/// exception that `-0.0` and `0.0` are folded together.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coordinate {
    position: Point2<f64>,
}

impl Coordinate {
    /// Create a new coordinate
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Point2::new(x, y),
        }
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Borrow the underlying nalgebra point
    pub fn position(&self) -> &Point2<f64> {
        &self.position
    }

    /// Euclidean distance to another coordinate
    pub fn distance(&self, other: &Coordinate) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }

    /// Squared Euclidean distance to another coordinate
    pub fn distance_squared(&self, other: &Coordinate) -> f64 {
        nalgebra::distance_squared(&self.position, &other.position)
    }

    /// Whether both components are finite
    pub fn is_finite(&self) -> bool {
        self.position.x.is_finite() && self.position.y.is_finite()
    }

    fn folded(&self) -> (f64, f64) {
        (fold_zero(self.position.x), fold_zero(self.position.y))
    }
}

fn fold_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Coordinate {}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coordinate {
    /// Lexicographic total order on (x, y)
    fn cmp(&self, other: &Self) -> Ordering {
        let (ax, ay) = self.folded();
        let (bx, by) = other.folded();
        ax.total_cmp(&bx).then_with(|| ay.total_cmp(&by))
    }
}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (x, y) = self.folded();
        x.to_bits().hash(state);
        y.to_bits().hash(state);
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.position.x, self.position.y)
    }
}

impl From<Point2<f64>> for Coordinate {
    fn from(position: Point2<f64>) -> Self {
        Self { position }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Coordinate> for Point2<f64> {
    fn from(coordinate: Coordinate) -> Self {
        coordinate.position
    }
}
