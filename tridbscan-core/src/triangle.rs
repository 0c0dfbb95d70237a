//! Triangle primitive consumed from an external triangulation

use crate::coordinate::Coordinate;
use crate::edge::Edge;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// An unordered set of three planar coordinates.
///
/// Points are stored in sorted order, so two triangles built from the same
/// three coordinates in any order compare and hash equal. The three edges are
/// derived once on construction. Serialized as its three corners; deserializing
/// goes through [`Triangle::from_points`], so the same canonical form holds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "[Coordinate; 3]", into = "[Coordinate; 3]")]
pub struct Triangle {
    points: [Coordinate; 3],
    edges: [Edge; 3],
}

impl Triangle {
    /// Create a triangle from three coordinates in any order
    pub fn new(a: Coordinate, b: Coordinate, c: Coordinate) -> Self {
        let mut points = [a, b, c];
        points.sort();
        let [p0, p1, p2] = points;
        Self {
            points,
            edges: [Edge::new(p0, p1), Edge::new(p1, p2), Edge::new(p0, p2)],
        }
    }

    /// Create a triangle from a point array
    pub fn from_points(points: [Coordinate; 3]) -> Self {
        let [a, b, c] = points;
        Self::new(a, b, c)
    }

    /// Canonically ordered vertices
    pub fn points(&self) -> &[Coordinate; 3] {
        &self.points
    }

    pub fn edges(&self) -> &[Edge; 3] {
        &self.edges
    }

    /// Whether `coordinate` is one of the three vertices
    pub fn has_vertex(&self, coordinate: &Coordinate) -> bool {
        self.points.contains(coordinate)
    }

    /// The two vertices other than `coordinate`
    pub fn others(&self, coordinate: &Coordinate) -> Option<[Coordinate; 2]> {
        let [p0, p1, p2] = self.points;
        if p0 == *coordinate {
            Some([p1, p2])
        } else if p1 == *coordinate {
            Some([p0, p2])
        } else if p2 == *coordinate {
            Some([p0, p1])
        } else {
            None
        }
    }

    /// The two edges meeting at `coordinate`
    pub fn edges_at(&self, coordinate: &Coordinate) -> Option<[Edge; 2]> {
        let mut touching = self.edges.iter().filter(|e| e.touches(coordinate));
        match (touching.next(), touching.next()) {
            (Some(first), Some(second)) => Some([*first, *second]),
            _ => None,
        }
    }

    /// Whether two or more vertices coincide
    pub fn is_degenerate(&self) -> bool {
        let [p0, p1, p2] = &self.points;
        p0 == p1 || p1 == p2 || p0 == p2
    }

    /// Inclusive point-in-triangle test.
    ///
    /// A point lies inside when its signed side against all three edges never
    /// disagrees; points on an edge or vertex count as inside. Works for either
    /// winding order.
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        fn side(p: &Coordinate, v0: &Coordinate, v1: &Coordinate) -> f64 {
            (p.x() - v1.x()) * (v0.y() - v1.y()) - (v0.x() - v1.x()) * (p.y() - v1.y())
        }

        let [p0, p1, p2] = &self.points;
        let sides = [
            side(coordinate, p0, p1),
            side(coordinate, p1, p2),
            side(coordinate, p2, p0),
        ];

        let has_negative = sides.iter().any(|s| *s < 0.0);
        let has_positive = sides.iter().any(|s| *s > 0.0);
        !(has_negative && has_positive)
    }

    /// Unsigned area
    pub fn area(&self) -> f64 {
        let [p0, p1, p2] = &self.points;
        let u = p1.position() - p0.position();
        let v = p2.position() - p0.position();
        (u.x * v.y - u.y * v.x).abs() / 2.0
    }
}

impl PartialEq for Triangle {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
    }
}

impl Eq for Triangle {}

impl Hash for Triangle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.points.hash(state);
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [p0, p1, p2] = &self.points;
        write!(f, "[{p0}, {p1}, {p2}]")
    }
}

impl From<[Coordinate; 3]> for Triangle {
    fn from(points: [Coordinate; 3]) -> Self {
        Self::from_points(points)
    }
}

impl From<Triangle> for [Coordinate; 3] {
    fn from(triangle: Triangle) -> Self {
        triangle.points
    }
}

impl From<[[f64; 2]; 3]> for Triangle {
    fn from([a, b, c]: [[f64; 2]; 3]) -> Self {
        Self::new(a.into(), b.into(), c.into())
    }
}
