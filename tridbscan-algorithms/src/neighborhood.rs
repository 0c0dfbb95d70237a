//! Neighborhood queries over a proximity graph
//!
//! [`NeighborhoodExpander`] approximates "every vertex within `radius` of `v`"
//! by walking graph adjacency instead of consulting a spatial index. The walk
//! collects the full closure of vertices reachable in at most `max_depth` hops
//! and only then filters by straight-line distance from `v`; hop-path length is
//! never used as a distance.
//!
//! The result equals an exact radius query only when every true geometric
//! neighbor is reachable within `max_depth` hops. Dense triangulations satisfy
//! this for radii of a few edge lengths; sparse ones may miss far neighbors.
//! [`BruteForceNeighborhood`] is the exact O(V) reference for comparison.

use crate::proximity_graph::{Proximity, ProximityGraph, VertexId};
use itertools::Itertools;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use tridbscan_core::NeighborhoodQuery;

/// Default hop-depth bound for neighborhood expansion
pub const DEFAULT_MAX_DEPTH: usize = 6;

/// Bounded-depth graph walk approximating a radius query
#[derive(Debug, Clone, Copy)]
pub struct NeighborhoodExpander<'g> {
    graph: &'g ProximityGraph,
    max_depth: usize,
}

impl<'g> NeighborhoodExpander<'g> {
    pub fn new(graph: &'g ProximityGraph) -> Self {
        Self {
            graph,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Every vertex reachable from `origin` in at most `max_depth` hops,
    /// mapped to its hop count. `origin` itself is not included.
    pub fn reachable(&self, origin: VertexId) -> HashMap<VertexId, usize> {
        let mut hops = HashMap::new();
        hops.insert(origin, 0);

        // Breadth-first, so the first time a vertex is seen is via a shortest path
        let mut frontier = VecDeque::from([(origin, self.max_depth)]);
        while let Some((current, remaining)) = frontier.pop_front() {
            if remaining == 0 {
                continue;
            }
            let depth = self.max_depth - remaining + 1;
            for neighbor in self.graph.vertex(current).neighbors() {
                if let Entry::Vacant(slot) = hops.entry(neighbor) {
                    slot.insert(depth);
                    frontier.push_back((neighbor, remaining - 1));
                }
            }
        }

        hops.remove(&origin);
        hops
    }

    /// Vertices within straight-line `radius` of `origin` among those reachable
    /// in at most `max_depth` hops, sorted ascending by distance
    pub fn expand(&self, origin: VertexId, radius: f64) -> Vec<Proximity> {
        let center = self.graph.vertex(origin).coordinate();
        self.reachable(origin)
            .into_keys()
            .filter_map(|id| {
                let distance = center.distance(&self.graph.vertex(id).coordinate());
                (distance <= radius).then_some(Proximity {
                    vertex: id,
                    distance,
                })
            })
            .sorted_by(by_distance)
            .collect()
    }
}

impl NeighborhoodQuery for NeighborhoodExpander<'_> {
    type Key = VertexId;

    fn neighbors_within(&self, query: VertexId, radius: f64) -> Vec<(VertexId, f64)> {
        self.expand(query, radius)
            .into_iter()
            .map(|p| (p.vertex, p.distance))
            .collect()
    }
}

/// Exact radius query by scanning every vertex of the graph
#[derive(Debug, Clone, Copy)]
pub struct BruteForceNeighborhood<'g> {
    graph: &'g ProximityGraph,
}

impl<'g> BruteForceNeighborhood<'g> {
    pub fn new(graph: &'g ProximityGraph) -> Self {
        Self { graph }
    }
}

impl NeighborhoodQuery for BruteForceNeighborhood<'_> {
    type Key = VertexId;

    fn neighbors_within(&self, query: VertexId, radius: f64) -> Vec<(VertexId, f64)> {
        let center = self.graph.vertex(query).coordinate();
        self.graph
            .vertices()
            .filter(|v| v.id() != query)
            .filter_map(|v| {
                let distance = center.distance(&v.coordinate());
                (distance <= radius).then_some(Proximity {
                    vertex: v.id(),
                    distance,
                })
            })
            .sorted_by(by_distance)
            .map(|p| (p.vertex, p.distance))
            .collect()
    }
}

fn by_distance(a: &Proximity, b: &Proximity) -> std::cmp::Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.vertex.cmp(&b.vertex))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tridbscan_core::{Coordinate, Triangle};

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    /// A strip of unit squares along the x axis, each split into two triangles
    fn make_strip(length: usize) -> ProximityGraph {
        let mut triangles = Vec::new();
        for i in 0..length {
            let x = i as f64;
            triangles.push(Triangle::new(c(x, 0.0), c(x + 1.0, 0.0), c(x, 1.0)));
            triangles.push(Triangle::new(c(x + 1.0, 0.0), c(x + 1.0, 1.0), c(x, 1.0)));
        }
        ProximityGraph::from_triangles(&triangles).unwrap()
    }

    /// A closed loop whose chord is short in the plane but long in hops
    fn make_horseshoe() -> ProximityGraph {
        let ring = [
            c(0.0, 0.0),
            c(0.0, 4.0),
            c(4.0, 4.0),
            c(4.0, 0.0),
            c(1.0, 0.0),
        ];
        let hub = c(2.0, 2.0);
        let triangles: Vec<Triangle> = ring
            .windows(2)
            .map(|w| Triangle::new(w[0], w[1], hub))
            .collect();
        ProximityGraph::from_triangles(&triangles).unwrap()
    }

    fn id(graph: &ProximityGraph, x: f64, y: f64) -> VertexId {
        graph.vertex_id(&c(x, y)).unwrap()
    }

    #[test]
    fn test_reachable_respects_hop_bound() {
        let graph = make_strip(8);
        let origin = id(&graph, 0.0, 0.0);

        let one_hop = NeighborhoodExpander::new(&graph).with_max_depth(1).reachable(origin);
        let expected: HashSet<VertexId> = graph.vertex(origin).neighbors().collect();
        assert_eq!(one_hop.keys().copied().collect::<HashSet<_>>(), expected);
        assert!(one_hop.values().all(|&h| h == 1));

        let two_hops = NeighborhoodExpander::new(&graph).with_max_depth(2).reachable(origin);
        assert!(two_hops.len() > one_hop.len());
        assert!(two_hops.values().all(|&h| (1..=2).contains(&h)));
        assert!(!two_hops.contains_key(&id(&graph, 8.0, 0.0)));
    }

    #[test]
    fn test_reachable_records_shortest_hop_count() {
        let graph = make_strip(8);
        let origin = id(&graph, 0.0, 0.0);
        let hops = NeighborhoodExpander::new(&graph).with_max_depth(10).reachable(origin);

        assert_eq!(hops[&id(&graph, 1.0, 0.0)], 1);
        assert_eq!(hops[&id(&graph, 2.0, 0.0)], 2);
        assert_eq!(hops[&id(&graph, 3.0, 0.0)], 3);
        assert!(!hops.contains_key(&origin));
    }

    #[test]
    fn test_zero_depth_reaches_nothing() {
        let graph = make_strip(2);
        let origin = id(&graph, 0.0, 0.0);
        let expander = NeighborhoodExpander::new(&graph).with_max_depth(0);

        assert!(expander.reachable(origin).is_empty());
        assert!(expander.expand(origin, 100.0).is_empty());
    }

    #[test]
    fn test_expand_filters_by_straight_line_distance() {
        let graph = make_strip(8);
        let origin = id(&graph, 0.0, 0.0);
        let hood = NeighborhoodExpander::new(&graph).expand(origin, 2.0);

        let coords: HashSet<Coordinate> = hood
            .iter()
            .map(|p| graph.vertex(p.vertex).coordinate())
            .collect();
        let expected: HashSet<Coordinate> =
            [c(1.0, 0.0), c(2.0, 0.0), c(0.0, 1.0), c(1.0, 1.0)]
                .into_iter()
                .collect();
        assert_eq!(coords, expected);
        assert!(hood.iter().all(|p| p.distance <= 2.0));
    }

    #[test]
    fn test_expand_is_sorted_and_excludes_origin() {
        let graph = make_strip(8);
        for origin in graph.vertex_ids() {
            let hood = NeighborhoodExpander::new(&graph).expand(origin, 3.0);

            assert!(hood.iter().all(|p| p.vertex != origin));
            assert!(hood.windows(2).all(|w| w[0].distance <= w[1].distance));
            let unique: HashSet<VertexId> = hood.iter().map(|p| p.vertex).collect();
            assert_eq!(unique.len(), hood.len());
        }
    }

    #[test]
    fn test_uses_origin_distance_not_path_length() {
        let graph = make_horseshoe();
        let start = id(&graph, 0.0, 0.0);
        let end = id(&graph, 1.0, 0.0);

        // The ring's two ends are a single unit apart in the plane
        let hood = NeighborhoodExpander::new(&graph).expand(start, 1.0);
        assert_eq!(hood.len(), 1);
        assert_eq!(hood[0].vertex, end);
        assert_eq!(hood[0].distance, 1.0);
    }

    #[test]
    fn test_matches_brute_force_on_dense_grid() {
        let graph = make_strip(10);
        let expander = NeighborhoodExpander::new(&graph);
        let exact = BruteForceNeighborhood::new(&graph);

        for origin in graph.vertex_ids() {
            for radius in [0.5, 1.0, 1.5, 3.0] {
                assert_eq!(
                    expander.neighbors_within(origin, radius),
                    exact.neighbors_within(origin, radius),
                    "origin {origin} radius {radius}"
                );
            }
        }
    }

    #[test]
    fn test_shallow_walk_under_reports() {
        let graph = make_strip(10);
        let origin = id(&graph, 0.0, 0.0);
        let shallow = NeighborhoodExpander::new(&graph).with_max_depth(1);
        let exact = BruteForceNeighborhood::new(&graph);

        assert!(shallow.count_within(origin, 5.0) < exact.count_within(origin, 5.0));
    }
}
