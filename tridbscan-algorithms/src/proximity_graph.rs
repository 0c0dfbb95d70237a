//! Proximity graph construction from a triangle list
//!
//! The graph treats the triangulation's shared edges as a sparse adjacency
//! structure: every pair of corners of an input triangle becomes a mutual
//! neighbor relationship. Topology is fixed once built; only the per-vertex
//! classification fields change while the clustering engine runs.

use crate::cluster::ClusterId;
use crate::neighborhood::NeighborhoodExpander;
use crate::state::{Classification, VertexState};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use tridbscan_core::{Coordinate, Edge, Error, Result, Triangle};

/// Index of a vertex within its [`ProximityGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(usize);

impl VertexId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// One entry of a vertex's proximity list
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Proximity {
    pub vertex: VertexId,
    /// Straight-line distance to the owning vertex
    pub distance: f64,
}

/// A distinct coordinate of the triangulation together with its adjacency
/// and clustering state
#[derive(Debug, Clone)]
pub struct Vertex {
    id: VertexId,
    coordinate: Coordinate,
    neighbors: BTreeSet<VertexId>,
    edges: BTreeSet<Edge>,
    triangles: BTreeSet<usize>,
    state: VertexState,
    cluster: Option<ClusterId>,
    proximity: Vec<Proximity>,
}

impl Vertex {
    fn new(id: VertexId, coordinate: Coordinate) -> Self {
        Self {
            id,
            coordinate,
            neighbors: BTreeSet::new(),
            edges: BTreeSet::new(),
            triangles: BTreeSet::new(),
            state: VertexState::Pending,
            cluster: None,
            proximity: Vec::new(),
        }
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Vertices sharing at least one triangle with this one
    pub fn neighbors(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.neighbors.iter().copied()
    }

    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Edges touching this vertex
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter()
    }

    /// Indices into [`ProximityGraph::triangles`] of the triangles using this vertex
    pub fn triangle_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.triangles.iter().copied()
    }

    pub fn state(&self) -> VertexState {
        self.state
    }

    /// Cluster currently holding this vertex, if any. Lookup only: the
    /// cluster owns the membership.
    pub fn cluster(&self) -> Option<ClusterId> {
        self.cluster
    }

    /// Vertices within the clustering radius, sorted ascending by distance.
    ///
    /// Empty until [`ProximityGraph::assign_proximity_lists`] has run.
    pub fn proximity(&self) -> &[Proximity] {
        &self.proximity
    }

    /// Number of proximity entries no farther than `radius`
    pub fn density_within(&self, radius: f64) -> usize {
        // Sorted ascending, so the qualifying entries form a prefix
        self.proximity.partition_point(|p| p.distance <= radius)
    }

    fn link(&mut self, neighbor: VertexId, edge: Edge) {
        self.neighbors.insert(neighbor);
        self.edges.insert(edge);
    }

    /// Edges joining this vertex to `neighbor`
    fn edges_to(&self, neighbor: &Coordinate) -> usize {
        self.edges
            .iter()
            .filter(|e| e.opposite(&self.coordinate).as_ref() == Some(neighbor))
            .count()
    }

    pub(crate) fn ratchet(&mut self, target: Classification) -> VertexState {
        self.state = self.state.ratchet(target);
        self.state
    }

    pub(crate) fn set_cluster(&mut self, cluster: ClusterId) -> Option<ClusterId> {
        self.cluster.replace(cluster)
    }
}

/// Vertex graph derived from a triangulation
#[derive(Debug, Clone, Default)]
pub struct ProximityGraph {
    vertices: Vec<Vertex>,
    index: HashMap<Coordinate, VertexId>,
    triangles: Vec<Triangle>,
    duplicate_triangles: usize,
}

impl ProximityGraph {
    /// Build the graph from a triangle list.
    ///
    /// Repeated triangles (in any corner order) are skipped and counted.
    /// Non-finite coordinates, triangles with coincident corners and any
    /// vertex/neighbor pair without exactly one joining edge abort the build.
    ///
    /// # Example
    /// ```rust
    /// use tridbscan_core::{Coordinate, Triangle};
    /// use tridbscan_algorithms::ProximityGraph;
    ///
    /// fn main() -> tridbscan_core::Result<()> {
    ///     let a = Coordinate::new(0.0, 0.0);
    ///     let b = Coordinate::new(1.0, 0.0);
    ///     let c = Coordinate::new(0.0, 1.0);
    ///     let d = Coordinate::new(1.0, 1.0);
    ///
    ///     let graph = ProximityGraph::from_triangles(&[
    ///         Triangle::new(a, b, c),
    ///         Triangle::new(b, d, c),
    ///         Triangle::new(c, b, a),
    ///     ])?;
    ///
    ///     assert_eq!(graph.len(), 4);
    ///     assert_eq!(graph.duplicate_triangles(), 1);
    ///     Ok(())
    /// }
    /// ```
    pub fn from_triangles(triangles: &[Triangle]) -> Result<Self> {
        let mut graph = Self::default();
        let mut seen: HashSet<Triangle> = HashSet::with_capacity(triangles.len());

        for triangle in triangles {
            if let Some(bad) = triangle.points().iter().find(|p| !p.is_finite()) {
                return Err(Error::InvalidData(format!(
                    "non-finite coordinate {bad} in triangle {triangle}"
                )));
            }
            if triangle.is_degenerate() {
                return Err(Error::DegenerateTriangle {
                    triangle: *triangle,
                });
            }
            if !seen.insert(*triangle) {
                graph.duplicate_triangles += 1;
                tracing::debug!(%triangle, "skipping duplicate triangle");
                continue;
            }
            graph.insert_triangle(*triangle);
        }

        graph.verify_topology()?;

        tracing::debug!(
            vertices = graph.vertices.len(),
            triangles = graph.triangles.len(),
            duplicates = graph.duplicate_triangles,
            "built proximity graph"
        );
        Ok(graph)
    }

    fn insert_triangle(&mut self, triangle: Triangle) {
        let slot = self.triangles.len();
        self.triangles.push(triangle);

        let points = *triangle.points();
        let ids = points.map(|p| self.intern(p));

        for ((&a, pa), (&b, pb)) in ids.iter().zip(points.iter()).tuple_combinations() {
            let edge = Edge::new(*pa, *pb);
            self.vertices[a.0].link(b, edge);
            self.vertices[b.0].link(a, edge);
        }
        for id in ids {
            self.vertices[id.0].triangles.insert(slot);
        }
    }

    fn intern(&mut self, coordinate: Coordinate) -> VertexId {
        if let Some(&id) = self.index.get(&coordinate) {
            return id;
        }
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex::new(id, coordinate));
        self.index.insert(coordinate, id);
        id
    }

    /// Every neighbor relation must be mutual, never point back at the vertex
    /// itself, and be backed by exactly one incident edge. No incident edge
    /// may lead anywhere but to a neighbor.
    fn verify_topology(&self) -> Result<()> {
        for vertex in &self.vertices {
            for id in vertex.neighbors() {
                let other = &self.vertices[id.0];
                let matches = vertex.edges_to(&other.coordinate);
                let mutual = id != vertex.id && other.neighbors.contains(&vertex.id);
                if !mutual || matches != 1 {
                    return Err(Error::InconsistentTopology {
                        vertex: vertex.coordinate,
                        neighbor: other.coordinate,
                        matches,
                    });
                }
            }

            let stray = vertex.edges.iter().find(|edge| {
                edge.opposite(&vertex.coordinate)
                    .and_then(|end| self.index.get(&end))
                    .map_or(true, |id| !vertex.neighbors.contains(id))
            });
            if let Some(edge) = stray {
                return Err(Error::InconsistentTopology {
                    vertex: vertex.coordinate,
                    neighbor: edge.opposite(&vertex.coordinate).unwrap_or(edge.end()),
                    matches: 0,
                });
            }
        }
        Ok(())
    }

    /// Number of distinct vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertex by id.
    ///
    /// # Panics
    /// If `id` was not produced by this graph.
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    pub fn get(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.0)
    }

    pub(crate) fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.0]
    }

    /// Id of the vertex at exactly `coordinate`
    pub fn vertex_id(&self, coordinate: &Coordinate) -> Option<VertexId> {
        self.index.get(coordinate).copied()
    }

    /// Vertex at exactly `coordinate`
    pub fn vertex_at(&self, coordinate: &Coordinate) -> Result<&Vertex> {
        self.vertex_id(coordinate)
            .map(|id| self.vertex(id))
            .ok_or(Error::UnknownVertex(*coordinate))
    }

    /// Vertices in order of first appearance in the input
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices.iter()
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertices.len()).map(VertexId)
    }

    /// Distinct input triangles in order of first appearance
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// How many input triangles repeated an earlier one
    pub fn duplicate_triangles(&self) -> usize {
        self.duplicate_triangles
    }

    /// The single edge joining `a` to its neighbor `b`
    pub fn edge_between(&self, a: &Coordinate, b: &Coordinate) -> Result<&Edge> {
        let vertex = self.vertex_at(a)?;
        let found: Vec<&Edge> = vertex
            .edges
            .iter()
            .filter(|e| e.opposite(a).as_ref() == Some(b))
            .collect();
        match found.as_slice() {
            [edge] => Ok(*edge),
            _ => Err(Error::InconsistentTopology {
                vertex: *a,
                neighbor: *b,
                matches: found.len(),
            }),
        }
    }

    /// Input triangles containing `coordinate`, boundaries inclusive
    pub fn triangles_containing<'a>(
        &'a self,
        coordinate: &'a Coordinate,
    ) -> impl Iterator<Item = &'a Triangle> + 'a {
        self.triangles.iter().filter(move |t| t.contains(coordinate))
    }

    /// Fill every vertex's proximity list with the bounded-walk neighborhood
    /// for `radius`
    pub fn assign_proximity_lists(&mut self, radius: f64, max_depth: usize) {
        let lists: Vec<Vec<Proximity>> = {
            let expander = NeighborhoodExpander::new(self).with_max_depth(max_depth);
            self.vertex_ids()
                .map(|id| expander.expand(id, radius))
                .collect()
        };
        for (vertex, list) in self.vertices.iter_mut().zip(lists) {
            vertex.proximity = list;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    /// Unit square split along its (1,0)-(0,1) diagonal
    fn make_square() -> Vec<Triangle> {
        vec![
            Triangle::new(c(0.0, 0.0), c(1.0, 0.0), c(0.0, 1.0)),
            Triangle::new(c(1.0, 0.0), c(1.0, 1.0), c(0.0, 1.0)),
        ]
    }

    fn neighbor_coords(graph: &ProximityGraph, at: Coordinate) -> BTreeSet<Coordinate> {
        graph
            .vertex_at(&at)
            .unwrap()
            .neighbors()
            .map(|id| graph.vertex(id).coordinate())
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let graph = ProximityGraph::from_triangles(&[]).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.duplicate_triangles(), 0);
    }

    #[test]
    fn test_square_topology() {
        let graph = ProximityGraph::from_triangles(&make_square()).unwrap();

        assert_eq!(graph.len(), 4);
        assert_eq!(graph.triangles().len(), 2);

        // Diagonal endpoints see all three others, the far corners only two
        assert_eq!(neighbor_coords(&graph, c(1.0, 0.0)).len(), 3);
        assert_eq!(neighbor_coords(&graph, c(0.0, 1.0)).len(), 3);
        assert_eq!(
            neighbor_coords(&graph, c(0.0, 0.0)),
            [c(1.0, 0.0), c(0.0, 1.0)].into_iter().collect::<BTreeSet<_>>()
        );
        assert_eq!(
            neighbor_coords(&graph, c(1.0, 1.0)),
            [c(1.0, 0.0), c(0.0, 1.0)].into_iter().collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn test_neighbors_are_union_of_triangle_corners() {
        let graph = ProximityGraph::from_triangles(&make_square()).unwrap();

        for vertex in graph.vertices() {
            let at = vertex.coordinate();
            let expected: BTreeSet<Coordinate> = vertex
                .triangle_indices()
                .flat_map(|i| graph.triangles()[i].others(&at).unwrap())
                .collect();
            assert_eq!(neighbor_coords(&graph, at), expected);
            assert_eq!(vertex.edges().count(), vertex.neighbor_count());
            assert!(vertex.edges().all(|e| e.touches(&at)));
        }
    }

    #[test]
    fn test_incident_triangles() {
        let graph = ProximityGraph::from_triangles(&make_square()).unwrap();

        let shared = graph.vertex_at(&c(1.0, 0.0)).unwrap();
        assert_eq!(shared.triangle_indices().count(), 2);

        let corner = graph.vertex_at(&c(0.0, 0.0)).unwrap();
        assert_eq!(corner.triangle_indices().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_duplicates_are_counted_not_applied() {
        let mut triangles = make_square();
        triangles.push(Triangle::new(c(0.0, 1.0), c(0.0, 0.0), c(1.0, 0.0)));
        triangles.push(triangles[1]);

        let graph = ProximityGraph::from_triangles(&triangles).unwrap();
        let clean = ProximityGraph::from_triangles(&make_square()).unwrap();

        assert_eq!(graph.duplicate_triangles(), 2);
        assert_eq!(graph.triangles().len(), 2);
        for vertex in clean.vertices() {
            let at = vertex.coordinate();
            assert_eq!(neighbor_coords(&graph, at), neighbor_coords(&clean, at));
        }
    }

    #[test]
    fn test_degenerate_triangle_is_rejected() {
        let triangles = vec![
            Triangle::new(c(0.0, 0.0), c(1.0, 0.0), c(0.0, 1.0)),
            Triangle::new(c(2.0, 2.0), c(3.0, 3.0), c(2.0, 2.0)),
        ];

        let err = ProximityGraph::from_triangles(&triangles).unwrap_err();
        assert!(matches!(err, Error::DegenerateTriangle { .. }));
        assert!(err.is_construction_error());
    }

    #[test]
    fn test_non_finite_coordinate_is_rejected() {
        let triangles = vec![Triangle::new(c(0.0, 0.0), c(f64::NAN, 0.0), c(0.0, 1.0))];

        let err = ProximityGraph::from_triangles(&triangles).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_edge_between() {
        let graph = ProximityGraph::from_triangles(&make_square()).unwrap();

        let edge = graph.edge_between(&c(1.0, 0.0), &c(0.0, 1.0)).unwrap();
        assert_relative_eq!(edge.length(), 2.0_f64.sqrt(), epsilon = 1e-12);

        let err = graph.edge_between(&c(0.0, 0.0), &c(1.0, 1.0)).unwrap_err();
        assert_eq!(
            err,
            Error::InconsistentTopology {
                vertex: c(0.0, 0.0),
                neighbor: c(1.0, 1.0),
                matches: 0,
            }
        );

        let err = graph.edge_between(&c(9.0, 9.0), &c(0.0, 0.0)).unwrap_err();
        assert_eq!(err, Error::UnknownVertex(c(9.0, 9.0)));
    }

    #[test]
    fn test_deserialized_triangles_are_checked_like_built_ones() {
        let triangles: Vec<Triangle> = serde_json::from_str(
            "[[[0.0,0.0],[1.0,0.0],[0.0,1.0]], [[0.0,1.0],[0.0,0.0],[1.0,0.0]]]",
        )
        .unwrap();
        let graph = ProximityGraph::from_triangles(&triangles).unwrap();
        assert_eq!(graph.duplicate_triangles(), 1);

        let triangles: Vec<Triangle> =
            serde_json::from_str("[[[0.0,0.0],[1.0,0.0],[0.0,0.0]]]").unwrap();
        let err = ProximityGraph::from_triangles(&triangles).unwrap_err();
        assert!(matches!(err, Error::DegenerateTriangle { .. }));
    }

    // ---- Topology check tests ----

    fn corrupt_square() -> (ProximityGraph, VertexId, VertexId) {
        let graph = ProximityGraph::from_triangles(&make_square()).unwrap();
        let corner = graph.vertex_id(&c(0.0, 0.0)).unwrap();
        let far = graph.vertex_id(&c(1.0, 1.0)).unwrap();
        (graph, corner, far)
    }

    #[test]
    fn test_topology_rejects_self_neighbor() {
        let (mut graph, corner, _) = corrupt_square();
        graph.vertices[corner.0].neighbors.insert(corner);

        assert_eq!(
            graph.verify_topology().unwrap_err(),
            Error::InconsistentTopology {
                vertex: c(0.0, 0.0),
                neighbor: c(0.0, 0.0),
                matches: 0,
            }
        );
    }

    #[test]
    fn test_topology_rejects_one_sided_neighbor() {
        let (mut graph, corner, far) = corrupt_square();
        graph.vertices[corner.0].link(far, Edge::new(c(0.0, 0.0), c(1.0, 1.0)));

        assert_eq!(
            graph.verify_topology().unwrap_err(),
            Error::InconsistentTopology {
                vertex: c(0.0, 0.0),
                neighbor: c(1.0, 1.0),
                matches: 1,
            }
        );
    }

    #[test]
    fn test_topology_rejects_edge_without_neighbor() {
        let (mut graph, corner, _) = corrupt_square();
        graph.vertices[corner.0]
            .edges
            .insert(Edge::new(c(0.0, 0.0), c(1.0, 1.0)));

        let err = graph.verify_topology().unwrap_err();
        assert_eq!(
            err,
            Error::InconsistentTopology {
                vertex: c(0.0, 0.0),
                neighbor: c(1.0, 1.0),
                matches: 0,
            }
        );
        assert!(err.is_construction_error());
    }

    #[test]
    fn test_topology_accepts_built_graph() {
        let (graph, _, _) = corrupt_square();
        assert!(graph.verify_topology().is_ok());
    }

    #[test]
    fn test_triangles_containing() {
        let graph = ProximityGraph::from_triangles(&make_square()).unwrap();

        let inside_first = c(0.2, 0.2);
        assert_eq!(graph.triangles_containing(&inside_first).count(), 1);

        // On the shared diagonal
        let on_diagonal = c(0.5, 0.5);
        assert_eq!(graph.triangles_containing(&on_diagonal).count(), 2);

        let outside = c(2.0, 2.0);
        assert_eq!(graph.triangles_containing(&outside).count(), 0);
    }

    #[test]
    fn test_initial_state() {
        let graph = ProximityGraph::from_triangles(&make_square()).unwrap();
        for vertex in graph.vertices() {
            assert_eq!(vertex.state(), VertexState::Pending);
            assert_eq!(vertex.cluster(), None);
            assert!(vertex.proximity().is_empty());
        }
    }

    #[test]
    fn test_assign_proximity_lists() {
        let mut graph = ProximityGraph::from_triangles(&make_square()).unwrap();
        graph.assign_proximity_lists(1.0, 6);

        // Radius 1 reaches the two axis neighbors but not the sqrt(2) diagonal
        let corner = graph.vertex_at(&c(0.0, 0.0)).unwrap();
        assert_eq!(corner.proximity().len(), 2);
        assert_eq!(corner.density_within(0.5), 0);
        assert_eq!(corner.density_within(1.0), 2);

        let shared = graph.vertex_at(&c(1.0, 0.0)).unwrap();
        let distances: Vec<f64> = shared.proximity().iter().map(|p| p.distance).collect();
        assert_eq!(distances, vec![1.0, 1.0]);
    }
}
