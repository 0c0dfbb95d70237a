//! Density-based clustering over a triangulation
//!
//! Classic DBSCAN answers "who is within `radius` of this point" with a
//! spatial index. Here the triangulation already encodes locality, so each
//! neighborhood comes from a bounded walk of the [`ProximityGraph`] instead
//! (see [`crate::neighborhood`] for the approximation this implies).
//!
//! Every vertex is visited once, sparsest regions first. A vertex whose
//! neighborhood holds at least `min_pts` vertices becomes core, opens a
//! cluster if it has none yet, and pulls its whole neighborhood into that
//! cluster as border points. Otherwise it is marked noise, which a later core
//! may still upgrade to border.
//!
//! A border point reachable from two cores ends up in whichever cluster
//! claimed it last. The clusters are not unioned as canonical DBSCAN would;
//! each such move is reported in [`Diagnostics::reassignments`].

use crate::cluster::{Cluster, ClusterId, ClusterSet, Reassignment};
use crate::neighborhood::DEFAULT_MAX_DEPTH;
use crate::proximity_graph::{ProximityGraph, Vertex, VertexId};
use crate::state::{Classification, VertexState};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tridbscan_core::{Coordinate, Error, Result, Triangle};

/// Default sub-radius used to rank vertices by local density
pub const DEFAULT_EXPLORATORY_RADIUS: f64 = 10.0;

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_exploratory_radius() -> f64 {
    DEFAULT_EXPLORATORY_RADIUS
}

/// Configuration for a clustering run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DbscanConfig {
    /// Neighborhood distance threshold, in coordinate units
    pub radius: f64,
    /// Minimum neighborhood size (inclusive) for a core vertex
    pub min_pts: usize,
    /// Hop-depth bound of the neighborhood walk
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Sub-radius whose neighbor count orders processing, sparsest first
    #[serde(default = "default_exploratory_radius")]
    pub exploratory_radius: f64,
}

impl DbscanConfig {
    pub fn new(radius: f64, min_pts: usize) -> Self {
        Self {
            radius,
            min_pts,
            max_depth: DEFAULT_MAX_DEPTH,
            exploratory_radius: DEFAULT_EXPLORATORY_RADIUS,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_exploratory_radius(mut self, exploratory_radius: f64) -> Self {
        self.exploratory_radius = exploratory_radius;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "radius must be positive and finite, got {}",
                self.radius
            )));
        }
        if self.min_pts == 0 {
            return Err(Error::InvalidConfig("min_pts must be at least 1".to_string()));
        }
        if self.max_depth == 0 {
            return Err(Error::InvalidConfig("max_depth must be at least 1".to_string()));
        }
        if !(self.exploratory_radius.is_finite() && self.exploratory_radius > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "exploratory_radius must be positive and finite, got {}",
                self.exploratory_radius
            )));
        }
        Ok(())
    }
}

/// Recoverable oddities observed during a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    /// Input triangles skipped because they repeated an earlier one
    pub duplicate_triangles: usize,
    /// Vertices moved between clusters, in the order the moves happened
    pub reassignments: Vec<Reassignment>,
}

impl Diagnostics {
    pub fn has_anomalies(&self) -> bool {
        !self.reassignments.is_empty()
    }
}

/// Clustering engine over triangulated input
#[derive(Debug, Clone)]
pub struct TriangulationDbscan {
    config: DbscanConfig,
}

impl TriangulationDbscan {
    pub fn new(config: DbscanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DbscanConfig {
        &self.config
    }

    /// Cluster the vertices of `triangles`.
    ///
    /// Builds a fresh [`ProximityGraph`], so nothing carries over between runs.
    pub fn run(&self, triangles: &[Triangle]) -> Result<Clustering> {
        let mut graph = ProximityGraph::from_triangles(triangles)?;
        graph.assign_proximity_lists(self.config.radius, self.config.max_depth);

        let mut clusters = ClusterSet::new();
        let mut reassignments = Vec::new();
        for id in self.processing_order(&graph) {
            self.process(&mut graph, &mut clusters, &mut reassignments, id);
        }

        let clustering = Clustering {
            diagnostics: Diagnostics {
                duplicate_triangles: graph.duplicate_triangles(),
                reassignments,
            },
            config: self.config,
            graph,
            clusters,
        };

        let summary = clustering.summary();
        tracing::debug!(
            vertices = summary.vertices,
            clusters = summary.clusters,
            core = summary.core,
            border = summary.border,
            noise = summary.noise,
            reassignments = summary.reassignments,
            "clustering finished"
        );
        Ok(clustering)
    }

    /// Work list ordered by ascending exploratory density.
    ///
    /// Densities are fixed once the proximity lists exist, so a single stable
    /// sort visits vertices in the same order as re-sorting the remainder
    /// before every pop. Ties keep first-appearance order.
    fn processing_order(&self, graph: &ProximityGraph) -> Vec<VertexId> {
        graph
            .vertices()
            .map(|v| (v.density_within(self.config.exploratory_radius), v.id()))
            .sorted_by_key(|&(density, _)| density)
            .map(|(_, id)| id)
            .collect()
    }

    fn process(
        &self,
        graph: &mut ProximityGraph,
        clusters: &mut ClusterSet,
        reassignments: &mut Vec<Reassignment>,
        id: VertexId,
    ) {
        let vertex = graph.vertex(id);
        if matches!(vertex.state(), VertexState::Core | VertexState::Noise) {
            tracing::trace!(%id, state = %vertex.state(), "already settled");
            return;
        }

        // The proximity list is exactly the bounded-walk neighborhood for `radius`
        let hood: Vec<VertexId> = vertex.proximity().iter().map(|p| p.vertex).collect();
        if hood.len() < self.config.min_pts {
            let state = graph.vertex_mut(id).ratchet(Classification::Noise);
            tracing::trace!(%id, hood = hood.len(), %state, "below min_pts");
            return;
        }

        graph.vertex_mut(id).ratchet(Classification::Core);
        let cluster = match graph.vertex(id).cluster() {
            Some(cluster) => cluster,
            None => {
                let cluster = clusters.create();
                reassignments.extend(clusters.assign(graph, cluster, id));
                cluster
            }
        };
        tracing::trace!(%id, hood = hood.len(), %cluster, "core");

        for neighbor in hood {
            graph.vertex_mut(neighbor).ratchet(Classification::Border);
            reassignments.extend(clusters.assign(graph, cluster, neighbor));
        }
    }
}

/// Cluster `triangles` with the default walk depth and exploratory radius
///
/// # Arguments
/// * `triangles` - Triangles from an external triangulation of the points
/// * `radius` - Neighborhood distance threshold
/// * `min_pts` - Minimum neighborhood size (inclusive) for a core vertex
///
/// # Returns
/// * `Result<Clustering>` - Per-vertex state and cluster plus the clusters themselves
///
/// # Example
/// ```rust
/// use tridbscan_core::{Coordinate, Triangle};
/// use tridbscan_algorithms::{run, VertexState};
///
/// fn main() -> tridbscan_core::Result<()> {
///     let c = Coordinate::new;
///     let triangles = vec![
///         Triangle::new(c(0.0, 0.0), c(1.0, 0.0), c(0.0, 1.0)),
///         Triangle::new(c(1.0, 0.0), c(1.0, 1.0), c(0.0, 1.0)),
///     ];
///
///     let clustering = run(&triangles, 2.0, 3)?;
///     assert_eq!(clustering.partition().len(), 1);
///     assert_eq!(clustering.state_of(&c(1.0, 1.0))?, VertexState::Core);
///     Ok(())
/// }
/// ```
pub fn run(triangles: &[Triangle], radius: f64, min_pts: usize) -> Result<Clustering> {
    TriangulationDbscan::new(DbscanConfig::new(radius, min_pts))?.run(triangles)
}

/// Outcome of a clustering run
#[derive(Debug, Clone)]
pub struct Clustering {
    config: DbscanConfig,
    graph: ProximityGraph,
    clusters: ClusterSet,
    diagnostics: Diagnostics,
}

impl Clustering {
    pub fn config(&self) -> &DbscanConfig {
        &self.config
    }

    /// The graph with every vertex's final state and cluster
    pub fn graph(&self) -> &ProximityGraph {
        &self.graph
    }

    /// Every cluster created, indexed by id. Emptied clusters are kept.
    pub fn clusters(&self) -> &[Cluster] {
        self.clusters.as_slice()
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(id)
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn state_of(&self, coordinate: &Coordinate) -> Result<VertexState> {
        Ok(self.graph.vertex_at(coordinate)?.state())
    }

    pub fn cluster_of(&self, coordinate: &Coordinate) -> Result<Option<ClusterId>> {
        Ok(self.graph.vertex_at(coordinate)?.cluster())
    }

    /// Vertices in a given final state
    pub fn vertices_in(&self, state: VertexState) -> impl Iterator<Item = &Vertex> + '_ {
        self.graph.vertices().filter(move |v| v.state() == state)
    }

    pub fn noise(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices_in(VertexState::Noise)
    }

    /// Non-empty clusters as coordinate sets, independent of cluster ids
    pub fn partition(&self) -> BTreeSet<BTreeSet<Coordinate>> {
        self.clusters
            .iter()
            .filter(|c| !c.is_empty())
            .map(|c| {
                c.members()
                    .map(|id| self.graph.vertex(id).coordinate())
                    .collect()
            })
            .collect()
    }

    pub fn summary(&self) -> ClusteringSummary {
        let count = |state| self.vertices_in(state).count();
        let cluster_sizes: Vec<(ClusterId, usize)> = self
            .clusters
            .iter()
            .filter(|c| !c.is_empty())
            .map(|c| (c.id(), c.len()))
            .collect();

        ClusteringSummary {
            vertices: self.graph.len(),
            triangles: self.graph.triangles().len(),
            duplicate_triangles: self.diagnostics.duplicate_triangles,
            clusters: cluster_sizes.len(),
            empty_clusters: self.clusters.len() - cluster_sizes.len(),
            core: count(VertexState::Core),
            border: count(VertexState::Border),
            noise: count(VertexState::Noise),
            pending: count(VertexState::Pending),
            reassignments: self.diagnostics.reassignments.len(),
            cluster_sizes,
        }
    }
}

/// Flat counts describing a run, for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusteringSummary {
    pub vertices: usize,
    pub triangles: usize,
    pub duplicate_triangles: usize,
    /// Non-empty clusters
    pub clusters: usize,
    pub empty_clusters: usize,
    pub core: usize,
    pub border: usize,
    pub noise: usize,
    pub pending: usize,
    pub reassignments: usize,
    pub cluster_sizes: Vec<(ClusterId, usize)>,
}
