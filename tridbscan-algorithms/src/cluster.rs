//! Cluster model and membership bookkeeping

use crate::proximity_graph::{ProximityGraph, VertexId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tridbscan_core::Coordinate;

/// Cluster identity, assigned in creation order starting at zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClusterId(usize);

impl ClusterId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Display tag distinguishing clusters: a hue in `[0, 1)`.
///
/// Consecutive ids step around the hue circle by the golden-ratio conjugate,
/// which keeps neighboring ids visually far apart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterTag {
    hue: f64,
}

impl ClusterTag {
    const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_895;

    pub fn for_id(id: ClusterId) -> Self {
        Self {
            hue: (id.0 as f64 * Self::GOLDEN_RATIO_CONJUGATE).fract(),
        }
    }

    pub fn hue(&self) -> f64 {
        self.hue
    }
}

/// A group of vertices. The cluster owns its membership; vertices only hold
/// a lookup reference back to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    id: ClusterId,
    tag: ClusterTag,
    members: BTreeSet<VertexId>,
}

impl Cluster {
    fn new(id: ClusterId) -> Self {
        Self {
            id,
            tag: ClusterTag::for_id(id),
            members: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> ClusterId {
        self.id
    }

    pub fn tag(&self) -> ClusterTag {
        self.tag
    }

    pub fn members(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.members.iter().copied()
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        self.members.contains(&vertex)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// A cluster can be emptied when every member is claimed by later clusters
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A vertex moved from one cluster to another.
///
/// The two clusters are left disjoint rather than merged; each move is
/// recorded so callers can see where a union-based scheme would differ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reassignment {
    pub vertex: VertexId,
    pub coordinate: Coordinate,
    pub from: ClusterId,
    pub to: ClusterId,
}

/// All clusters of one run, indexed by [`ClusterId`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClusterSet {
    clusters: Vec<Cluster>,
}

impl ClusterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cluster with the next id
    pub fn create(&mut self) -> ClusterId {
        let id = ClusterId(self.clusters.len());
        self.clusters.push(Cluster::new(id));
        id
    }

    /// Put `vertex` into `cluster`, updating the vertex's back-reference.
    ///
    /// When the vertex already sits in a different cluster it is moved (last
    /// write wins) and the move is returned as an anomaly.
    ///
    /// # Panics
    /// If `cluster` was not created by this set.
    pub fn assign(
        &mut self,
        graph: &mut ProximityGraph,
        cluster: ClusterId,
        vertex: VertexId,
    ) -> Option<Reassignment> {
        self.clusters[cluster.0].members.insert(vertex);

        let previous = graph.vertex_mut(vertex).set_cluster(cluster)?;
        if previous == cluster {
            return None;
        }

        self.clusters[previous.0].members.remove(&vertex);
        let coordinate = graph.vertex(vertex).coordinate();
        tracing::warn!(
            %vertex,
            %coordinate,
            from = %previous,
            to = %cluster,
            "vertex reassigned between clusters"
        );
        Some(Reassignment {
            vertex,
            coordinate,
            from: previous,
            to: cluster,
        })
    }

    pub fn get(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cluster> + '_ {
        self.clusters.iter()
    }

    pub fn as_slice(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Number of clusters ever created, including emptied ones
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}
