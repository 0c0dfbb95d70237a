//! Per-vertex classification state machine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a vertex during and after a clustering run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VertexState {
    /// Not yet classified. Initial only, never re-entered.
    #[default]
    Pending,
    /// Neighborhood holds at least `min_pts` vertices
    Core,
    /// Inside a core vertex's neighborhood without being core itself
    Border,
    /// Neither core nor reached from any core vertex (so far)
    Noise,
}

/// Target of a [`VertexState::ratchet`] request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Core,
    Border,
    Noise,
}

impl VertexState {
    /// Transition towards `target` without ever leaving `Core`.
    ///
    /// | current \ target | Core | Border | Noise   |
    /// |------------------|------|--------|---------|
    /// | Pending          | Core | Border | Noise   |
    /// | Core             | Core | Core   | Core    |
    /// | Border           | Core | Border | Border  |
    /// | Noise            | Core | Border | Noise   |
    pub fn ratchet(self, target: Classification) -> VertexState {
        match (self, target) {
            (_, Classification::Core) => VertexState::Core,
            (VertexState::Core, Classification::Border) => VertexState::Core,
            (_, Classification::Border) => VertexState::Border,
            (VertexState::Pending, Classification::Noise) => VertexState::Noise,
            (current, Classification::Noise) => current,
        }
    }

    /// Whether the vertex belongs to some cluster's reach
    pub fn is_clustered(self) -> bool {
        matches!(self, VertexState::Core | VertexState::Border)
    }
}

impl From<Classification> for VertexState {
    fn from(classification: Classification) -> Self {
        match classification {
            Classification::Core => VertexState::Core,
            Classification::Border => VertexState::Border,
            Classification::Noise => VertexState::Noise,
        }
    }
}

impl fmt::Display for VertexState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VertexState::Pending => "pending",
            VertexState::Core => "core",
            VertexState::Border => "border",
            VertexState::Noise => "noise",
        };
        f.write_str(name)
    }
}
