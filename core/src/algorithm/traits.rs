//! Core solver trait definitions
//!
//! Every maximum flow strategy consumes a [`ResidualGraph`] by mutable
//! reference, runs to completion and leaves the graph in its final residual
//! state. Solver values own only scratch buffers, so one value can be reused
//! across many graphs.

use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};

use crate::algorithm::graph::dinic::Dinic;
use crate::algorithm::graph::edmonds_karp::EdmondsKarp;
use crate::data_structures::graph::{Capacity, NodeId, ResidualGraph};

/// Maximum flow strategy over a residual graph
///
/// # Contract
/// - `source` and `sink` are valid vertices of `graph`
/// - Returns the value of a maximum flow; `source == sink` yields 0
/// - The graph is never restored; callers snapshot beforehand when needed
pub trait MaxFlowSolver: Debug + Send {
    /// Human readable algorithm name
    fn name(&self) -> &'static str;

    /// Compute the maximum flow from `source` to `sink`
    fn max_flow(&mut self, graph: &mut ResidualGraph, source: NodeId, sink: NodeId) -> Capacity;
}

/// Available maximum flow algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFlowAlgorithm {
    /// Edmonds-Karp with BFS shortest augmenting paths
    EdmondsKarp,
    /// Dinic with level graphs and current-arc blocking flow
    Dinic,
}

impl MaxFlowAlgorithm {
    pub const ALL: [MaxFlowAlgorithm; 2] = [MaxFlowAlgorithm::EdmondsKarp, MaxFlowAlgorithm::Dinic];

    pub fn name(self) -> &'static str {
        match self {
            MaxFlowAlgorithm::EdmondsKarp => "Edmonds-Karp",
            MaxFlowAlgorithm::Dinic => "Dinic",
        }
    }

    /// Asymptotic running time bound
    pub fn complexity(self) -> &'static str {
        match self {
            MaxFlowAlgorithm::EdmondsKarp => "O(V * E^2)",
            MaxFlowAlgorithm::Dinic => "O(V^2 * E)",
        }
    }

    /// Fresh solver instance for this algorithm
    pub fn solver(self) -> Box<dyn MaxFlowSolver> {
        match self {
            MaxFlowAlgorithm::EdmondsKarp => Box::new(EdmondsKarp::new()),
            MaxFlowAlgorithm::Dinic => Box::new(Dinic::new()),
        }
    }
}

impl Display for MaxFlowAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
