//! Dinic maximum flow
//!
//! Alternates two steps until the sink becomes unreachable:
//! 1. BFS from the source assigns every reachable vertex its distance
//!    (level) in the residual graph
//! 2. Repeated DFS along level-increasing edges saturates the level graph
//!    (blocking flow)
//!
//! Each vertex keeps a current-arc cursor into its edge list. The cursor
//! only advances past an edge once that edge has failed to carry flow in
//! the current phase, so dead ends are never rescanned within a phase.
//! The sink's level strictly grows per phase, giving O(V^2 * E) overall.

use std::collections::VecDeque;

use log::{debug, trace};

use crate::algorithm::traits::MaxFlowSolver;
use crate::data_structures::graph::{Capacity, NodeId, ResidualGraph, INFINITE_CAPACITY};

/// Dinic solver owning its per-phase level and current-arc buffers
#[derive(Debug, Default, Clone)]
pub struct Dinic {
    /// BFS distance from the source, `None` when unreached
    level: Vec<Option<usize>>,
    /// Next edge index to examine per vertex
    current_arc: Vec<usize>,
    queue: VecDeque<NodeId>,
    phases: usize,
}

impl Dinic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level-graph phases run by the last call
    pub fn phases(&self) -> usize {
        self.phases
    }

    /// Level of `vertex` as of the last BFS
    pub fn level(&self, vertex: NodeId) -> Option<usize> {
        self.level.get(vertex).copied().flatten()
    }

    /// Assign BFS levels from `source`; true when `sink` is reachable
    fn build_levels(&mut self, graph: &ResidualGraph, source: NodeId, sink: NodeId) -> bool {
        self.level.clear();
        self.level.resize(graph.vertex_count(), None);
        self.queue.clear();

        self.level[source] = Some(0);
        self.queue.push_back(source);

        while let Some(vertex) = self.queue.pop_front() {
            let next = self.level[vertex].map(|level| level + 1);
            for edge in graph.edges(vertex) {
                if edge.capacity() > 0 && self.level[edge.to()].is_none() {
                    self.level[edge.to()] = next;
                    self.queue.push_back(edge.to());
                }
            }
        }

        self.level[sink].is_some()
    }

    /// Find one level-graph path from `vertex` to `sink` carrying at most
    /// `budget`, apply it, and return the amount pushed (0 if none).
    fn push_blocking(
        &mut self,
        graph: &mut ResidualGraph,
        vertex: NodeId,
        sink: NodeId,
        budget: Capacity,
    ) -> Capacity {
        if vertex == sink || budget == 0 {
            return budget;
        }

        let next_level = self.level[vertex].map(|level| level + 1);
        while self.current_arc[vertex] < graph.edges(vertex).len() {
            let index = self.current_arc[vertex];
            let edge = graph.edges(vertex)[index];

            if edge.capacity() > 0 && self.level[edge.to()] == next_level {
                let limit = budget.min(edge.capacity());
                let pushed = self.push_blocking(graph, edge.to(), sink, limit);
                if pushed > 0 {
                    graph.push_flow(vertex, index, pushed);
                    return pushed;
                }
            }

            self.current_arc[vertex] += 1;
        }

        0
    }
}

impl MaxFlowSolver for Dinic {
    fn name(&self) -> &'static str {
        "Dinic"
    }

    fn max_flow(&mut self, graph: &mut ResidualGraph, source: NodeId, sink: NodeId) -> Capacity {
        debug_assert!(source < graph.vertex_count(), "source {} out of range", source);
        debug_assert!(sink < graph.vertex_count(), "sink {} out of range", sink);

        self.phases = 0;
        if source == sink {
            return 0;
        }

        let mut flow: Capacity = 0;
        while self.build_levels(graph, source, sink) {
            self.phases += 1;
            self.current_arc.clear();
            self.current_arc.resize(graph.vertex_count(), 0);

            let mut phase_flow: Capacity = 0;
            loop {
                let pushed = self.push_blocking(graph, source, sink, INFINITE_CAPACITY);
                if pushed == 0 {
                    break;
                }
                phase_flow += pushed;
            }

            trace!(
                "phase {}: sink level {:?}, blocking flow {}",
                self.phases,
                self.level[sink],
                phase_flow
            );
            flow += phase_flow;
        }

        debug!(
            "Dinic {} -> {}: flow {} after {} phases",
            source, sink, flow, self.phases
        );
        flow
    }
}
