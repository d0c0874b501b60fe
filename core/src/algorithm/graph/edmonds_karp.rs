//! Edmonds-Karp maximum flow
//!
//! Ford-Fulkerson with breadth-first path selection: every phase augments
//! along a shortest (by edge count) source-sink path in the residual graph,
//! which bounds the number of phases by O(V * E).

use std::collections::VecDeque;

use log::{debug, trace};

use crate::algorithm::traits::MaxFlowSolver;
use crate::data_structures::graph::{Capacity, NodeId, ResidualGraph, INFINITE_CAPACITY};

/// Predecessor record for a vertex discovered by the BFS
#[derive(Debug, Clone, Copy)]
struct Discovery {
    /// Vertex the edge leaves
    parent: NodeId,
    /// Index of the edge in `adjacency[parent]`
    edge_index: usize,
}

/// Edmonds-Karp solver with reusable BFS buffers
#[derive(Debug, Default, Clone)]
pub struct EdmondsKarp {
    discovered: Vec<Option<Discovery>>,
    queue: VecDeque<(NodeId, Capacity)>,
    augmentations: usize,
}

impl EdmondsKarp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Augmenting paths applied by the last call
    pub fn augmentations(&self) -> usize {
        self.augmentations
    }

    /// Shortest augmenting path search; returns the bottleneck reaching
    /// `sink`, or `None` when the sink is unreachable.
    fn find_path(
        &mut self,
        graph: &ResidualGraph,
        source: NodeId,
        sink: NodeId,
    ) -> Option<Capacity> {
        self.discovered.clear();
        self.discovered.resize(graph.vertex_count(), None);
        self.queue.clear();

        // The source is its own parent so it is never rediscovered
        self.discovered[source] = Some(Discovery {
            parent: source,
            edge_index: usize::MAX,
        });
        self.queue.push_back((source, INFINITE_CAPACITY));

        while let Some((vertex, bottleneck)) = self.queue.pop_front() {
            if vertex == sink {
                return Some(bottleneck);
            }

            for (edge_index, edge) in graph.edges(vertex).iter().enumerate() {
                if edge.capacity() > 0 && self.discovered[edge.to()].is_none() {
                    self.discovered[edge.to()] = Some(Discovery {
                        parent: vertex,
                        edge_index,
                    });
                    self.queue.push_back((edge.to(), bottleneck.min(edge.capacity())));
                }
            }
        }

        None
    }

    /// Push `amount` along the predecessor chain from `sink` back to `source`
    fn augment(&self, graph: &mut ResidualGraph, source: NodeId, sink: NodeId, amount: Capacity) {
        let mut vertex = sink;
        while vertex != source {
            let Some(Discovery { parent, edge_index }) = self.discovered[vertex] else {
                unreachable!("vertex {} on augmenting path was never discovered", vertex);
            };
            graph.push_flow(parent, edge_index, amount);
            vertex = parent;
        }
    }
}

impl MaxFlowSolver for EdmondsKarp {
    fn name(&self) -> &'static str {
        "Edmonds-Karp"
    }

    fn max_flow(&mut self, graph: &mut ResidualGraph, source: NodeId, sink: NodeId) -> Capacity {
        debug_assert!(source < graph.vertex_count(), "source {} out of range", source);
        debug_assert!(sink < graph.vertex_count(), "sink {} out of range", sink);

        self.augmentations = 0;
        if source == sink {
            return 0;
        }

        let mut flow: Capacity = 0;
        while let Some(path_flow) = self.find_path(graph, source, sink) {
            trace!("augmenting path #{} carries {}", self.augmentations + 1, path_flow);
            self.augment(graph, source, sink, path_flow);
            flow += path_flow;
            self.augmentations += 1;
        }

        debug!(
            "Edmonds-Karp {} -> {}: flow {} after {} augmentations",
            source, sink, flow, self.augmentations
        );
        flow
    }
}
