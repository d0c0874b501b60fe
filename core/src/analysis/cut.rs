//! Minimum cut extraction from a final residual graph
//!
//! After a maximum flow run, the vertices still reachable from the source
//! through positive residual capacity form the source side of a minimum
//! cut. Its capacity, measured on the original graph, equals the flow value.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::data_structures::graph::{Capacity, EdgeRef, NodeId, ResidualGraph};

/// Source/sink partition with the forward edges crossing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinCut {
    /// `true` for vertices on the source side
    pub source_side: Vec<bool>,
    /// Forward edges leaving the source side
    pub cut_edges: Vec<EdgeRef>,
    /// Total original capacity of `cut_edges`
    pub capacity: Capacity,
}

impl MinCut {
    /// Derive the cut from `residual`, using `original` (the pre-solve
    /// snapshot) for edge capacities.
    pub fn from_residual(
        original: &ResidualGraph,
        residual: &ResidualGraph,
        source: NodeId,
    ) -> Self {
        debug_assert!(original.same_structure(residual));

        let source_side = reachable_from(residual, source);
        let cut_edges: Vec<EdgeRef> = original
            .forward_edges()
            .filter(|&edge| source_side[edge.from] && !source_side[original.edge(edge).to()])
            .collect();
        let capacity = cut_edges.iter().map(|&edge| original.residual(edge)).sum();

        Self {
            source_side,
            cut_edges,
            capacity,
        }
    }

    pub fn contains(&self, vertex: NodeId) -> bool {
        self.source_side.get(vertex).copied().unwrap_or(false)
    }

    /// Vertices on the source side, ascending
    pub fn source_vertices(&self) -> Vec<NodeId> {
        self.source_side
            .iter()
            .enumerate()
            .filter_map(|(vertex, &inside)| inside.then_some(vertex))
            .collect()
    }
}

/// Vertices reachable from `source` over positive residual capacity
pub fn reachable_from(graph: &ResidualGraph, source: NodeId) -> Vec<bool> {
    let mut seen = vec![false; graph.vertex_count()];
    let mut queue = VecDeque::from([source]);
    seen[source] = true;

    while let Some(vertex) = queue.pop_front() {
        for edge in graph.edges(vertex) {
            if edge.capacity() > 0 && !seen[edge.to()] {
                seen[edge.to()] = true;
                queue.push_back(edge.to());
            }
        }
    }

    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::graph::max_flow::dinic;

    #[test]
    fn test_diamond_cut() {
        let mut graph = ResidualGraph::new(4);
        graph.add_edge(0, 1, 3);
        graph.add_edge(0, 2, 2);
        let bottleneck = graph.add_edge(1, 3, 2);
        graph.add_edge(2, 3, 3);
        let original = graph.clone();

        let flow = dinic(&mut graph, 0, 3);
        let cut = MinCut::from_residual(&original, &graph, 0);

        assert_eq!(cut.capacity, flow);
        assert!(cut.contains(0));
        assert!(cut.contains(1));
        assert!(!cut.contains(3));
        assert!(cut.cut_edges.contains(&bottleneck));
    }

    #[test]
    fn test_unsolved_graph_cut_is_everything_reachable() {
        let mut graph = ResidualGraph::new(3);
        graph.add_edge(0, 1, 1);
        let cut = MinCut::from_residual(&graph, &graph, 0);

        assert_eq!(cut.source_vertices(), vec![0, 1]);
        assert!(cut.cut_edges.is_empty());
        assert_eq!(cut.capacity, 0);
    }

    #[test]
    fn test_reachability_ignores_saturated_edges() {
        let mut graph = ResidualGraph::new(3);
        graph.add_edge(0, 1, 0);
        graph.add_edge(0, 2, 1);

        assert_eq!(reachable_from(&graph, 0), vec![true, false, true]);
    }
}
