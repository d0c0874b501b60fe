//! Maximum flow entry points
//!
//! Thin functional front-ends over the solver types plus a checked
//! variant that validates terminals, and [`analyze`], which solves a copy of
//! a graph and derives the minimum cut and a path decomposition from the
//! final residual state.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};

use crate::algorithm::graph::dinic::Dinic;
use crate::algorithm::graph::edmonds_karp::EdmondsKarp;
use crate::algorithm::traits::{MaxFlowAlgorithm, MaxFlowSolver};
use crate::analysis::cut::MinCut;
use crate::analysis::decomposition::{decompose, FlowPath};
use crate::data_structures::graph::{Capacity, GraphError, NodeId, ResidualGraph};

/// Maximum flow by shortest augmenting paths
pub fn edmonds_karp(graph: &mut ResidualGraph, source: NodeId, sink: NodeId) -> Capacity {
    EdmondsKarp::new().max_flow(graph, source, sink)
}

/// Maximum flow by level graphs and blocking flows
pub fn dinic(graph: &mut ResidualGraph, source: NodeId, sink: NodeId) -> Capacity {
    Dinic::new().max_flow(graph, source, sink)
}

/// Run `algorithm` after checking that both terminals exist
pub fn solve_checked(
    algorithm: MaxFlowAlgorithm,
    graph: &mut ResidualGraph,
    source: NodeId,
    sink: NodeId,
) -> Result<Capacity, GraphError> {
    graph.check_vertex(source)?;
    graph.check_vertex(sink)?;
    Ok(algorithm.solver().max_flow(graph, source, sink))
}

/// Maximum flow result with cut and decomposition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxFlowResult {
    /// Algorithm that produced the flow
    pub algorithm: MaxFlowAlgorithm,
    /// Maximum flow value
    pub max_flow: Capacity,
    /// Minimum cut certifying optimality
    pub min_cut: MinCut,
    /// Flow decomposition into paths
    pub flow_paths: Vec<FlowPath>,
    /// Final residual graph
    pub residual: ResidualGraph,
}

/// Solve a copy of `graph` and collect the derived structures.
///
/// The input graph is left untouched.
pub fn analyze(
    algorithm: MaxFlowAlgorithm,
    graph: &ResidualGraph,
    source: NodeId,
    sink: NodeId,
) -> Result<MaxFlowResult, GraphError> {
    let mut residual = graph.clone();
    let max_flow = solve_checked(algorithm, &mut residual, source, sink)?;
    let min_cut = MinCut::from_residual(graph, &residual, source);
    let flow_paths = decompose(graph, &residual, source, sink);

    Ok(MaxFlowResult {
        algorithm,
        max_flow,
        min_cut,
        flow_paths,
        residual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::correctness::FlowValidator;

    fn both(graph: &ResidualGraph, source: NodeId, sink: NodeId) -> (Capacity, Capacity) {
        let mut first = graph.clone();
        let mut second = graph.clone();
        (edmonds_karp(&mut first, source, sink), dinic(&mut second, source, sink))
    }

    #[test]
    fn test_single_edge_scenario() {
        let mut graph = ResidualGraph::new(2);
        graph.add_edge(0, 1, 7);
        assert_eq!(both(&graph, 0, 1), (7, 7));
    }

    #[test]
    fn test_diamond_scenario() {
        let mut graph = ResidualGraph::new(4);
        graph.add_edge(0, 1, 3);
        graph.add_edge(0, 2, 2);
        graph.add_edge(1, 3, 2);
        graph.add_edge(2, 3, 3);
        assert_eq!(both(&graph, 0, 3), (4, 4));
    }

    #[test]
    fn test_zero_cases() {
        let mut graph = ResidualGraph::new(4);
        graph.add_edge(1, 2, 5);
        graph.add_edge(2, 3, 5);

        for vertex in 0..4 {
            assert_eq!(both(&graph, vertex, vertex), (0, 0));
        }
        // No edges leave the source
        assert_eq!(both(&graph, 0, 3), (0, 0));
        assert_eq!(both(&ResidualGraph::new(1), 0, 0), (0, 0));
    }

    #[test]
    fn test_unit_capacity_disjoint_paths() {
        // Three edge-disjoint chains 0 -> x -> y -> 7, plus a chain that
        // shares its last edge with the first one
        let mut graph = ResidualGraph::new(8);
        for (a, b) in [(1, 2), (3, 4), (5, 6)] {
            graph.add_edge(0, a, 1);
            graph.add_edge(a, b, 1);
            graph.add_edge(b, 7, 1);
        }
        graph.add_edge(0, 4, 1);
        graph.add_edge(4, 2, 1);

        assert_eq!(both(&graph, 0, 7), (3, 3));
    }

    #[test]
    fn test_unit_capacity_hamiltonian_chain() {
        let length = 6;
        let mut graph = ResidualGraph::new(length + 1);
        for v in 0..length {
            graph.add_edge(v, v + 1, 1);
        }
        assert_eq!(both(&graph, 0, length), (1, 1));

        // A shortcut adds one more edge-disjoint path
        graph.add_edge(0, length, 1);
        assert_eq!(both(&graph, 0, length), (2, 2));
    }

    #[test]
    fn test_antiparallel_edges() {
        let mut graph = ResidualGraph::new(4);
        graph.add_edge(0, 1, 4);
        graph.add_edge(0, 2, 2);
        graph.add_edge(1, 2, 3);
        graph.add_edge(2, 1, 3);
        graph.add_edge(1, 3, 2);
        graph.add_edge(2, 3, 4);
        assert_eq!(both(&graph, 0, 3), (6, 6));
    }

    #[test]
    fn test_solve_checked_rejects_bad_terminals() {
        let mut graph = ResidualGraph::new(3);
        graph.add_edge(0, 2, 1);

        assert_eq!(
            solve_checked(MaxFlowAlgorithm::Dinic, &mut graph, 0, 3),
            Err(GraphError::VertexOutOfRange {
                vertex: 3,
                vertex_count: 3
            })
        );
        assert_eq!(solve_checked(MaxFlowAlgorithm::EdmondsKarp, &mut graph, 0, 2), Ok(1));
    }

    #[test]
    fn test_analyze_leaves_input_untouched() {
        let mut graph = ResidualGraph::new(4);
        graph.add_edge(0, 1, 3);
        graph.add_edge(0, 2, 2);
        graph.add_edge(1, 3, 2);
        graph.add_edge(2, 3, 3);
        let before = graph.clone();

        for algorithm in MaxFlowAlgorithm::ALL {
            let result = analyze(algorithm, &graph, 0, 3).unwrap();
            assert_eq!(graph, before);
            assert_eq!(result.max_flow, 4);
            assert_eq!(result.min_cut.capacity, 4);
            assert_eq!(result.flow_paths.iter().map(|p| p.flow).sum::<Capacity>(), 4);
            assert!(FlowValidator::verify(&graph, &result.residual, 0, 3, result.max_flow).is_ok());
        }
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::generator::RandomGraphGenerator;
    use crate::validation::correctness::FlowValidator;
    use quickcheck::{quickcheck, TestResult};

    fn random_instance(
        seed: u64,
        vertices: u8,
        density: u8,
        max_capacity: u8,
    ) -> Option<ResidualGraph> {
        let vertices = usize::from(vertices % 24) + 2;
        let edges = vertices * (usize::from(density % 6) + 1);
        let max_capacity = Capacity::from(max_capacity % 50) + 1;
        RandomGraphGenerator::new(seed).generate(vertices, edges, max_capacity).ok()
    }

    quickcheck! {
        fn prop_algorithms_agree(
            seed: u64,
            vertices: u8,
            density: u8,
            max_capacity: u8
        ) -> TestResult {
            let Some(graph) = random_instance(seed, vertices, density, max_capacity) else {
                return TestResult::discard();
            };
            let sink = graph.vertex_count() - 1;

            let mut first = graph.clone();
            let mut second = graph.clone();
            TestResult::from_bool(edmonds_karp(&mut first, 0, sink) == dinic(&mut second, 0, sink))
        }

        fn prop_flows_are_valid(
            seed: u64,
            vertices: u8,
            density: u8,
            max_capacity: u8
        ) -> TestResult {
            let Some(graph) = random_instance(seed, vertices, density, max_capacity) else {
                return TestResult::discard();
            };
            let sink = graph.vertex_count() - 1;

            let valid = MaxFlowAlgorithm::ALL.iter().all(|&algorithm| {
                let mut residual = graph.clone();
                let flow = algorithm.solver().max_flow(&mut residual, 0, sink);
                residual.pairing_is_consistent()
                    && FlowValidator::verify(&graph, &residual, 0, sink, flow).is_ok()
            });
            TestResult::from_bool(valid)
        }

        fn prop_max_flow_equals_min_cut(
            seed: u64,
            vertices: u8,
            density: u8,
            max_capacity: u8
        ) -> TestResult {
            let Some(graph) = random_instance(seed, vertices, density, max_capacity) else {
                return TestResult::discard();
            };
            let sink = graph.vertex_count() - 1;

            match analyze(MaxFlowAlgorithm::Dinic, &graph, 0, sink) {
                Ok(result) => {
                    let decomposed: Capacity = result.flow_paths.iter().map(|p| p.flow).sum();
                    TestResult::from_bool(
                        result.min_cut.capacity == result.max_flow
                            && !result.min_cut.contains(sink)
                            && decomposed == result.max_flow,
                    )
                }
                Err(_) => TestResult::failed(),
            }
        }
    }
}
