//! Flow correctness verification
//!
//! Checks a solved residual graph against the snapshot taken before the
//! solver ran. A flow is accepted only if
//! - both graphs share the same edge layout,
//! - every forward/backward pair kept its capacity sum,
//! - every forward edge carries between zero and its capacity,
//! - every vertex except the terminals conserves flow,
//! - the net outflow of the source equals the claimed value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data_structures::graph::{Capacity, EdgeRef, NodeId, ResidualGraph};

/// Verification failures, one variant per violated property
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("solved graph does not share the original edge layout")]
    StructureMismatch,

    #[error("edge {edge:?}: pair capacity sum changed from {expected} to {actual}")]
    PairSumViolated {
        edge: EdgeRef,
        expected: Capacity,
        actual: Capacity,
    },

    #[error("edge {edge:?}: flow {flow} outside [0, {capacity}]")]
    CapacityExceeded {
        edge: EdgeRef,
        flow: Capacity,
        capacity: Capacity,
    },

    #[error("vertex {vertex}: inflow and outflow differ by {imbalance}")]
    ConservationViolated { vertex: NodeId, imbalance: Capacity },

    #[error("source emits {actual} but {claimed} was reported")]
    ValueMismatch { claimed: Capacity, actual: Capacity },
}

/// Flow carried by one forward edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeFlow {
    pub edge: EdgeRef,
    pub to: NodeId,
    pub capacity: Capacity,
    pub flow: Capacity,
}

impl EdgeFlow {
    #[inline]
    pub fn is_saturated(&self) -> bool {
        self.flow == self.capacity
    }
}

/// Verified flow with its per-edge breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowReport {
    pub value: Capacity,
    pub edge_flows: Vec<EdgeFlow>,
}

impl FlowReport {
    pub fn saturated_edges(&self) -> usize {
        self.edge_flows.iter().filter(|f| f.is_saturated()).count()
    }
}

/// Stateless checker for solved residual graphs
#[derive(Debug, Default, Clone, Copy)]
pub struct FlowValidator;

impl FlowValidator {
    pub fn verify(
        original: &ResidualGraph,
        residual: &ResidualGraph,
        source: NodeId,
        sink: NodeId,
        claimed: Capacity,
    ) -> Result<FlowReport, VerificationError> {
        if !original.same_structure(residual) {
            return Err(VerificationError::StructureMismatch);
        }

        let mut excess: Vec<Capacity> = vec![0; original.vertex_count()];
        let mut edge_flows = Vec::with_capacity(original.edge_count());

        for edge in original.forward_edges() {
            let before = original.edge(edge);
            let after = residual.edge(edge);

            let expected = before.capacity() + original.paired(edge.from, edge.index).capacity();
            let actual = after.capacity() + residual.paired(edge.from, edge.index).capacity();
            if expected != actual {
                return Err(VerificationError::PairSumViolated {
                    edge,
                    expected,
                    actual,
                });
            }

            let flow = before.capacity() - after.capacity();
            if flow < 0 || flow > before.capacity() {
                return Err(VerificationError::CapacityExceeded {
                    edge,
                    flow,
                    capacity: before.capacity(),
                });
            }

            excess[edge.from] -= flow;
            excess[before.to()] += flow;
            edge_flows.push(EdgeFlow {
                edge,
                to: before.to(),
                capacity: before.capacity(),
                flow,
            });
        }

        if let Some((vertex, &imbalance)) = excess
            .iter()
            .enumerate()
            .find(|&(vertex, &balance)| vertex != source && vertex != sink && balance != 0)
        {
            return Err(VerificationError::ConservationViolated { vertex, imbalance });
        }

        let actual = -excess[source];
        if actual != claimed {
            return Err(VerificationError::ValueMismatch { claimed, actual });
        }

        Ok(FlowReport {
            value: actual,
            edge_flows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::graph::max_flow::edmonds_karp;

    fn diamond() -> ResidualGraph {
        let mut graph = ResidualGraph::new(4);
        graph.add_edge(0, 1, 3);
        graph.add_edge(0, 2, 2);
        graph.add_edge(1, 3, 2);
        graph.add_edge(2, 3, 3);
        graph
    }

    #[test]
    fn test_accepts_solved_flow() {
        let original = diamond();
        let mut graph = original.clone();
        let flow = edmonds_karp(&mut graph, 0, 3);

        let report = FlowValidator::verify(&original, &graph, 0, 3, flow).unwrap();
        assert_eq!(report.value, 4);
        assert_eq!(report.edge_flows.len(), 4);
        assert_eq!(report.edge_flows[0].flow, 2);
        assert_eq!(report.saturated_edges(), 2);
    }

    #[test]
    fn test_rejects_wrong_value() {
        let original = diamond();
        let mut graph = original.clone();
        edmonds_karp(&mut graph, 0, 3);

        assert_eq!(
            FlowValidator::verify(&original, &graph, 0, 3, 5),
            Err(VerificationError::ValueMismatch { claimed: 5, actual: 4 })
        );
    }

    #[test]
    fn test_rejects_conservation_violation() {
        let original = diamond();
        let mut graph = original.clone();
        // Flow enters vertex 1 but never leaves
        graph.push_flow(0, 0, 2);

        assert_eq!(
            FlowValidator::verify(&original, &graph, 0, 3, 2),
            Err(VerificationError::ConservationViolated {
                vertex: 1,
                imbalance: 2
            })
        );
    }

    #[test]
    fn test_rejects_broken_pair_sum() {
        let original = diamond();
        let mut graph = ResidualGraph::new(4);
        graph.add_edge(0, 1, 1);
        graph.add_edge(0, 2, 2);
        graph.add_edge(1, 3, 2);
        graph.add_edge(2, 3, 3);

        assert!(matches!(
            FlowValidator::verify(&original, &graph, 0, 3, 0),
            Err(VerificationError::PairSumViolated { expected: 3, actual: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_different_layout() {
        let original = diamond();
        let other = ResidualGraph::new(4);

        assert_eq!(
            FlowValidator::verify(&original, &other, 0, 3, 0),
            Err(VerificationError::StructureMismatch)
        );
    }
}
