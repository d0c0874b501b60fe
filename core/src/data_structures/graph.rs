//! Residual graph representation for maximum flow computation
//!
//! Adjacency-list storage where every inserted edge `u -> v` owns a paired
//! backward edge `v -> u` of zero initial capacity. Pushing flow along an
//! edge moves capacity onto its pair, so the residual network is always
//! read directly off the adjacency lists.
//!
//! # Invariants
//! - `adjacency[e.to][e.reverse]` is the exact residual counterpart of `e`,
//!   and its own `reverse` points back at `e` (self-loops included)
//! - Edge order within a vertex follows insertion order
//! - Capacities are never negative
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Vertex identifier, dense in `0..vertex_count`
pub type NodeId = usize;

/// Residual capacity domain
pub type Capacity = i64;

/// Flow quantity standing in for "unbounded" inside the solvers.
///
/// Accumulated flow must stay strictly below this value; callers bound the
/// total capacity of their instances accordingly.
pub const INFINITE_CAPACITY: Capacity = Capacity::MAX;

/// Directed residual edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Target vertex
    pub(crate) to: NodeId,
    /// Index of the paired edge in `adjacency[to]`
    pub(crate) reverse: usize,
    /// Current residual capacity
    pub(crate) capacity: Capacity,
}

impl Edge {
    #[inline]
    pub fn to(&self) -> NodeId {
        self.to
    }

    #[inline]
    pub fn reverse(&self) -> usize {
        self.reverse
    }

    #[inline]
    pub fn capacity(&self) -> Capacity {
        self.capacity
    }
}

/// Handle to a caller-inserted (forward) edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeRef {
    /// Tail vertex of the edge
    pub from: NodeId,
    /// Position of the edge in `adjacency[from]`
    pub index: usize,
}

/// Checked graph construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("vertex {vertex} out of range for graph with {vertex_count} vertices")]
    VertexOutOfRange { vertex: NodeId, vertex_count: usize },

    #[error("negative capacity {capacity} on edge {from} -> {to}")]
    NegativeCapacity {
        from: NodeId,
        to: NodeId,
        capacity: Capacity,
    },

    #[error("edge {index} of vertex {vertex} points at missing vertex {to}")]
    DanglingEdge {
        vertex: NodeId,
        index: usize,
        to: NodeId,
    },

    #[error("edge {index} of vertex {vertex} is not paired with its reverse edge")]
    InconsistentPairing { vertex: NodeId, index: usize },

    #[error("forward edge {0:?} does not name a stored edge")]
    UnknownForwardEdge(EdgeRef),

    #[error("{stored} stored edges cannot pair up {forward} forward edges")]
    EdgeCountMismatch { forward: usize, stored: usize },
}

/// Residual network over vertices `0..n`
///
/// `Clone` takes a full snapshot and `clone_from` restores one while reusing
/// the existing allocations; both cost time proportional to the edge count.
/// Deserialization goes through [`ResidualGraph::validate`], so a decoded
/// graph upholds the same invariants as one built with `add_edge`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawResidualGraph")]
pub struct ResidualGraph {
    /// Outgoing residual edges per vertex, in insertion order
    adjacency: Vec<Vec<Edge>>,
    /// Forward edges in insertion order
    forward: Vec<EdgeRef>,
}

/// Unchecked wire form of [`ResidualGraph`]
#[derive(Deserialize)]
struct RawResidualGraph {
    adjacency: Vec<Vec<Edge>>,
    forward: Vec<EdgeRef>,
}

impl TryFrom<RawResidualGraph> for ResidualGraph {
    type Error = GraphError;

    fn try_from(raw: RawResidualGraph) -> Result<Self, Self::Error> {
        let graph = ResidualGraph {
            adjacency: raw.adjacency,
            forward: raw.forward,
        };
        graph.validate()?;
        Ok(graph)
    }
}

impl ResidualGraph {
    /// Create an empty graph on `vertex_count` vertices
    pub fn new(vertex_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); vertex_count],
            forward: Vec::new(),
        }
    }

    /// Discard all edges and resize to `vertex_count` empty vertices
    pub fn initialize(&mut self, vertex_count: usize) {
        self.adjacency.clear();
        self.adjacency.resize_with(vertex_count, Vec::new);
        self.forward.clear();
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of caller-inserted edges (backward edges excluded)
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.forward.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Insert `from -> to` with `capacity` plus its zero-capacity pair.
    ///
    /// # Preconditions
    /// `from` and `to` are valid vertices and `capacity >= 0`. Violations are
    /// caught by debug assertions; use [`ResidualGraph::try_add_edge`] for a
    /// checked insertion.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, capacity: Capacity) -> EdgeRef {
        debug_assert!(from < self.vertex_count(), "tail vertex {} out of range", from);
        debug_assert!(to < self.vertex_count(), "head vertex {} out of range", to);
        debug_assert!(capacity >= 0, "negative capacity {}", capacity);

        let forward_index = self.adjacency[from].len();
        // A self-loop stores both records in the same list
        let backward_index = self.adjacency[to].len() + usize::from(from == to);

        self.adjacency[from].push(Edge {
            to,
            reverse: backward_index,
            capacity,
        });
        self.adjacency[to].push(Edge {
            to: from,
            reverse: forward_index,
            capacity: 0,
        });

        let handle = EdgeRef {
            from,
            index: forward_index,
        };
        self.forward.push(handle);
        handle
    }

    /// Checked variant of [`ResidualGraph::add_edge`]
    pub fn try_add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        capacity: Capacity,
    ) -> Result<EdgeRef, GraphError> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        if capacity < 0 {
            return Err(GraphError::NegativeCapacity { from, to, capacity });
        }
        Ok(self.add_edge(from, to, capacity))
    }

    pub fn check_vertex(&self, vertex: NodeId) -> Result<(), GraphError> {
        if vertex < self.vertex_count() {
            Ok(())
        } else {
            Err(GraphError::VertexOutOfRange {
                vertex,
                vertex_count: self.vertex_count(),
            })
        }
    }

    /// Residual edges leaving `vertex`
    #[inline]
    pub fn edges(&self, vertex: NodeId) -> &[Edge] {
        &self.adjacency[vertex]
    }

    #[inline]
    pub fn edge(&self, edge: EdgeRef) -> &Edge {
        &self.adjacency[edge.from][edge.index]
    }

    /// Paired counterpart of the edge at `adjacency[vertex][index]`
    #[inline]
    pub fn paired(&self, vertex: NodeId, index: usize) -> &Edge {
        let edge = &self.adjacency[vertex][index];
        &self.adjacency[edge.to][edge.reverse]
    }

    /// Current residual capacity of a forward edge
    #[inline]
    pub fn residual(&self, edge: EdgeRef) -> Capacity {
        self.edge(edge).capacity
    }

    /// Forward edges in insertion order
    pub fn forward_edges(&self) -> impl ExactSizeIterator<Item = EdgeRef> + '_ {
        self.forward.iter().copied()
    }

    /// Move `amount` units of residual capacity from the edge at
    /// `adjacency[vertex][index]` onto its pair.
    #[inline]
    pub fn push_flow(&mut self, vertex: NodeId, index: usize, amount: Capacity) {
        let edge = &mut self.adjacency[vertex][index];
        debug_assert!(
            amount <= edge.capacity,
            "pushing {} over residual capacity {}",
            amount,
            edge.capacity
        );
        edge.capacity -= amount;
        let (to, reverse) = (edge.to, edge.reverse);
        self.adjacency[to][reverse].capacity += amount;
    }

    /// Whether every edge's pair points back at it
    pub fn pairing_is_consistent(&self) -> bool {
        self.first_unpaired().is_none()
    }

    /// Check every structural invariant: edge targets in range, capacities
    /// non-negative, pairs pointing at each other, and forward handles
    /// naming stored edges that account for exactly half of them.
    pub fn validate(&self) -> Result<(), GraphError> {
        for (vertex, edges) in self.adjacency.iter().enumerate() {
            for (index, edge) in edges.iter().enumerate() {
                if edge.to >= self.vertex_count() {
                    return Err(GraphError::DanglingEdge {
                        vertex,
                        index,
                        to: edge.to,
                    });
                }
                if edge.capacity < 0 {
                    return Err(GraphError::NegativeCapacity {
                        from: vertex,
                        to: edge.to,
                        capacity: edge.capacity,
                    });
                }
            }
        }

        if let Some((vertex, index)) = self.first_unpaired() {
            return Err(GraphError::InconsistentPairing { vertex, index });
        }

        if let Some(&edge) = self.forward.iter().find(|edge| {
            self.adjacency
                .get(edge.from)
                .map_or(true, |list| edge.index >= list.len())
        }) {
            return Err(GraphError::UnknownForwardEdge(edge));
        }

        let stored: usize = self.adjacency.iter().map(Vec::len).sum();
        if stored != 2 * self.forward.len() {
            return Err(GraphError::EdgeCountMismatch {
                forward: self.forward.len(),
                stored,
            });
        }
        Ok(())
    }

    fn first_unpaired(&self) -> Option<(NodeId, usize)> {
        self.adjacency.iter().enumerate().find_map(|(vertex, edges)| {
            edges.iter().enumerate().find_map(|(index, edge)| {
                let paired = self
                    .adjacency
                    .get(edge.to)
                    .and_then(|list| list.get(edge.reverse))
                    .map_or(false, |pair| pair.to == vertex && pair.reverse == index);
                (!paired).then_some((vertex, index))
            })
        })
    }

    /// Same vertex count and edge layout, capacities aside
    pub fn same_structure(&self, other: &ResidualGraph) -> bool {
        self.vertex_count() == other.vertex_count()
            && self.forward == other.forward
            && self
                .adjacency
                .iter()
                .zip(&other.adjacency)
                .all(|(left, right)| {
                    left.len() == right.len()
                        && left
                            .iter()
                            .zip(right)
                            .all(|(a, b)| a.to == b.to && a.reverse == b.reverse)
                })
    }
}
