//! Maximum flow on residual graphs
//!
//! A [`ResidualGraph`] stores every inserted edge together with a paired
//! backward edge. Two interchangeable solvers compute maximum flows on it:
//!
//! - [`EdmondsKarp`]: shortest augmenting paths found by BFS
//! - [`Dinic`]: BFS level graphs saturated by blocking flows, with a
//!   current-arc cursor per vertex
//!
//! ```
//! use maxflow_core::{dinic, edmonds_karp, ResidualGraph};
//!
//! let mut graph = ResidualGraph::new(4);
//! graph.add_edge(0, 1, 3);
//! graph.add_edge(0, 2, 2);
//! graph.add_edge(1, 3, 2);
//! graph.add_edge(2, 3, 3);
//!
//! let snapshot = graph.clone();
//! assert_eq!(edmonds_karp(&mut graph, 0, 3), 4);
//!
//! graph.clone_from(&snapshot);
//! assert_eq!(dinic(&mut graph, 0, 3), 4);
//! ```
//!
//! Solvers leave the graph in its final residual state. The [`analysis`]
//! module derives minimum cuts and path decompositions from that state, and
//! [`validation`] verifies flows and drives the benchmark harness.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod analysis;
pub mod data_structures;
pub mod generator;
pub mod validation;

pub use algorithm::graph::{
    analyze, dinic, edmonds_karp, solve_checked, Dinic, EdmondsKarp, MaxFlowResult,
};
pub use algorithm::traits::{MaxFlowAlgorithm, MaxFlowSolver};
pub use analysis::{decompose, FlowPath, MinCut};
pub use data_structures::graph::{
    Capacity, Edge, EdgeRef, GraphError, NodeId, ResidualGraph, INFINITE_CAPACITY,
};
pub use generator::{GeneratorError, GraphCategory, RandomGraphGenerator};
