//! Graph storage shared by every solver

pub mod graph;

pub use self::graph::{
    Capacity, Edge, EdgeRef, GraphError, NodeId, ResidualGraph, INFINITE_CAPACITY,
};
