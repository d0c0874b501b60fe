//! Seeded random flow network generation
//!
//! Graphs are drawn with uniformly random endpoints (self-loops rejected and
//! redrawn) and uniformly random capacities in `1..=max_capacity`. Three
//! benchmark categories scale the edge count with the vertex count.

use std::fmt::{self, Display};

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data_structures::graph::{Capacity, ResidualGraph};

/// Generation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("cannot place {edges} loop-free edges on {vertices} vertices")]
    TooFewVertices { vertices: usize, edges: usize },

    #[error("maximum capacity must be at least 1, got {0}")]
    InvalidCapacity(Capacity),
}

/// Benchmark graph families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphCategory {
    /// About 2 edges per vertex
    Sparse,
    /// About 50 edges per vertex
    Dense,
    /// About 5 edges per vertex, all of capacity 1
    UnitCapacity,
}

impl GraphCategory {
    pub const ALL: [GraphCategory; 3] = [
        GraphCategory::Sparse,
        GraphCategory::Dense,
        GraphCategory::UnitCapacity,
    ];

    pub fn edges_per_vertex(self) -> usize {
        match self {
            GraphCategory::Sparse => 2,
            GraphCategory::Dense => 50,
            GraphCategory::UnitCapacity => 5,
        }
    }

    /// Requested edge count for `vertices`, clamped to the number of
    /// distinct loop-free ordered pairs
    pub fn edge_count(self, vertices: usize) -> usize {
        let requested = self.edges_per_vertex() * vertices;
        requested.min(vertices * vertices.saturating_sub(1))
    }

    /// Capacity bound for this category given the configured default
    pub fn max_capacity(self, default: Capacity) -> Capacity {
        match self {
            GraphCategory::UnitCapacity => 1,
            GraphCategory::Sparse | GraphCategory::Dense => default,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GraphCategory::Sparse => "sparse",
            GraphCategory::Dense => "dense",
            GraphCategory::UnitCapacity => "unit-cap",
        }
    }

    /// Inverse of [`GraphCategory::label`]
    pub fn from_label(label: &str) -> Option<Self> {
        GraphCategory::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl Display for GraphCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Random graph source backed by a seedable RNG
#[derive(Debug, Clone)]
pub struct RandomGraphGenerator {
    rng: StdRng,
}

impl RandomGraphGenerator {
    /// Deterministic generator
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from operating system entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Draw a graph with `edges` loop-free edges on `vertices` vertices.
    ///
    /// Parallel edges may occur; each one is an independent edge pair.
    pub fn generate(
        &mut self,
        vertices: usize,
        edges: usize,
        max_capacity: Capacity,
    ) -> Result<ResidualGraph, GeneratorError> {
        if max_capacity < 1 {
            return Err(GeneratorError::InvalidCapacity(max_capacity));
        }
        if edges > 0 && vertices < 2 {
            return Err(GeneratorError::TooFewVertices { vertices, edges });
        }

        let mut graph = ResidualGraph::new(vertices);
        while graph.edge_count() < edges {
            let from = self.rng.gen_range(0..vertices);
            let to = self.rng.gen_range(0..vertices);
            if from == to {
                continue;
            }
            graph.add_edge(from, to, self.rng.gen_range(1..=max_capacity));
        }

        debug!(
            "generated graph: {} vertices, {} edges, capacities 1..={}",
            vertices, edges, max_capacity
        );
        Ok(graph)
    }

    /// Draw a graph of the given category
    pub fn generate_category(
        &mut self,
        category: GraphCategory,
        vertices: usize,
        default_capacity: Capacity,
    ) -> Result<ResidualGraph, GeneratorError> {
        self.generate(
            vertices,
            category.edge_count(vertices),
            category.max_capacity(default_capacity),
        )
    }
}
