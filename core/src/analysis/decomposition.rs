//! Flow decomposition into source-sink paths
//!
//! The per-edge flow of a solved graph is the drop in residual capacity of
//! each forward edge. Walking edges with remaining flow from the source
//! either reaches the sink (one path, peeled off at its bottleneck) or
//! closes a cycle, which carries no source-sink value and is cancelled.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::data_structures::graph::{Capacity, NodeId, ResidualGraph};

/// A source-sink path carrying a fixed amount of flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowPath {
    /// Vertices from source to sink
    pub vertices: Vec<NodeId>,
    /// Flow carried along the path
    pub flow: Capacity,
}

/// Split the flow recorded in `residual` into paths.
///
/// `original` is the snapshot taken before the solver ran. Path flows sum
/// to the flow value; flow circulating in cycles is dropped.
pub fn decompose(
    original: &ResidualGraph,
    residual: &ResidualGraph,
    source: NodeId,
    sink: NodeId,
) -> Vec<FlowPath> {
    debug_assert!(original.same_structure(residual));

    let vertex_count = original.vertex_count();
    let mut heads = Vec::with_capacity(original.edge_count());
    let mut remaining = Vec::with_capacity(original.edge_count());
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];

    for (id, edge) in original.forward_edges().enumerate() {
        heads.push(original.edge(edge).to());
        remaining.push(original.residual(edge) - residual.residual(edge));
        outgoing[edge.from].push(id);
    }

    let mut paths = Vec::new();
    if source == sink {
        return paths;
    }

    let mut cursor = vec![0usize; vertex_count];
    let mut position: Vec<Option<usize>> = vec![None; vertex_count];

    'outer: loop {
        let mut vertices = vec![source];
        let mut edges: Vec<usize> = Vec::new();
        position[source] = Some(0);
        let mut vertex = source;

        while vertex != sink {
            while outgoing[vertex]
                .get(cursor[vertex])
                .map_or(false, |&id| remaining[id] <= 0)
            {
                cursor[vertex] += 1;
            }
            let Some(&id) = outgoing[vertex].get(cursor[vertex]) else {
                if vertex != source {
                    warn!("flow stranded at vertex {}; decomposition stopped early", vertex);
                }
                for &visited in &vertices {
                    position[visited] = None;
                }
                break 'outer;
            };

            let head = heads[id];
            if let Some(start) = position[head] {
                // Cancel the cycle head -> ... -> vertex -> head
                let cycle = &edges[start..];
                let amount = cycle
                    .iter()
                    .chain(std::iter::once(&id))
                    .map(|&e| remaining[e])
                    .min()
                    .unwrap_or(0);
                for &e in cycle.iter().chain(std::iter::once(&id)) {
                    remaining[e] -= amount;
                }
                for &dropped in &vertices[start + 1..] {
                    position[dropped] = None;
                }
                vertices.truncate(start + 1);
                edges.truncate(start);
                vertex = head;
                continue;
            }

            edges.push(id);
            position[head] = Some(vertices.len());
            vertices.push(head);
            vertex = head;
        }

        let flow = edges.iter().map(|&e| remaining[e]).min().unwrap_or(0);
        for &e in &edges {
            remaining[e] -= flow;
        }
        for &visited in &vertices {
            position[visited] = None;
        }
        paths.push(FlowPath { vertices, flow });
    }

    paths
}
