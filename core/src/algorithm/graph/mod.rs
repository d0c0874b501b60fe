//! Maximum flow solvers over residual graphs
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod dinic;
pub mod edmonds_karp;
pub mod max_flow;

pub use self::dinic::Dinic;
pub use self::edmonds_karp::EdmondsKarp;
pub use self::max_flow::{analyze, dinic, edmonds_karp, solve_checked, MaxFlowResult};
