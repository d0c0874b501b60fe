//! Post-solve analysis of residual graphs
//!
//! Everything here reads the final residual state left by a solver together
//! with the snapshot taken before it ran; solvers themselves only report the
//! scalar flow value.

pub mod cut;
pub mod decomposition;

pub use self::cut::MinCut;
pub use self::decomposition::{decompose, FlowPath};
