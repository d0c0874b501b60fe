//! Benchmarking harness comparing the maximum flow algorithms
//!
//! For every (vertex count, category) case the harness draws a batch of
//! random instances, then times each algorithm on every instance. Each
//! timed run starts from a pristine snapshot; restoring the working copy
//! happens outside the measured interval. Both algorithms must agree on the
//! flow value of every instance.
//!
//! Instance generation fans out over `rayon`, with one RNG per instance
//! seeded from the run seed, so a fixed seed reproduces every graph no
//! matter how the work is scheduled. Timing itself is strictly sequential.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::traits::{MaxFlowAlgorithm, MaxFlowSolver};
use crate::data_structures::graph::{Capacity, NodeId, ResidualGraph};
use crate::generator::{GeneratorError, GraphCategory, RandomGraphGenerator};
use crate::validation::correctness::{FlowValidator, VerificationError};

/// Benchmark failures
#[derive(Debug, Error)]
pub enum BenchmarkError {
    #[error("invalid benchmark configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed configuration file: {0}")]
    Config(#[from] serde_json::Error),

    #[error("instance generation failed: {0}")]
    Generator(#[from] GeneratorError),

    #[error(
        "{algorithm} produced an invalid flow on V={vertices} {category} #{instance}: {error}"
    )]
    InvalidFlow {
        algorithm: MaxFlowAlgorithm,
        vertices: usize,
        category: GraphCategory,
        instance: usize,
        #[source]
        error: VerificationError,
    },

    #[error(
        "flow mismatch on V={vertices} {category} #{instance}: \
         Edmonds-Karp {edmonds_karp}, Dinic {dinic}"
    )]
    FlowMismatch {
        vertices: usize,
        category: GraphCategory,
        instance: usize,
        edmonds_karp: Capacity,
        dinic: Capacity,
    },
}

/// Benchmark run parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Vertex counts to sweep
    pub vertex_counts: Vec<usize>,
    /// Graph families per vertex count
    pub categories: Vec<GraphCategory>,
    /// Random graphs per (vertex count, category)
    pub instances_per_case: usize,
    /// Timed repetitions per algorithm and instance
    pub runs_per_instance: usize,
    /// Capacity bound for the non-unit categories
    pub max_capacity: Capacity,
    /// Run seed; drawn from entropy when absent
    pub seed: Option<u64>,
    /// CSV destination
    pub output_path: PathBuf,
    /// Check every computed flow with the flow validator
    pub verify: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            vertex_counts: (1..=20).map(|k| 100 * k).collect(),
            categories: GraphCategory::ALL.to_vec(),
            instances_per_case: 20,
            runs_per_instance: 5,
            max_capacity: 1000,
            seed: None,
            output_path: PathBuf::from("results.csv"),
            verify: false,
        }
    }
}

impl BenchmarkConfig {
    pub fn from_json_str(json: &str) -> Result<Self, BenchmarkError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, BenchmarkError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), BenchmarkError> {
        if self.runs_per_instance == 0 {
            return Err(invalid("runs_per_instance must be positive"));
        }
        if u32::try_from(self.runs_per_instance).is_err() {
            return Err(invalid("runs_per_instance must fit in 32 bits"));
        }
        if self.instances_per_case == 0 {
            return Err(invalid("instances_per_case must be positive"));
        }
        if self.max_capacity < 1 {
            return Err(invalid("max_capacity must be at least 1"));
        }
        if let Some(&vertices) = self.vertex_counts.iter().find(|&&v| v < 2) {
            return Err(BenchmarkError::InvalidConfig(format!(
                "vertex count {} leaves no distinct source and sink",
                vertices
            )));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> BenchmarkError {
    BenchmarkError::InvalidConfig(message.to_owned())
}

/// Averaged timings for one instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub vertices: usize,
    pub edges: usize,
    pub category: GraphCategory,
    /// 1-based instance number within the case
    pub instance: usize,
    pub edmonds_karp_ms: f64,
    pub dinic_ms: f64,
    pub max_flow: Capacity,
}

/// Outcome of timing one algorithm on one instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub mean: Duration,
    pub flow: Capacity,
}

impl Measurement {
    pub fn mean_ms(&self) -> f64 {
        self.mean.as_secs_f64() * 1000.0
    }
}

/// Sequential timing driver over generated instance batches
#[derive(Debug, Clone)]
pub struct BenchmarkRunner {
    config: BenchmarkConfig,
    seed: u64,
}

impl BenchmarkRunner {
    pub fn new(config: BenchmarkConfig) -> Result<Self, BenchmarkError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self { config, seed })
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Effective run seed
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Seed of one instance, independent of generation order
    pub fn instance_seed(
        &self,
        vertices: usize,
        category: GraphCategory,
        instance: usize,
    ) -> u64 {
        let case = mix(self.seed ^ mix(vertices as u64));
        mix(case ^ mix(((category as u64) << 32) | instance as u64))
    }

    /// Generate all instances of one case in parallel
    pub fn generate_instances(
        &self,
        vertices: usize,
        category: GraphCategory,
    ) -> Result<Vec<ResidualGraph>, BenchmarkError> {
        let graphs = (1..=self.config.instances_per_case)
            .into_par_iter()
            .map(|instance| {
                let seed = self.instance_seed(vertices, category, instance);
                RandomGraphGenerator::new(seed).generate_category(
                    category,
                    vertices,
                    self.config.max_capacity,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(graphs)
    }

    /// Time `solver` over `runs_per_instance` runs on copies of `pristine`.
    ///
    /// `working` is overwritten before every run and holds the final
    /// residual graph of the last run on return.
    pub fn measure(
        &self,
        solver: &mut dyn MaxFlowSolver,
        pristine: &ResidualGraph,
        working: &mut ResidualGraph,
        source: NodeId,
        sink: NodeId,
    ) -> Measurement {
        let mut total = Duration::ZERO;
        let mut flow = 0;

        for run in 0..self.config.runs_per_instance {
            working.clone_from(pristine);

            let start = Instant::now();
            let value = solver.max_flow(working, source, sink);
            total += start.elapsed();

            if run > 0 && value != flow {
                warn!(
                    "{} returned {} after {} on an identical graph",
                    solver.name(),
                    value,
                    flow
                );
            }
            flow = value;
        }

        Measurement {
            mean: total.div_f64(self.config.runs_per_instance as f64),
            flow,
        }
    }

    /// Benchmark every instance of one case
    pub fn run_case(
        &self,
        vertices: usize,
        category: GraphCategory,
    ) -> Result<Vec<BenchmarkRecord>, BenchmarkError> {
        let instances = self.generate_instances(vertices, category)?;
        let (source, sink) = (0, vertices - 1);

        let mut edmonds_karp = MaxFlowAlgorithm::EdmondsKarp.solver();
        let mut dinic = MaxFlowAlgorithm::Dinic.solver();
        let mut working = ResidualGraph::default();
        let mut records = Vec::with_capacity(instances.len());

        for (offset, pristine) in instances.iter().enumerate() {
            let instance = offset + 1;

            let ek = self.measure(edmonds_karp.as_mut(), pristine, &mut working, source, sink);
            self.check(
                MaxFlowAlgorithm::EdmondsKarp,
                pristine,
                &working,
                ek.flow,
                (vertices, category, instance),
            )?;

            let dn = self.measure(dinic.as_mut(), pristine, &mut working, source, sink);
            self.check(
                MaxFlowAlgorithm::Dinic,
                pristine,
                &working,
                dn.flow,
                (vertices, category, instance),
            )?;

            if ek.flow != dn.flow {
                return Err(BenchmarkError::FlowMismatch {
                    vertices,
                    category,
                    instance,
                    edmonds_karp: ek.flow,
                    dinic: dn.flow,
                });
            }

            debug!(
                "V={} {} #{}: flow {}, EK {:.3} ms, Dinic {:.3} ms",
                vertices,
                category,
                instance,
                ek.flow,
                ek.mean_ms(),
                dn.mean_ms()
            );
            records.push(BenchmarkRecord {
                vertices,
                edges: pristine.edge_count(),
                category,
                instance,
                edmonds_karp_ms: ek.mean_ms(),
                dinic_ms: dn.mean_ms(),
                max_flow: ek.flow,
            });
        }

        Ok(records)
    }

    /// Sweep every configured case, handing each finished case to `on_case`
    pub fn run<F>(&self, mut on_case: F) -> Result<Vec<BenchmarkRecord>, BenchmarkError>
    where
        F: FnMut(&[BenchmarkRecord]) -> Result<(), BenchmarkError>,
    {
        info!(
            "benchmarking {} vertex counts x {} categories, {} instances x {} runs, seed {}",
            self.config.vertex_counts.len(),
            self.config.categories.len(),
            self.config.instances_per_case,
            self.config.runs_per_instance,
            self.seed
        );
        for algorithm in MaxFlowAlgorithm::ALL {
            debug!("{} runs in {}", algorithm, algorithm.complexity());
        }

        let mut all = Vec::new();
        for &vertices in &self.config.vertex_counts {
            for &category in &self.config.categories {
                let records = self.run_case(vertices, category)?;
                on_case(&records)?;
                all.extend(records);
            }
            info!("finished V={}", vertices);
        }
        Ok(all)
    }

    /// Verify `residual` when enabled; `case` is (vertices, category, instance)
    fn check(
        &self,
        algorithm: MaxFlowAlgorithm,
        pristine: &ResidualGraph,
        residual: &ResidualGraph,
        flow: Capacity,
        (vertices, category, instance): (usize, GraphCategory, usize),
    ) -> Result<(), BenchmarkError> {
        if !self.config.verify {
            return Ok(());
        }
        FlowValidator::verify(pristine, residual, 0, vertices - 1, flow)
            .map(|_| ())
            .map_err(|error| BenchmarkError::InvalidFlow {
                algorithm,
                vertices,
                category,
                instance,
                error,
            })
    }
}

/// SplitMix64 finalizer
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
