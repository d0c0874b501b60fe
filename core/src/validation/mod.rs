//! Flow verification and benchmarking
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod benchmarks;
pub mod correctness;
pub mod report;

pub use self::benchmarks::{
    BenchmarkConfig, BenchmarkError, BenchmarkRecord, BenchmarkRunner, Measurement,
};
pub use self::correctness::{EdgeFlow, FlowReport, FlowValidator, VerificationError};
pub use self::report::{CaseSummary, CsvReport, ReportError, TimeScale, TimeStats, Timing};
