//! Benchmark driver comparing Edmonds-Karp and Dinic on random graphs
//!
//! Without a configuration file the default sweep runs (100 to 2000
//! vertices, all graph categories). Command-line flags override the file.
//! `--summarize` skips the sweep and summarizes an existing results CSV.
//! Log verbosity follows `RUST_LOG`.

use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use log::info;
use maxflow_core::generator::GraphCategory;
use maxflow_core::validation::report::{
    read_timings, suggested_scale, summarize, summary_header, summary_row, table_header,
    table_row, CaseSummary, Timing,
};
use maxflow_core::validation::{BenchmarkConfig, BenchmarkRunner, CsvReport};

#[derive(Debug, Parser)]
#[command(name = "maxflow-bench", about = "Time Edmonds-Karp against Dinic on random graphs")]
struct Args {
    /// JSON benchmark configuration; defaults apply when omitted
    config: Option<PathBuf>,

    /// CSV destination, overriding the configuration
    #[arg(long)]
    output: Option<PathBuf>,

    /// Run seed, overriding the configuration
    #[arg(long)]
    seed: Option<u64>,

    /// Check every computed flow with the flow validator
    #[arg(long)]
    verify: bool,

    /// Summarize an existing results CSV instead of benchmarking
    #[arg(long, value_name = "CSV", conflicts_with_all = ["config", "output", "seed", "verify"])]
    summarize: Option<PathBuf>,
}

impl Args {
    fn load_config(&self) -> Result<BenchmarkConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => {
                info!("loading configuration from {}", path.display());
                BenchmarkConfig::from_json_file(path)?
            }
            None => BenchmarkConfig::default(),
        };
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.verify |= self.verify;
        Ok(config)
    }
}

fn print_summary(summaries: &[CaseSummary]) {
    println!();
    println!("{}", summary_header());
    for summary in summaries {
        println!("{}", summary_row(summary));
    }
    for category in GraphCategory::ALL {
        if summaries.iter().any(|s| s.category == category) {
            info!("{}: {:?} time axis", category, suggested_scale(summaries, category));
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    if let Some(path) = &args.summarize {
        let timings = read_timings(BufReader::new(File::open(path)?))?;
        info!("{} timings read from {}", timings.len(), path.display());
        print_summary(&summarize(&timings));
        return Ok(());
    }

    let runner = BenchmarkRunner::new(args.load_config()?)?;
    let output_path = &runner.config().output_path;

    let mut csv = CsvReport::create(output_path)?;
    println!("{}", table_header());
    println!(" CSV: {} is being written.", output_path.display());

    let records = runner.run(|case| {
        for record in case {
            println!("{}", table_row(record));
        }
        csv.write_records(case)?;
        Ok(())
    })?;

    let timings: Vec<Timing> = records.iter().map(Timing::from).collect();
    print_summary(&summarize(&timings));

    info!(
        "{} instances benchmarked with seed {}; results in {}",
        records.len(),
        runner.seed(),
        output_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_no_arguments_runs_default_sweep() {
        let args = Args::try_parse_from(["maxflow-bench"]).unwrap();
        assert!(args.config.is_none());
        assert_eq!(args.load_config().unwrap(), BenchmarkConfig::default());
    }

    #[test]
    fn test_flags_override_configuration() {
        let args = Args::try_parse_from([
            "maxflow-bench",
            "--output",
            "sweep.csv",
            "--seed",
            "42",
            "--verify",
        ])
        .unwrap();
        let config = args.load_config().unwrap();

        assert_eq!(config.output_path, PathBuf::from("sweep.csv"));
        assert_eq!(config.seed, Some(42));
        assert!(config.verify);
    }

    #[test]
    fn test_help_and_bad_flags_do_not_start_a_sweep() {
        let help = Args::try_parse_from(["maxflow-bench", "--help"]).unwrap_err();
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);

        let unknown = Args::try_parse_from(["maxflow-bench", "--fast"]).unwrap_err();
        assert_eq!(unknown.kind(), ErrorKind::UnknownArgument);

        let seed = Args::try_parse_from(["maxflow-bench", "--seed", "many"]).unwrap_err();
        assert_eq!(seed.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_positional_path_is_the_configuration() {
        let args = Args::try_parse_from(["maxflow-bench", "small.json"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("small.json")));
        assert!(args.load_config().is_err());
    }

    #[test]
    fn test_summarize_excludes_sweep_flags() {
        let args = Args::try_parse_from(["maxflow-bench", "--summarize", "results.csv"]).unwrap();
        assert_eq!(args.summarize, Some(PathBuf::from("results.csv")));

        let clash =
            Args::try_parse_from(["maxflow-bench", "--summarize", "results.csv", "--seed", "1"])
                .unwrap_err();
        assert_eq!(clash.kind(), ErrorKind::ArgumentConflict);
    }
}
