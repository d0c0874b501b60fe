//! Console table and CSV output for benchmark records, and per-case
//! summaries computed either from a finished sweep or from a results CSV

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generator::GraphCategory;
use crate::validation::benchmarks::BenchmarkRecord;

pub const CSV_HEADER: &str = "V,E,Type,Instance,EK_ms,Dinic_ms";

/// Column header plus rule for the console table
pub fn table_header() -> String {
    format!(
        "{:>10}{:>10}{:>15}{:>12}{:>15}{:>15}\n{}",
        "V",
        "E",
        "Type",
        "Inst",
        "EK (ms)",
        "Dinic (ms)",
        "-".repeat(77)
    )
}

pub fn table_row(record: &BenchmarkRecord) -> String {
    format!(
        "{:>10}{:>10}{:>15}{:>12}{:>15.3}{:>15.3}",
        record.vertices,
        record.edges,
        record.category.label(),
        record.instance,
        record.edmonds_karp_ms,
        record.dinic_ms
    )
}

pub fn csv_row(record: &BenchmarkRecord) -> String {
    format!(
        "{},{},\"{}\",{},{:.6},{:.6}",
        record.vertices,
        record.edges,
        record.category.label(),
        record.instance,
        record.edmonds_karp_ms,
        record.dinic_ms
    )
}

/// CSV sink flushed after every batch of records
#[derive(Debug)]
pub struct CsvReport<W: Write> {
    writer: W,
}

impl CsvReport<BufWriter<File>> {
    /// Truncate or create `path` and write the header
    pub fn create(path: &Path) -> io::Result<Self> {
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> CsvReport<W> {
    pub fn new(mut writer: W) -> io::Result<Self> {
        writeln!(writer, "{}", CSV_HEADER)?;
        writer.flush()?;
        Ok(Self { writer })
    }

    pub fn write_records(&mut self, records: &[BenchmarkRecord]) -> io::Result<()> {
        for record in records {
            writeln!(self.writer, "{}", csv_row(record))?;
        }
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Ratio between the slowest and fastest mean above which timings are
/// better read on a logarithmic axis
pub const LOG_SCALE_RATIO: f64 = 200.0;

/// Results CSV could not be summarized
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV is missing columns {missing:?}; found {found:?}")]
    MissingColumns {
        missing: Vec<&'static str>,
        found: Vec<String>,
    },

    #[error("line {line}: {message}")]
    MalformedRow { line: usize, message: String },
}

/// One timed instance, the subset of a [`BenchmarkRecord`] kept in the CSV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    pub vertices: usize,
    pub category: GraphCategory,
    pub instance: usize,
    pub edmonds_karp_ms: f64,
    pub dinic_ms: f64,
}

impl From<&BenchmarkRecord> for Timing {
    fn from(record: &BenchmarkRecord) -> Self {
        Self {
            vertices: record.vertices,
            category: record.category,
            instance: record.instance,
            edmonds_karp_ms: record.edmonds_karp_ms,
            dinic_ms: record.dinic_ms,
        }
    }
}

/// Read timings back from a results CSV.
///
/// Columns are located by name, so extra columns and reordering are
/// tolerated; quoting is only stripped from whole fields.
pub fn read_timings<R: BufRead>(reader: R) -> Result<Vec<Timing>, ReportError> {
    const REQUIRED: [&str; 5] = ["V", "Type", "Instance", "EK_ms", "Dinic_ms"];

    let mut lines = reader.lines();
    let header: Vec<String> = match lines.next() {
        Some(line) => line?.split(',').map(|c| unquote(c).to_owned()).collect(),
        None => Vec::new(),
    };
    let column = |name: &str| header.iter().position(|c| c == name);

    let missing: Vec<_> = REQUIRED.into_iter().filter(|n| column(*n).is_none()).collect();
    if !missing.is_empty() {
        return Err(ReportError::MissingColumns {
            missing,
            found: header.clone(),
        });
    }
    let [vertices, category, instance, ek, dinic] = REQUIRED.map(|n| column(n).unwrap_or(0));

    let mut timings = Vec::new();
    for (offset, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row = Row {
            line: offset + 2,
            fields: line.split(',').map(unquote).collect(),
        };

        let label = row.field(category)?;
        timings.push(Timing {
            vertices: row.parse(vertices, "vertex count")?,
            category: GraphCategory::from_label(label)
                .ok_or_else(|| row.malformed(format!("unknown graph type {:?}", label)))?,
            instance: row.parse(instance, "instance number")?,
            edmonds_karp_ms: row.parse(ek, "time")?,
            dinic_ms: row.parse(dinic, "time")?,
        });
    }
    Ok(timings)
}

struct Row<'a> {
    line: usize,
    fields: Vec<&'a str>,
}

impl<'a> Row<'a> {
    fn malformed(&self, message: String) -> ReportError {
        ReportError::MalformedRow {
            line: self.line,
            message,
        }
    }

    fn field(&self, index: usize) -> Result<&'a str, ReportError> {
        self.fields
            .get(index)
            .copied()
            .ok_or_else(|| self.malformed(format!("no field in column {}", index + 1)))
    }

    fn parse<T: FromStr>(&self, index: usize, what: &str) -> Result<T, ReportError> {
        let value = self.field(index)?;
        value
            .parse()
            .map_err(|_| self.malformed(format!("invalid {} {:?}", what, value)))
    }
}

fn unquote(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
}

/// Mean and spread of both algorithms over the instances of one case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSummary {
    pub vertices: usize,
    pub category: GraphCategory,
    /// Distinct instance numbers seen
    pub instances: usize,
    pub edmonds_karp: TimeStats,
    pub dinic: TimeStats,
}

impl CaseSummary {
    /// How many times faster Dinic ran on average
    pub fn speedup(&self) -> Option<f64> {
        (self.dinic.mean > 0.0).then(|| self.edmonds_karp.mean / self.dinic.mean)
    }
}

/// Mean and sample standard deviation in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeStats {
    pub mean: f64,
    /// Zero when only one sample exists
    pub std_dev: f64,
}

impl TimeStats {
    fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let std_dev = if samples.len() < 2 {
            0.0
        } else {
            let squares: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
            (squares / (n - 1.0)).sqrt()
        };
        Self { mean, std_dev }
    }
}

/// Axis suggestion for charting one category's means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeScale {
    Linear,
    Logarithmic,
}

/// Group timings per (category, vertex count).
///
/// Categories come out in [`GraphCategory::ALL`] order and vertex counts
/// ascending within each category.
pub fn summarize<'a, I>(timings: I) -> Vec<CaseSummary>
where
    I: IntoIterator<Item = &'a Timing>,
{
    let mut cases: BTreeMap<(usize, usize), Vec<&Timing>> = BTreeMap::new();
    for timing in timings {
        cases
            .entry((category_rank(timing.category), timing.vertices))
            .or_default()
            .push(timing);
    }

    cases
        .into_values()
        .map(|case| {
            let instances: BTreeSet<_> = case.iter().map(|t| t.instance).collect();
            let ek: Vec<f64> = case.iter().map(|t| t.edmonds_karp_ms).collect();
            let dinic: Vec<f64> = case.iter().map(|t| t.dinic_ms).collect();
            CaseSummary {
                vertices: case[0].vertices,
                category: case[0].category,
                instances: instances.len(),
                edmonds_karp: TimeStats::from_samples(&ek),
                dinic: TimeStats::from_samples(&dinic),
            }
        })
        .collect()
}

fn category_rank(category: GraphCategory) -> usize {
    GraphCategory::ALL
        .iter()
        .position(|&c| c == category)
        .unwrap_or(GraphCategory::ALL.len())
}

/// Logarithmic once the positive, finite means of `category` span at least
/// [`LOG_SCALE_RATIO`]; fewer than two such means stay linear.
pub fn suggested_scale(summaries: &[CaseSummary], category: GraphCategory) -> TimeScale {
    let means = summaries
        .iter()
        .filter(|s| s.category == category)
        .flat_map(|s| [s.edmonds_karp.mean, s.dinic.mean])
        .filter(|m| m.is_finite() && *m > 0.0);

    let (count, min, max) = means.fold((0, f64::INFINITY, 0.0_f64), |(n, lo, hi), m| {
        (n + 1, lo.min(m), hi.max(m))
    });
    if count >= 2 && max / min >= LOG_SCALE_RATIO {
        TimeScale::Logarithmic
    } else {
        TimeScale::Linear
    }
}

pub fn summary_header() -> String {
    format!(
        "{:>10}{:>15}{:>8}{:>22}{:>22}{:>10}\n{}",
        "V",
        "Type",
        "n",
        "EK mean/std (ms)",
        "Dinic mean/std (ms)",
        "speedup",
        "-".repeat(87)
    )
}

pub fn summary_row(summary: &CaseSummary) -> String {
    let speedup = summary
        .speedup()
        .map_or_else(|| "-".to_owned(), |s| format!("{:.2}x", s));
    format!(
        "{:>10}{:>15}{:>8}{:>22}{:>22}{:>10}",
        summary.vertices,
        summary.category.label(),
        summary.instances,
        format!("{:.3} / {:.3}", summary.edmonds_karp.mean, summary.edmonds_karp.std_dev),
        format!("{:.3} / {:.3}", summary.dinic.mean, summary.dinic.std_dev),
        speedup
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> BenchmarkRecord {
        BenchmarkRecord {
            vertices: 100,
            edges: 200,
            category: GraphCategory::UnitCapacity,
            instance: 3,
            edmonds_karp_ms: 1.25,
            dinic_ms: 0.5,
            max_flow: 2,
        }
    }

    #[test]
    fn test_table_layout() {
        let header = table_header();
        let lines: Vec<_> = header.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 77);
        assert_eq!(lines[1], "-".repeat(77));

        let row = table_row(&record());
        assert_eq!(row.len(), 77);
        assert!(row.ends_with("          1.250          0.500"));
    }

    #[test]
    fn test_csv_output() {
        let mut report = CsvReport::new(Vec::new()).unwrap();
        report.write_records(&[record()]).unwrap();

        let text = String::from_utf8(report.into_inner()).unwrap();
        assert_eq!(
            text,
            "V,E,Type,Instance,EK_ms,Dinic_ms\n100,200,\"unit-cap\",3,1.250000,0.500000\n"
        );
    }

    fn timing(vertices: usize, category: GraphCategory, instance: usize, ek: f64) -> Timing {
        Timing {
            vertices,
            category,
            instance,
            edmonds_karp_ms: ek,
            dinic_ms: 1.0,
        }
    }

    #[test]
    fn test_summary_groups_and_orders_cases() {
        let timings = vec![
            timing(200, GraphCategory::Sparse, 1, 4.0),
            timing(100, GraphCategory::UnitCapacity, 1, 1.0),
            timing(100, GraphCategory::Sparse, 2, 3.0),
            timing(100, GraphCategory::Sparse, 1, 1.0),
        ];
        let summaries = summarize(&timings);

        let keys: Vec<_> = summaries.iter().map(|s| (s.category, s.vertices)).collect();
        assert_eq!(
            keys,
            vec![
                (GraphCategory::Sparse, 100),
                (GraphCategory::Sparse, 200),
                (GraphCategory::UnitCapacity, 100),
            ]
        );

        let first = &summaries[0];
        assert_eq!(first.instances, 2);
        assert_eq!(first.edmonds_karp.mean, 2.0);
        assert!((first.edmonds_karp.std_dev - 2.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(first.dinic.std_dev, 0.0);
        assert_eq!(first.speedup(), Some(2.0));

        assert_eq!(summaries[1].instances, 1);
        assert_eq!(summaries[1].edmonds_karp.std_dev, 0.0);
    }

    #[test]
    fn test_scale_turns_logarithmic_at_ratio() {
        let wide = summarize(&[
            timing(100, GraphCategory::Dense, 1, 0.01),
            timing(2000, GraphCategory::Dense, 1, 2.0),
        ]);
        assert_eq!(suggested_scale(&wide, GraphCategory::Dense), TimeScale::Logarithmic);
        assert_eq!(suggested_scale(&wide, GraphCategory::Sparse), TimeScale::Linear);

        let narrow = summarize(&[timing(100, GraphCategory::Dense, 1, 150.0)]);
        assert_eq!(suggested_scale(&narrow, GraphCategory::Dense), TimeScale::Linear);
    }

    #[test]
    fn test_summary_table_layout() {
        let summaries = summarize(&[timing(100, GraphCategory::Sparse, 1, 3.0)]);
        let header = summary_header();
        let width = header.lines().next().map(str::len);
        assert_eq!(width, Some(87));

        let row = summary_row(&summaries[0]);
        assert_eq!(row.len(), 87);
        assert!(row.ends_with("3.00x"));
    }

    #[test]
    fn test_read_timings_from_written_csv() {
        let mut report = CsvReport::new(Vec::new()).unwrap();
        report.write_records(&[record()]).unwrap();
        let bytes = report.into_inner();

        let timings = read_timings(bytes.as_slice()).unwrap();
        assert_eq!(timings, vec![Timing::from(&record())]);
    }

    #[test]
    fn test_read_timings_rejects_bad_input() {
        let error = read_timings("V,E,Instance,EK_ms\n".as_bytes()).unwrap_err();
        assert!(
            matches!(&error, ReportError::MissingColumns { missing, .. }
                if missing == &vec!["Type", "Dinic_ms"]),
            "{}",
            error
        );

        let csv = "V,E,Type,Instance,EK_ms,Dinic_ms\n10,20,\"bogus\",1,0.1,0.2\n";
        let unknown = read_timings(csv.as_bytes()).unwrap_err();
        assert!(matches!(unknown, ReportError::MalformedRow { line: 2, .. }));

        let csv = "V,E,Type,Instance,EK_ms,Dinic_ms\n10,20,\"dense\"\n";
        let short = read_timings(csv.as_bytes()).unwrap_err();
        assert!(matches!(short, ReportError::MalformedRow { line: 2, .. }));
    }
}
