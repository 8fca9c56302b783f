use crate::core::{FinishTimeModel, Instance, Searcher};
use crate::data::deserialize;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};
use std::fs::File;
use std::io::BufReader;
use tracing::{info, warn};

/// Report of running a directory of samples.
#[derive(Debug, Deserialize, Serialize)]
pub struct Report {
    searcher: String,
    model: FinishTimeModel,
    entries: Vec<ReportEntry>,
}

impl Report {
    /// Create a new report.
    fn new(searcher: String, model: FinishTimeModel) -> Self {
        let entries = Vec::new();
        Self {
            searcher,
            model,
            entries,
        }
    }

    /// Get the searcher name.
    #[must_use]
    pub fn searcher_name(&self) -> &str {
        &self.searcher
    }

    /// Get the entries.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Searcher: {} ({})", self.searcher, self.model.name())?;
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        writeln!(f, "-------------------")
    }
}

/// Report of running a single sample.
/// `time` is None when the search found no valid order.
#[non_exhaustive]
#[derive(Debug, Deserialize, Serialize)]
pub struct ReportEntry {
    pub name: String,
    pub time: Option<u64>,
    pub elapsed: f64,
}

impl Display for ReportEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.time {
            Some(time) => write!(f, "{}: {} in {:.2} sec", self.name, time, self.elapsed),
            None => write!(f, "{}: no solution in {:.2} sec", self.name, self.elapsed),
        }
    }
}

/// Run all samples in the `samples` directory.
/// Print the report to stdout.
///
/// # Arguments
/// - `valid` is true, check if the time is correct.
/// - `searcher` is the searcher to run.
/// - `model` is the finish time model to minimize.
///
/// # Errors
/// - If a file cannot be read.
/// - If no samples are found.
///
/// # Panics
/// - If the order is invalid.
/// - If the time is incorrect and `valid` is true.
pub fn samples(valid: bool, searcher: &mut dyn Searcher, model: FinishTimeModel) -> anyhow::Result<()> {
    run("samples", valid, searcher, model).and_then(|report| {
        if report.entries.is_empty() {
            Err(anyhow!("No samples found"))
        } else {
            println!("{report}");
            Ok(())
        }
    })
}

/// Run all samples in the `dir` directory.
/// Samples with more tasks than the searcher handles are skipped.
///
/// # Arguments
/// - `valid` is true, check if the time is correct.
/// - `searcher` is the searcher to run.
/// - `model` is the finish time model to minimize.
///
/// # Errors
/// - If a file cannot be read.
/// - If a sample is malformed.
///
/// # Panics
/// - If the order is invalid.
/// - If the time is incorrect and `valid` is true.
pub fn run(
    dir: &str,
    valid: bool,
    searcher: &mut dyn Searcher,
    model: FinishTimeModel,
) -> anyhow::Result<Report> {
    let mut report = Report::new(searcher.name().into(), model);

    let mut files = std::fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    files.sort_by_key(std::fs::DirEntry::file_name);

    for file in files {
        let (name, workers, expected) = parse_filename(&file.file_name())?;
        let instance: Instance = deserialize(&mut BufReader::new(File::open(file.path())?))?;

        if instance.workers.get() != workers {
            warn!(name = %name, workers, actual = instance.workers.get(), "worker count differs from filename");
        }

        if instance.tasks.len() > searcher.maximum_tasks() {
            info!(name = %name, tasks = instance.tasks.len(), "skipping sample, too many tasks");
            continue;
        }

        let start = std::time::Instant::now();
        let result = searcher.search(&instance, model);
        let elapsed = start.elapsed().as_secs_f64();

        let time = match result {
            Ok(order) => {
                assert!(order.verify(&instance.tasks), "Invalid order created");
                Some(order.time)
            }
            Err(crate::core::SearchError::NoSolution) => None,
            Err(error) => return Err(anyhow!("{name}: {error}")),
        };

        if valid {
            assert_eq!(time, expected, "Invalid time {name}");
        }

        report.entries.push(ReportEntry { name, time, elapsed });
    }

    Ok(report)
}

/// Parses `{workers}_{expected}_{index}.json`, where `expected` is `none` for
/// instances without a valid order.
fn parse_filename(filename: &std::ffi::OsString) -> anyhow::Result<(String, usize, Option<u64>)> {
    static NAME_ERR: &str = "Cannot read filename";

    let name = filename.to_str().ok_or_else(|| anyhow!(NAME_ERR))?;
    let mut parts = name.split('.');
    let mut parts = parts.next().ok_or_else(|| anyhow!(NAME_ERR))?.split('_');
    let workers = parts.next().ok_or_else(|| anyhow!(NAME_ERR))?.parse()?;
    let expected = match parts.next().ok_or_else(|| anyhow!(NAME_ERR))? {
        "none" => None,
        time => Some(time.parse()?),
    };
    let _: usize = parts.next().ok_or_else(|| anyhow!(NAME_ERR))?.parse()?;
    Ok((name.into(), workers, expected))
}
