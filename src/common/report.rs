//! Machine-readable summary of every verdict produced during a run
//!
//! The console output is meant for reading; `results.json` collects the same
//! verdicts for comparing runs or feeding them into a write-up.

use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the report inside the output directory.
pub const REPORT_FILE_NAME: &str = "results.json";

/// Errors that can occur while writing the report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

type Result<T> = core::result::Result<T, ReportError>;

/// A single verdict-producing test.
///
/// Non-finite statistics are written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    /// Heading the test ran under, e.g. `RQ4`
    pub section: String,
    pub test: String,
    pub columns: Vec<String>,
    pub statistic: f64,
    pub p_value: f64,
    pub verdict: String,
}

/// All verdicts of a run, in the order they were produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    #[serde(skip)]
    section: String,
    entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries recorded from now on are filed under `section`.
    pub fn set_section(&mut self, section: &str) {
        self.section = section.to_string();
    }

    pub fn record(
        &mut self,
        test: &str,
        columns: &[&str],
        statistic: f64,
        p_value: f64,
        verdict: impl Into<String>,
    ) {
        self.entries.push(ReportEntry {
            section: self.section.clone(),
            test: test.to_string(),
            columns: columns.iter().map(|column| column.to_string()).collect(),
            statistic,
            p_value,
            verdict: verdict.into(),
        });
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the report as pretty-printed JSON into `output_dir`, creating it if needed.
    pub fn write(&self, output_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(REPORT_FILE_NAME);
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(path)
    }
}
