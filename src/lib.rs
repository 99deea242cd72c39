//! # survey-eda
//! Exploratory analysis of the contributor survey dataset.
//!
//! A run loads the survey CSV, derives the composite experience variables,
//! min-max normalizes the scales used by the research questions and then runs
//! the assumption checks and association tests for each research question.

use analysis::research_questions::{run_research_questions, ResearchQuestion};
use analysis::{prepare_dataset, Outputs};
use common::tables::format_dataset_preview;
use common::Dataset;
use std::path::Path;
use thiserror::Error;

/// Loading the dataset from disk.
pub mod parsing;

/// Shared infrastructure: the in-memory table, ASCII tables, plots and the
/// JSON results report.
pub mod common {
    pub mod data_structures;
    pub mod plots;
    pub mod report;
    pub mod tables;

    pub use data_structures::{Dataset, DatasetError, Group};
    pub use plots::{PlotError, PlotSink};
    pub use report::Report;
}

/// Numerical kernels behind the checks and tests.
pub mod statistics;

/// Study specific analysis steps.
pub mod analysis;

/// Errors that can occur during a run
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Parsing error: {0}")]
    Parsing(#[from] parsing::ParsingError),

    #[error("Transform error: {0}")]
    Transform(#[from] analysis::transform::TransformError),

    #[error("{0}")]
    ResearchQuestion(#[from] analysis::research_questions::ResearchQuestionError),

    #[error("Failed to write report: {0}")]
    Report(#[from] common::report::ReportError),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

type Result<T> = core::result::Result<T, AnalysisError>;

/// Loads `input`, derives the study variables, prints a preview of the
/// prepared table and answers `questions` in order.
///
/// Verdicts and plots go to `outputs`; writing the report is left to the caller.
pub fn run_analysis(
    input: &Path,
    questions: &[ResearchQuestion<'_>],
    outputs: &mut Outputs,
) -> Result<Dataset> {
    let mut dataset = parsing::parse_dataset(input)?;
    prepare_dataset(&mut dataset)?;
    println!("{}", format_dataset_preview(&dataset));

    run_research_questions(&dataset, questions, outputs)?;
    Ok(dataset)
}
