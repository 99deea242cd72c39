//! Study-specific analysis steps
//!
//! This module contains the analysis logic for:
//! - Deriving and normalizing the study variables
//! - Assumption checks (linearity, homoscedasticity, normality)
//! - Association tests
//! - The research questions that tie them together

pub mod association;
pub mod constants;
pub mod homoscedasticity;
pub mod linearity;
pub mod normality;
pub mod research_questions;
pub mod transform;

use crate::common::{DatasetError, PlotError, PlotSink, Report};
use crate::statistics::StatsError;

// Re-export analysis entry points for convenience
pub use association::{run_association, Method};
pub use homoscedasticity::{test_homoscedasticity, LeveneOutcome};
pub use linearity::{test_linearity, LinearityCheck};
pub use normality::{test_normality, NormalityCheck, NormalityTest};
pub use research_questions::{
    run_research_question, run_research_questions, Assumptions, ResearchQuestion,
    RESEARCH_QUESTIONS,
};
pub use transform::prepare_dataset;

/// Where the checks send everything besides console text
#[derive(Debug)]
pub struct Outputs {
    pub plots: PlotSink,
    pub report: Report,
}

impl Outputs {
    pub fn new(plots: PlotSink) -> Self {
        Self {
            plots,
            report: Report::new(),
        }
    }
}

/// Errors that can occur during the assumption checks
#[derive(Debug)]
pub enum CheckError {
    Dataset(DatasetError),
    Statistics(StatsError),
    PlotGeneration(PlotError),
}

impl std::fmt::Display for CheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckError::Dataset(e) => write!(f, "Failed to read columns: {}", e),
            CheckError::Statistics(e) => write!(f, "Failed to compute statistic: {}", e),
            CheckError::PlotGeneration(e) => write!(f, "Failed to generate plot: {}", e),
        }
    }
}

impl std::error::Error for CheckError {}

impl From<DatasetError> for CheckError {
    fn from(err: DatasetError) -> Self {
        CheckError::Dataset(err)
    }
}

impl From<StatsError> for CheckError {
    fn from(err: StatsError) -> Self {
        CheckError::Statistics(err)
    }
}

impl From<PlotError> for CheckError {
    fn from(err: PlotError) -> Self {
        CheckError::PlotGeneration(err)
    }
}
