//! Statistical kernels
//!
//! Each submodule implements one family of calculations over plain `f64`
//! slices. They know nothing about the survey or the dataset; the
//! [`crate::analysis`] modules pick the columns and interpret the results.
//!
//! Semantics follow SciPy's defaults (two-sided alternatives, median-centred
//! Levene, tau-b, continuity-corrected Mann-Whitney U) so results can be
//! cross-checked against the reference notebooks.

pub mod correlation;
pub mod descriptive;
pub mod distributions;
pub mod kendall;
pub mod levene;
pub mod mann_whitney;
pub mod normality;
pub mod ranks;
pub mod regression;

use thiserror::Error;

/// Errors that can occur while computing a statistic
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("{test} requires at least {required} observations, got {actual}")]
    TooFewObservations {
        test: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("{test} requires at least {required} groups, got {actual}")]
    TooFewGroups {
        test: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("{0} is undefined when the input is constant")]
    ConstantInput(&'static str),

    #[error("Inputs have different lengths ({left} and {right})")]
    LengthMismatch { left: usize, right: usize },

    #[error("Invalid distribution parameters: {0}")]
    Distribution(String),
}

pub type Result<T> = core::result::Result<T, StatsError>;

/// Fails unless both samples are the same length.
pub(crate) fn ensure_same_length(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    Ok(())
}

/// Fails unless the sample has at least `required` observations.
pub(crate) fn ensure_min_len(test: &'static str, values: &[f64], required: usize) -> Result<()> {
    if values.len() < required {
        return Err(StatsError::TooFewObservations {
            test,
            required,
            actual: values.len(),
        });
    }
    Ok(())
}
