//! Min-max normalization rounded to one decimal place

use super::{Result, TransformError};
use crate::common::Dataset;
use crate::statistics::descriptive::min_max;

/// Normalizes `source` and stores the result under `target`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalization {
    pub source: &'static str,
    pub target: &'static str,
}

impl Normalization {
    /// Overwrites `column` with its normalized values.
    pub const fn in_place(column: &'static str) -> Self {
        Self {
            source: column,
            target: column,
        }
    }
}

/// Rounds to one decimal, ties to even (as NumPy's `round`).
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Maps `values` onto `[0, 1]` via `(x - min) / (max - min)`, rounded to one decimal.
///
/// Missing values are ignored when finding the range and stay missing.
///
/// # Errors
/// [`TransformError::DegenerateColumn`] when fewer than two distinct values exist.
pub fn min_max_normalize(column: &str, values: &[f64]) -> Result<Vec<f64>> {
    let (min, max) = min_max(values)
        .filter(|(min, max)| max > min)
        .ok_or_else(|| TransformError::DegenerateColumn(column.to_string()))?;

    let range = max - min;
    Ok(values
        .iter()
        .map(|value| round_one_decimal((value - min) / range))
        .collect())
}

/// Applies one normalization to the dataset.
pub fn normalize_column(dataset: &mut Dataset, normalization: &Normalization) -> Result<()> {
    let normalized = min_max_normalize(
        normalization.source,
        dataset.numeric(normalization.source)?,
    )?;
    dataset.set_numeric(normalization.target, normalized)?;
    Ok(())
}
