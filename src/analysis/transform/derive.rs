//! Composite columns built as fixed weighted sums of existing columns

use super::{Result, TransformError};
use crate::analysis::constants::WEIGHT_TOLERANCE;
use crate::common::Dataset;

/// A column defined as `sum(weight * column)` over its terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composite {
    pub target: &'static str,
    pub terms: &'static [(&'static str, f64)],
}

impl Composite {
    pub fn weight_sum(&self) -> f64 {
        self.terms.iter().map(|(_, weight)| weight).sum()
    }
}

/// Computes `composite` row by row and stores it under its target name.
///
/// An existing column with the target name is replaced. Missing inputs
/// propagate as missing outputs.
///
/// # Errors
/// * [`TransformError::InvalidWeights`] - weights do not sum to 1
/// * [`TransformError::Dataset`] - a term column is absent or not numeric
pub fn derive_composite(dataset: &mut Dataset, composite: &Composite) -> Result<()> {
    let sum = composite.weight_sum();
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(TransformError::InvalidWeights {
            column: composite.target.to_string(),
            sum,
        });
    }

    let mut values = vec![0.0; dataset.row_count()];
    for &(column, weight) in composite.terms {
        let terms = dataset.numeric(column)?;
        for (value, term) in values.iter_mut().zip(terms) {
            *value += weight * term;
        }
    }

    if dataset.contains(composite.target) {
        tracing::debug!(column = composite.target, "Replacing existing column");
    }
    dataset.set_numeric(composite.target, values)?;
    Ok(())
}
