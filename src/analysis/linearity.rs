//! Linearity check: least-squares fit plus a scatter plot of the raw points,
//! the fitted line and the mean of the dependent variable per independent value.

use super::{CheckError, Outputs};
use crate::common::Dataset;
use crate::statistics::descriptive::mean;
use crate::statistics::regression::{linear_regression, LinearRegression};
use std::path::PathBuf;

type Result<T> = core::result::Result<T, CheckError>;

/// What the linearity check computed
#[derive(Debug, Clone, PartialEq)]
pub struct LinearityCheck {
    pub fit: LinearRegression,
    /// `(x, mean of y)` for every distinct `x`, ascending
    pub group_means: Vec<(f64, f64)>,
    pub plot: Option<PathBuf>,
}

/// Fits `y_column` on `x_column` and plots the relationship.
///
/// The check produces no verdict; the plot is meant for visual inspection.
/// Rows missing either value are skipped.
pub fn test_linearity(
    dataset: &Dataset,
    x_column: &str,
    y_column: &str,
    outputs: &mut Outputs,
) -> Result<LinearityCheck> {
    let points = dataset.pairs(x_column, y_column)?;
    let (xs, ys): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
    let fit = linear_regression(&xs, &ys)?;

    let group_means: Vec<(f64, f64)> = dataset
        .group_by(x_column, y_column)?
        .iter()
        .map(|group| (group.key, mean(&group.values)))
        .collect();

    println!(
        "Slope: {:.4} (standard error {:.4}), intercept: {:.4}, r: {:.4}, p-value: {:.4}",
        fit.slope, fit.std_err, fit.intercept, fit.r_value, fit.p_value
    );

    let plot = outputs
        .plots
        .regression(&points, &fit, &group_means, x_column, y_column)?;

    Ok(LinearityCheck {
        fit,
        group_means,
        plot,
    })
}
