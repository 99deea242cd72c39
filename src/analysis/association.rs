//! Association tests between the two variables of a research question

use super::constants::{ALPHA, MANN_WHITNEY_GROUPS};
use super::Outputs;
use crate::common::tables::format_matrix;
use crate::common::{Dataset, DatasetError, PlotError};
use crate::statistics::correlation::{correlation_matrix, pearson, spearman, Correlation};
use crate::statistics::kendall::{kendall_tau, KendallTau};
use crate::statistics::mann_whitney::{mann_whitney_u, MannWhitney};
use crate::statistics::StatsError;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Printed when a research question names an unknown method.
pub const INVALID_METHOD_MESSAGE: &str =
    "Invalid method. Choose from 'pearson', 'kendall', 'spearman', or 'mann_whitney'.";

/// Title of the Mann-Whitney box plot.
pub const MANN_WHITNEY_PLOT_TITLE: &str = "Mann-Whitney U Test";

/// Errors that can occur during an association test
#[derive(Error, Debug)]
pub enum AssociationError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Statistics error: {0}")]
    Statistics(#[from] StatsError),

    #[error("Failed to generate plot: {0}")]
    Plot(#[from] PlotError),

    #[error("No rows with {column} = {value}")]
    EmptyGroup { column: String, value: f64 },

    #[error("Unknown association method: {0}")]
    UnknownMethod(String),
}

type Result<T> = core::result::Result<T, AssociationError>;

/// Association test selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Pearson,
    Kendall,
    Spearman,
    MannWhitney,
}

impl FromStr for Method {
    type Err = AssociationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pearson" => Ok(Method::Pearson),
            "kendall" => Ok(Method::Kendall),
            "spearman" => Ok(Method::Spearman),
            "mann_whitney" => Ok(Method::MannWhitney),
            other => Err(AssociationError::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Pearson => "pearson",
            Method::Kendall => "kendall",
            Method::Spearman => "spearman",
            Method::MannWhitney => "mann_whitney",
        })
    }
}

/// Dependent values split by the Mann-Whitney grouping values
#[derive(Debug, Clone, PartialEq)]
pub struct MannWhitneyGroups {
    pub first: Vec<f64>,
    pub second: Vec<f64>,
    /// Rows whose grouping value is neither of the two compared values
    pub excluded: usize,
}

/// Splits `value_column` by whether `group_column` equals 1 or 2.
///
/// Rows missing either value are skipped; rows with any other grouping
/// value are counted in [`MannWhitneyGroups::excluded`].
pub fn split_mann_whitney_groups(
    dataset: &Dataset,
    group_column: &str,
    value_column: &str,
) -> Result<MannWhitneyGroups> {
    let (first_key, second_key) = MANN_WHITNEY_GROUPS;
    let mut groups = MannWhitneyGroups {
        first: Vec::new(),
        second: Vec::new(),
        excluded: 0,
    };

    for (key, value) in dataset.pairs(group_column, value_column)? {
        if key == first_key {
            groups.first.push(value);
        } else if key == second_key {
            groups.second.push(value);
        } else {
            groups.excluded += 1;
        }
    }

    for (values, key) in [(&groups.first, first_key), (&groups.second, second_key)] {
        if values.is_empty() {
            return Err(AssociationError::EmptyGroup {
                column: group_column.to_string(),
                value: key,
            });
        }
    }

    Ok(groups)
}

/// 2x2 Pearson correlation matrix of `x` and `y` with the p-value of `r`.
pub fn pearson_association(
    dataset: &Dataset,
    x: &str,
    y: &str,
) -> Result<(Vec<Vec<f64>>, Correlation)> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = dataset.pairs(x, y)?.into_iter().unzip();
    let matrix = correlation_matrix(&[xs.as_slice(), ys.as_slice()])?;
    let correlation = pearson(&xs, &ys)?;
    Ok((matrix, correlation))
}

/// Kendall's tau-b between two columns.
///
/// # Arguments
/// * `dataset` - Table holding both columns
/// * `x` - Independent column
/// * `y` - Dependent column
///
/// # Returns
/// Tau and its two-sided p-value over the rows where both columns are present
pub fn kendall_association(dataset: &Dataset, x: &str, y: &str) -> Result<KendallTau> {
    // Rows missing either value are dropped pairwise
    let (xs, ys): (Vec<f64>, Vec<f64>) = dataset.pairs(x, y)?.into_iter().unzip();
    Ok(kendall_tau(&xs, &ys)?)
}

/// Spearman's rank correlation between two columns.
///
/// # Arguments
/// * `dataset` - Table holding both columns
/// * `x` - Independent column
/// * `y` - Dependent column
///
/// # Returns
/// Rho and its two-sided p-value, ties receiving average ranks
pub fn spearman_association(dataset: &Dataset, x: &str, y: &str) -> Result<Correlation> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = dataset.pairs(x, y)?.into_iter().unzip();
    Ok(spearman(&xs, &ys)?)
}

/// Mann-Whitney U test of `value_column` between the two groups of `group_column`.
pub fn mann_whitney_association(
    dataset: &Dataset,
    group_column: &str,
    value_column: &str,
) -> Result<(MannWhitney, MannWhitneyGroups)> {
    let groups = split_mann_whitney_groups(dataset, group_column, value_column)?;
    let result = mann_whitney_u(&groups.first, &groups.second)?;
    Ok((result, groups))
}

/// Significance verdict printed after the Mann-Whitney U test.
pub fn mann_whitney_verdict(p_value: f64) -> &'static str {
    if p_value < ALPHA {
        "Reject the null hypothesis: There is a significant difference between the groups."
    } else {
        "Failed to reject the null hypothesis: There is no significant difference between the groups."
    }
}

/// Runs `method` on the `independent`/`dependent` pair and prints the result.
pub fn run_association(
    dataset: &Dataset,
    method: Method,
    independent: &str,
    dependent: &str,
    outputs: &mut Outputs,
) -> Result<()> {
    let columns = [independent, dependent];

    match method {
        Method::Pearson => {
            let (matrix, correlation) = pearson_association(dataset, independent, dependent)?;
            println!("{}", format_matrix(&columns, &matrix));
            let message = format!(
                "Pearson's r: {:.4}, p-value: {:.4}",
                correlation.coefficient, correlation.p_value
            );
            println!("{}", message);
            outputs.report.record(
                "Pearson",
                &columns,
                correlation.coefficient,
                correlation.p_value,
                message,
            );
        }
        Method::Kendall => {
            let result = kendall_association(dataset, independent, dependent)?;
            let message = format!(
                "Kendall's Tau value: {:.4}, p-value: {:.4}",
                result.tau, result.p_value
            );
            println!("{}", message);
            outputs
                .report
                .record("Kendall's tau", &columns, result.tau, result.p_value, message);
        }
        Method::Spearman => {
            let result = spearman_association(dataset, independent, dependent)?;
            let message = format!(
                "Spearman's rho value: {:.4}, p-value: {:.4}",
                result.coefficient, result.p_value
            );
            println!("{}", message);
            outputs.report.record(
                "Spearman's rho",
                &columns,
                result.coefficient,
                result.p_value,
                message,
            );
        }
        Method::MannWhitney => {
            let (result, groups) = mann_whitney_association(dataset, independent, dependent)?;

            // Rows outside the two compared groups are reported, not silently dropped
            if groups.excluded > 0 {
                println!(
                    "Excluded {} rows where {} is neither {} nor {}",
                    groups.excluded, independent, MANN_WHITNEY_GROUPS.0, MANN_WHITNEY_GROUPS.1
                );
                tracing::warn!(
                    column = independent,
                    excluded = groups.excluded,
                    "Rows outside the compared groups were excluded from the Mann-Whitney U test"
                );
            }

            println!(
                "Mann-Whitney U test: {:.4}, p-value: {:.4}",
                result.statistic, result.p_value
            );
            let verdict = mann_whitney_verdict(result.p_value);
            println!("{}", verdict);
            outputs.report.record(
                "Mann-Whitney U",
                &columns,
                result.statistic,
                result.p_value,
                verdict,
            );

            // The plot shows every group, including the excluded ones
            if outputs.plots.is_enabled() {
                let plot_groups = dataset.group_by(independent, dependent)?;
                outputs.plots.box_plot(
                    &plot_groups,
                    MANN_WHITNEY_PLOT_TITLE,
                    independent,
                    dependent,
                )?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PlotSink;
    use rstest::rstest;

    #[rstest]
    #[case("pearson", Method::Pearson)]
    #[case("kendall", Method::Kendall)]
    #[case("spearman", Method::Spearman)]
    #[case("mann_whitney", Method::MannWhitney)]
    fn test_method_round_trips_through_text(#[case] text: &str, #[case] method: Method) {
        assert_eq!(text.parse::<Method>().unwrap(), method);
        assert_eq!(method.to_string(), text);
    }

    #[test]
    fn test_unknown_method() {
        let result = "anova".parse::<Method>();
        assert!(matches!(result, Err(AssociationError::UnknownMethod(ref m)) if m == "anova"));
    }

    #[test]
    fn test_kendall_on_monotonic_pair() {
        let x: Vec<f64> = (1..=12).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|v| v * v).collect();
        let dataset = Dataset::from_numeric(&[("X", x), ("Y", y)]).unwrap();

        let result = kendall_association(&dataset, "X", "Y").unwrap();
        assert!((result.tau - 1.0).abs() < 1e-12);
        assert!(result.p_value < 1e-6);
    }

    #[test]
    fn test_pearson_matrix() {
        let dataset = Dataset::from_numeric(&[
            ("X", [1.0, 2.0, 3.0, 4.0, 5.0]),
            ("Y", [2.0, 4.0, 5.0, 4.0, 5.0]),
        ])
        .unwrap();

        let (matrix, correlation) = pearson_association(&dataset, "X", "Y").unwrap();
        assert_eq!(matrix[0][0], 1.0);
        assert_eq!(matrix[0][1], correlation.coefficient);
        assert!((correlation.coefficient - 0.7745966692414834).abs() < 1e-12);
    }

    #[test]
    fn test_mann_whitney_low_vs_high_groups() {
        let dataset = Dataset::from_numeric(&[
            ("STATEMENT", [1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0, 2.0, 3.0]),
            ("MOT_MEAN", [1.0, 1.5, 2.0, 1.2, 1.8, 4.0, 4.5, 5.0, 4.2, 4.8, 3.0]),
        ])
        .unwrap();

        let (result, groups) = mann_whitney_association(&dataset, "STATEMENT", "MOT_MEAN").unwrap();

        assert_eq!(groups.first.len(), 5);
        assert_eq!(groups.second.len(), 5);
        assert_eq!(groups.excluded, 1);
        assert_eq!(result.statistic, 0.0);
        assert!(result.p_value < ALPHA);
        assert!(mann_whitney_verdict(result.p_value).starts_with("Reject the null hypothesis"));
    }

    #[test]
    fn test_mann_whitney_empty_group() {
        let dataset = Dataset::from_numeric(&[
            ("STATEMENT", [1.0, 1.0, 3.0]),
            ("MOT_MEAN", [1.0, 2.0, 3.0]),
        ])
        .unwrap();

        let result = split_mann_whitney_groups(&dataset, "STATEMENT", "MOT_MEAN");
        assert!(matches!(
            result,
            Err(AssociationError::EmptyGroup { value, .. }) if value == 2.0
        ));
    }

    #[test]
    fn test_verdicts() {
        assert!(mann_whitney_verdict(0.2).starts_with("Failed to reject the null hypothesis"));
        assert!(mann_whitney_verdict(0.05).starts_with("Failed to reject"));
    }

    #[test]
    fn test_run_association_records_each_method() {
        let dataset = Dataset::from_numeric(&[
            ("X", [1.0, 2.0, 1.0, 2.0, 1.0, 2.0]),
            ("Y", [1.0, 5.0, 2.0, 6.0, 3.0, 4.0]),
        ])
        .unwrap();
        let mut outputs = Outputs::new(PlotSink::disabled());

        for method in [
            Method::Pearson,
            Method::Kendall,
            Method::Spearman,
            Method::MannWhitney,
        ] {
            run_association(&dataset, method, "X", "Y", &mut outputs).unwrap();
        }

        let tests: Vec<&str> = outputs
            .report
            .entries()
            .iter()
            .map(|entry| entry.test.as_str())
            .collect();
        assert_eq!(
            tests,
            vec!["Pearson", "Kendall's tau", "Spearman's rho", "Mann-Whitney U"]
        );
    }
}
