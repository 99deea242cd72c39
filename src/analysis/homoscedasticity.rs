//! Homoscedasticity check: Levene's test across the groups of one column
//!
//! Groups with (near) zero sample variance carry no information about spread
//! and are left out of the test; they still appear in the summary table and
//! the box plot.

use super::constants::{ALPHA, VARIANCE_TOLERANCE};
use super::{CheckError, Outputs};
use crate::common::tables::{format_titled_table, GroupSummary};
use crate::common::{Dataset, Group};
use crate::statistics::descriptive::{mean, variance};
use crate::statistics::levene::levene;

type Result<T> = core::result::Result<T, CheckError>;

/// Title of the box plot drawn by the check.
pub const PLOT_TITLE: &str = "Homoscedasticity Plot";

/// Result of the homoscedasticity check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeveneOutcome {
    Tested { statistic: f64, p_value: f64 },
    /// Fewer than two groups had a usable variance.
    InsufficientData,
}

impl LeveneOutcome {
    /// `Some(true)` when equal variances are not rejected at [`ALPHA`].
    pub fn is_supported(&self) -> Option<bool> {
        match self {
            LeveneOutcome::Tested { p_value, .. } => Some(*p_value > ALPHA),
            LeveneOutcome::InsufficientData => None,
        }
    }

    pub fn message(&self) -> String {
        match (self, self.is_supported()) {
            (LeveneOutcome::Tested { p_value, .. }, Some(true)) => {
                format!("Homoscedasticity is supported (p-value = {:.4})", p_value)
            }
            (LeveneOutcome::Tested { p_value, .. }, _) => {
                format!("Homoscedasticity is not supported (p-value = {:.4})", p_value)
            }
            (LeveneOutcome::InsufficientData, _) => {
                "Error: Not enough data to perform Levene test".to_string()
            }
        }
    }
}

/// Whether a group's spread is usable by Levene's test.
fn has_variance(group: &Group) -> bool {
    variance(&group.values) > VARIANCE_TOLERANCE
}

/// Runs Levene's test on the groups with non-negligible variance.
pub fn levene_outcome(groups: &[Group]) -> Result<LeveneOutcome> {
    let usable: Vec<&[f64]> = groups
        .iter()
        .filter(|group| has_variance(group))
        .map(|group| group.values.as_slice())
        .collect();

    if usable.len() < 2 {
        return Ok(LeveneOutcome::InsufficientData);
    }

    let result = levene(&usable)?;
    Ok(LeveneOutcome::Tested {
        statistic: result.statistic,
        p_value: result.p_value,
    })
}

/// One summary row per group, ascending by group value.
pub fn summarize_groups(groups: &[Group]) -> Vec<GroupSummary> {
    groups
        .iter()
        .map(|group| {
            GroupSummary::new(
                group,
                mean(&group.values),
                variance(&group.values),
                has_variance(group),
            )
        })
        .collect()
}

/// Tests whether `value_column` has equal variance across the groups of `group_column`.
pub fn test_homoscedasticity(
    dataset: &Dataset,
    group_column: &str,
    value_column: &str,
    outputs: &mut Outputs,
) -> Result<LeveneOutcome> {
    let groups = dataset.group_by(group_column, value_column)?;

    let title = format!("{} grouped by {}", value_column, group_column);
    println!("{}", format_titled_table(&summarize_groups(&groups), Some(&title)));

    let excluded = groups.iter().filter(|group| !has_variance(group)).count();
    if excluded > 0 {
        tracing::debug!(
            group_column,
            value_column,
            excluded,
            "Excluded groups without variance from Levene's test"
        );
    }

    let outcome = levene_outcome(&groups)?;
    let message = outcome.message();
    println!("{}", message);

    if let LeveneOutcome::Tested { statistic, p_value } = outcome {
        outputs.report.record(
            "Levene",
            &[group_column, value_column],
            statistic,
            p_value,
            message,
        );
    }

    if !groups.is_empty() {
        outputs
            .plots
            .box_plot(&groups, PLOT_TITLE, group_column, value_column)?;
    }

    Ok(outcome)
}
