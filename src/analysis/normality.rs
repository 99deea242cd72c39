//! Normality check: Shapiro-Wilk or Jarque-Bera plus a histogram of the raw values

use super::constants::{ALPHA, HISTOGRAM_BINS};
use super::{CheckError, Outputs};
use crate::common::Dataset;
use crate::statistics::descriptive::histogram;
use crate::statistics::normality::{
    jarque_bera, shapiro_wilk, NormalityResult, SHAPIRO_MAX_ACCURATE_N, SHAPIRO_PREFERRED_MAX_N,
};
use crate::statistics::StatsError;
use std::fmt;

type Result<T> = core::result::Result<T, CheckError>;

/// Which normality test to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalityTest {
    ShapiroWilk,
    /// Preferred for samples larger than 2000
    JarqueBera,
}

impl NormalityTest {
    pub fn name(&self) -> &'static str {
        match self {
            NormalityTest::ShapiroWilk => "Shapiro-Wilk",
            NormalityTest::JarqueBera => "Jarque-Bera",
        }
    }

    pub fn run(&self, values: &[f64]) -> core::result::Result<NormalityResult, StatsError> {
        match self {
            NormalityTest::ShapiroWilk => {
                if values.len() > SHAPIRO_MAX_ACCURATE_N {
                    tracing::warn!(
                        n = values.len(),
                        "Shapiro-Wilk p-value may be inaccurate above {} observations",
                        SHAPIRO_MAX_ACCURATE_N
                    );
                } else if values.len() > SHAPIRO_PREFERRED_MAX_N {
                    tracing::warn!(
                        n = values.len(),
                        "Jarque-Bera is recommended above {} observations",
                        SHAPIRO_PREFERRED_MAX_N
                    );
                }
                shapiro_wilk(values)
            }
            NormalityTest::JarqueBera => jarque_bera(values),
        }
    }
}

impl fmt::Display for NormalityTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Verdict of one normality test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalityCheck {
    pub test: NormalityTest,
    pub statistic: f64,
    pub p_value: f64,
}

impl NormalityCheck {
    /// Normality is not rejected at [`ALPHA`].
    pub fn is_normal(&self) -> bool {
        self.p_value > ALPHA
    }

    pub fn message(&self, column: &str) -> String {
        if self.is_normal() {
            format!(
                "{} data appears to be normally distributed (p-value = {:.4})",
                column, self.p_value
            )
        } else {
            format!(
                "{} does not appear to be normally distributed (p-value = {:.4})",
                column, self.p_value
            )
        }
    }
}

/// Runs `test` on `values` without printing or plotting.
pub fn check_values(values: &[f64], test: NormalityTest) -> Result<NormalityCheck> {
    let result = test.run(values)?;
    Ok(NormalityCheck {
        test,
        statistic: result.statistic,
        p_value: result.p_value,
    })
}

/// Tests the non-missing values of `column` and draws their histogram.
pub fn test_normality(
    dataset: &Dataset,
    column: &str,
    test: NormalityTest,
    outputs: &mut Outputs,
) -> Result<NormalityCheck> {
    let values = dataset.values(column)?;
    let check = check_values(&values, test)?;

    let message = check.message(column);
    println!("{}", message);
    outputs
        .report
        .record(test.name(), &[column], check.statistic, check.p_value, message);

    outputs
        .plots
        .histogram(&histogram(&values, HISTOGRAM_BINS), column, column)?;

    Ok(check)
}

/// Tests `value_column` separately within every group of `group_column`.
///
/// Groups too small (or too uniform) for the test are reported and skipped.
/// Returns the group value with its verdict for every group that was tested.
pub fn test_normality_by_group(
    dataset: &Dataset,
    value_column: &str,
    group_column: &str,
    test: NormalityTest,
    outputs: &mut Outputs,
) -> Result<Vec<(f64, NormalityCheck)>> {
    let mut checks = Vec::new();

    for group in dataset.group_by(group_column, value_column)? {
        let label = group.label();
        println!(
            "Testing for normality for {} and {} = {} ...",
            value_column, group_column, label
        );

        let check = match check_values(&group.values, test) {
            Ok(check) => check,
            Err(CheckError::Statistics(
                error @ (StatsError::TooFewObservations { .. } | StatsError::ConstantInput(_)),
            )) => {
                println!("{} could not be tested: {}", value_column, error);
                tracing::warn!(group_column, group = %label, %error, "Skipped normality test");
                continue;
            }
            Err(error) => return Err(error),
        };

        let message = check.message(value_column);
        println!("{}", message);
        outputs.report.record(
            test.name(),
            &[value_column, group_column],
            check.statistic,
            check.p_value,
            format!("{} = {}: {}", group_column, label, message),
        );

        let title = format!("{} ({} = {})", value_column, group_column, label);
        outputs
            .plots
            .histogram(&histogram(&group.values, HISTOGRAM_BINS), &title, value_column)?;

        checks.push((group.key, check));
    }

    Ok(checks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PlotSink;

    #[test]
    fn test_messages() {
        let check = NormalityCheck {
            test: NormalityTest::ShapiroWilk,
            statistic: 0.97,
            p_value: 0.8923673075239196,
        };
        assert_eq!(
            check.message("MOT_MEAN_NORM"),
            "MOT_MEAN_NORM data appears to be normally distributed (p-value = 0.8924)"
        );

        let check = NormalityCheck {
            p_value: 0.01,
            ..check
        };
        assert_eq!(
            check.message("USE_FREQ"),
            "USE_FREQ does not appear to be normally distributed (p-value = 0.0100)"
        );
    }

    #[test]
    fn test_normality_records_verdict() {
        let dataset =
            Dataset::from_numeric(&[("X", (1..=10).map(f64::from).collect::<Vec<_>>())]).unwrap();
        let mut outputs = Outputs::new(PlotSink::disabled());

        let check =
            test_normality(&dataset, "X", NormalityTest::ShapiroWilk, &mut outputs).unwrap();

        assert!(check.is_normal());
        assert_eq!(outputs.report.entries().len(), 1);
        assert_eq!(outputs.report.entries()[0].test, "Shapiro-Wilk");
    }

    #[test]
    fn test_by_group_skips_untestable_groups() {
        let dataset = Dataset::from_numeric(&[
            ("G", [1.0, 1.0, 1.0, 1.0, 2.0, 3.0, 3.0]),
            ("V", [1.0, 2.0, 3.0, 4.0, 9.0, 5.0, 5.0]),
        ])
        .unwrap();
        let mut outputs = Outputs::new(PlotSink::disabled());

        let checks = test_normality_by_group(
            &dataset,
            "V",
            "G",
            NormalityTest::JarqueBera,
            &mut outputs,
        )
        .unwrap();

        // Group 2 has one value and group 3 is constant.
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].0, 1.0);
        assert_eq!(checks[0].1.test, NormalityTest::JarqueBera);
    }

    #[test]
    fn test_missing_column() {
        let dataset = Dataset::from_numeric(&[("X", [1.0, 2.0, 3.0])]).unwrap();
        let mut outputs = Outputs::new(PlotSink::disabled());

        let result = test_normality(&dataset, "Y", NormalityTest::ShapiroWilk, &mut outputs);
        assert!(matches!(result, Err(CheckError::Dataset(_))));
    }
}
