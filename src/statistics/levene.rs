//! Levene's test for equal variances (Brown-Forsythe variant)
//!
//! Deviations are measured from each group's median, which keeps the test
//! robust for the skewed Likert-style scales in the survey.

use super::descriptive::{mean, median};
use super::distributions::f_sf;
use super::{Result, StatsError};

/// Result of Levene's test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Levene {
    pub statistic: f64,
    pub p_value: f64,
}

/// Median-centred Levene test across two or more groups.
///
/// When every observation equals its group median the denominator is zero;
/// the statistic is then infinite (p = 0) if the group medians differ and
/// zero (p = 1) if they do not.
pub fn levene<S: AsRef<[f64]>>(groups: &[S]) -> Result<Levene> {
    let k = groups.len();
    if k < 2 {
        return Err(StatsError::TooFewGroups {
            test: "Levene's test",
            required: 2,
            actual: k,
        });
    }
    if let Some(empty) = groups.iter().find(|group| group.as_ref().is_empty()) {
        return Err(StatsError::TooFewObservations {
            test: "Levene's test",
            required: 1,
            actual: empty.as_ref().len(),
        });
    }

    let deviations: Vec<Vec<f64>> = groups
        .iter()
        .map(|group| {
            let group = group.as_ref();
            let centre = median(group);
            group.iter().map(|value| (value - centre).abs()).collect()
        })
        .collect();

    let total: usize = deviations.iter().map(Vec::len).sum();
    if total <= k {
        return Err(StatsError::TooFewObservations {
            test: "Levene's test",
            required: k + 1,
            actual: total,
        });
    }

    let group_means: Vec<f64> = deviations.iter().map(|group| mean(group)).collect();
    let grand_mean = deviations.iter().flatten().sum::<f64>() / total as f64;

    let between: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(group, group_mean)| group.len() as f64 * (group_mean - grand_mean).powi(2))
        .sum();
    let within: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(group, group_mean)| {
            group
                .iter()
                .map(|value| (value - group_mean).powi(2))
                .sum::<f64>()
        })
        .sum();

    let d1 = (k - 1) as f64;
    let d2 = (total - k) as f64;

    if within == 0.0 {
        return Ok(if between > 0.0 {
            Levene {
                statistic: f64::INFINITY,
                p_value: 0.0,
            }
        } else {
            Levene {
                statistic: 0.0,
                p_value: 1.0,
            }
        });
    }

    let statistic = d2 * between / (d1 * within);
    Ok(Levene {
        statistic,
        p_value: f_sf(statistic, d1, d2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    #[test]
    fn test_three_groups_known_value() {
        let a = [8.88, 9.12, 9.04, 8.98, 9.00, 9.08, 9.01, 8.85, 9.06, 8.99];
        let b = [8.88, 8.95, 9.29, 9.44, 9.15, 9.58, 8.36, 9.18, 8.67, 9.05];
        let c = [8.95, 9.12, 8.95, 8.85, 9.03, 8.84, 9.07, 8.98, 8.86, 8.98];
        let result = levene(&[&a[..], &b[..], &c[..]]).unwrap();

        assert!((result.statistic - 7.584952754501659).abs() < 1e-9);
        assert!((result.p_value - 0.002431505967249681).abs() < 1e-9);
    }

    #[test]
    fn test_two_groups_known_value() {
        let result = levene(&[
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![2.0, 4.0, 6.0, 8.0, 10.0],
        ])
        .unwrap();

        assert!((result.statistic - 2.0571428571428565).abs() < 1e-9);
        assert!((result.p_value - 0.18940366109332116).abs() < 1e-9);
    }

    #[test]
    fn test_equal_spread_is_not_rejected_for_most_seeds() {
        let normal = Normal::new(0.0, 1.0).unwrap();
        let mut rejections = 0;

        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let a: Vec<f64> = (0..40).map(|_| normal.sample(&mut rng)).collect();
            let b: Vec<f64> = (0..40).map(|_| normal.sample(&mut rng) + 3.0).collect();
            if levene(&[a, b]).unwrap().p_value < 0.05 {
                rejections += 1;
            }
        }

        // Nominal rate is 5 in 100.
        assert!(rejections < 15, "rejected {rejections} times");
    }

    #[test]
    fn test_zero_within_variance() {
        let result = levene(&[vec![1.0, 1.0, 1.0], vec![5.0, 5.0, 5.0]]).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);

        // Deviations are 0 in the first group and 1 everywhere in the second.
        let result = levene(&[vec![1.0, 1.0, 1.0], vec![1.0, 3.0]]).unwrap();
        assert!(result.statistic.is_infinite());
        assert_eq!(result.p_value, 0.0);
    }

    #[test]
    fn test_single_group_is_rejected() {
        let result = levene(&[vec![1.0, 2.0, 3.0]]);
        assert!(matches!(result, Err(StatsError::TooFewGroups { actual: 1, .. })));
    }
}
