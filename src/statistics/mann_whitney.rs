//! Mann-Whitney U rank-sum test for two independent samples

use super::distributions::normal_sf;
use super::ranks::{average_ranks, tie_sizes};
use super::{ensure_min_len, Result};

/// Exact p-values are used when either sample is at most this large and no ties exist.
const EXACT_MAX_SMALLER_SAMPLE: usize = 8;

/// How the p-value was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MannWhitneyMethod {
    Exact,
    Asymptotic,
}

/// Result of a two-sided Mann-Whitney U test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MannWhitney {
    /// U statistic of the first sample
    pub statistic: f64,
    pub p_value: f64,
    pub method: MannWhitneyMethod,
}

/// Two-sided Mann-Whitney U test of `x` against `y`.
///
/// The exact null distribution is used for small samples without ties;
/// otherwise the tie-corrected normal approximation with continuity
/// correction.
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> Result<MannWhitney> {
    ensure_min_len("Mann-Whitney U test", x, 1)?;
    ensure_min_len("Mann-Whitney U test", y, 1)?;

    let n1 = x.len();
    let n2 = y.len();
    let combined: Vec<f64> = x.iter().chain(y).copied().collect();
    let ranks = average_ranks(&combined);

    let rank_sum: f64 = ranks[..n1].iter().sum();
    let u1 = rank_sum - (n1 * (n1 + 1)) as f64 / 2.0;
    let u2 = (n1 * n2) as f64 - u1;
    let u = u1.max(u2);

    let ties = tie_sizes(&combined);
    let has_ties = ties.iter().any(|&t| t > 1);

    if n1.min(n2) <= EXACT_MAX_SMALLER_SAMPLE && !has_ties {
        return Ok(MannWhitney {
            statistic: u1,
            p_value: exact_p_value(n1, n2, u),
            method: MannWhitneyMethod::Exact,
        });
    }

    let n = (n1 + n2) as f64;
    let tie_term: f64 = ties
        .iter()
        .map(|&t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum();
    let s = ((n1 * n2) as f64 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)))).sqrt();

    let p_value = if s > 0.0 {
        let z = (u - (n1 * n2) as f64 / 2.0 - 0.5) / s;
        (2.0 * normal_sf(z)).clamp(0.0, 1.0)
    } else {
        1.0
    };

    Ok(MannWhitney {
        statistic: u1,
        p_value,
        method: MannWhitneyMethod::Asymptotic,
    })
}

/// `2 * P(U >= u)` under the null hypothesis, clipped to 1.
///
/// The counts of each U value are the coefficients of the Gaussian binomial
/// `[n1 + n2 choose m]_q`, built up one factor `(1 - q^(n + i)) / (1 - q^i)` at a time.
fn exact_p_value(n1: usize, n2: usize, u: f64) -> f64 {
    let m = n1.min(n2);
    let n = n1.max(n2);
    let max_u = m * n;

    let mut counts = vec![0.0; max_u + 1];
    counts[0] = 1.0;
    for i in 1..=m {
        let shift = n + i;
        for k in (shift..=max_u).rev() {
            counts[k] -= counts[k - shift];
        }
        for k in i..=max_u {
            counts[k] += counts[k - i];
        }
    }

    let total: f64 = counts.iter().sum();
    let start = (u.round() as usize).min(max_u);
    let tail: f64 = counts[start..].iter().sum();
    (2.0 * tail / total).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::StatsError;

    #[test]
    fn test_completely_separated_groups() {
        let result = mann_whitney_u(&[1.0, 2.0, 3.0, 4.0], &[5.0, 6.0, 7.0, 8.0]).unwrap();

        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.method, MannWhitneyMethod::Exact);
        // 2 / C(8, 4)
        assert!((result.p_value - 2.0 / 70.0).abs() < 1e-12);
    }

    #[test]
    fn test_interleaved_groups_exact() {
        let x = [1.0, 3.0, 5.0, 7.0, 9.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0, 11.0];
        let result = mann_whitney_u(&x, &y).unwrap();

        assert_eq!(result.statistic, 10.0);
        assert_eq!(result.method, MannWhitneyMethod::Exact);
        assert!((result.p_value - 0.42857142857142855).abs() < 1e-12);
    }

    #[test]
    fn test_ties_use_normal_approximation() {
        let x = [1.0, 2.0, 2.0, 3.0, 4.0];
        let y = [2.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let result = mann_whitney_u(&x, &y).unwrap();

        assert_eq!(result.statistic, 3.0);
        assert_eq!(result.method, MannWhitneyMethod::Asymptotic);
        assert!((result.p_value - 0.034094293192590476).abs() < 1e-9);
    }

    #[test]
    fn test_large_samples_use_normal_approximation() {
        let x: Vec<f64> = (1..=10).map(f64::from).collect();
        let y: Vec<f64> = (4..=13).map(|v| f64::from(v) + 0.5).collect();
        let result = mann_whitney_u(&x, &y).unwrap();

        assert_eq!(result.statistic, 21.0);
        assert_eq!(result.method, MannWhitneyMethod::Asymptotic);
        assert!((result.p_value - 0.031209012771740242).abs() < 1e-9);
    }

    #[test]
    fn test_identical_values_give_p_of_one() {
        let result = mann_whitney_u(&[3.0; 9], &[3.0; 9]).unwrap();
        assert_eq!(result.statistic, 40.5);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn test_empty_sample_is_rejected() {
        let result = mann_whitney_u(&[], &[1.0, 2.0]);
        assert!(matches!(
            result,
            Err(StatsError::TooFewObservations { actual: 0, .. })
        ));
    }
}
