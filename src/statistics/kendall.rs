//! Kendall's tau-b rank correlation
//!
//! The p-value uses the exact null distribution of the number of discordant
//! pairs when neither variable has ties and the sample is small (n <= 33),
//! and the tie-corrected normal approximation otherwise.

use super::distributions::normal_two_sided;
use super::ranks::tie_sizes;
use super::{ensure_same_length, Result, StatsError};

/// Largest sample for which the exact distribution is used.
const EXACT_MAX_N: usize = 33;

/// Kendall's tau-b with its two-sided p-value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KendallTau {
    pub tau: f64,
    pub p_value: f64,
}

/// Tie statistics of one variable
struct Ties {
    /// Number of tied pairs
    pairs: f64,
    /// Sum of t(t-1)(t-2) over tie groups
    v0: f64,
    /// Sum of t(t-1)(2t+5) over tie groups
    v1: f64,
}

impl Ties {
    fn of(values: &[f64]) -> Self {
        let mut ties = Ties {
            pairs: 0.0,
            v0: 0.0,
            v1: 0.0,
        };
        for t in tie_sizes(values).into_iter().filter(|&t| t > 1) {
            let t = t as f64;
            ties.pairs += t * (t - 1.0) / 2.0;
            ties.v0 += t * (t - 1.0) * (t - 2.0);
            ties.v1 += t * (t - 1.0) * (2.0 * t + 5.0);
        }
        ties
    }
}

/// Computes Kendall's tau-b between two equally long samples.
///
/// # Errors
/// * [`StatsError::LengthMismatch`] - samples differ in length
/// * [`StatsError::TooFewObservations`] - fewer than two observations
/// * [`StatsError::ConstantInput`] - either sample has a single distinct value
pub fn kendall_tau(x: &[f64], y: &[f64]) -> Result<KendallTau> {
    ensure_same_length(x, y)?;
    let n = x.len();
    if n < 2 {
        return Err(StatsError::TooFewObservations {
            test: "Kendall's tau",
            required: 2,
            actual: n,
        });
    }

    let mut concordant = 0.0;
    let mut discordant = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            // Pairs tied in either variable are neither concordant nor discordant.
            if x[i] == x[j] || y[i] == y[j] {
                continue;
            }
            if (x[i] - x[j]) * (y[i] - y[j]) > 0.0 {
                concordant += 1.0;
            } else {
                discordant += 1.0;
            }
        }
    }

    let total = (n * (n - 1) / 2) as f64;
    let x_ties = Ties::of(x);
    let y_ties = Ties::of(y);

    if x_ties.pairs == total || y_ties.pairs == total {
        return Err(StatsError::ConstantInput("Kendall's tau"));
    }

    let tau = ((concordant - discordant)
        / ((total - x_ties.pairs) * (total - y_ties.pairs)).sqrt())
    .clamp(-1.0, 1.0);

    let no_ties = x_ties.pairs == 0.0 && y_ties.pairs == 0.0;
    let c = discordant.min(total - discordant);
    let p_value = if no_ties && (n <= EXACT_MAX_N || c <= 1.0) {
        exact_p_value(n, c as usize)
    } else {
        let m = (n * (n - 1)) as f64;
        let nf = n as f64;
        let variance = (m * (2.0 * nf + 5.0) - x_ties.v1 - y_ties.v1) / 18.0
            + (2.0 * x_ties.pairs * y_ties.pairs) / m
            + x_ties.v0 * y_ties.v0 / (9.0 * m * (nf - 2.0));
        normal_two_sided((concordant - discordant) / variance.sqrt())
    };

    Ok(KendallTau { tau, p_value })
}

/// Two-sided exact p-value for `c = min(discordant, total - discordant)`.
///
/// Counts permutations of `n` elements with at most `c` inversions (Mahonian
/// numbers) by repeatedly multiplying by `1 + q + ... + q^(j-1)`.
fn exact_p_value(n: usize, c: usize) -> f64 {
    if n <= 2 {
        return 1.0;
    }
    if 4 * c == n * (n - 1) {
        return 1.0;
    }

    let factorial = |k: usize| (1..=k).map(|i| i as f64).product::<f64>();
    let p_value = match c {
        0 => 2.0 / factorial(n),
        1 => 2.0 / factorial(n - 1),
        _ => {
            let mut counts = vec![0.0; c + 1];
            counts[0] = 1.0;
            counts[1] = 1.0;
            for j in 3..=n {
                for k in 1..=c {
                    counts[k] += counts[k - 1];
                }
                if j <= c {
                    let previous = counts.clone();
                    for k in j..=c {
                        counts[k] -= previous[k - j];
                    }
                }
            }
            2.0 * counts.iter().sum::<f64>() / factorial(n)
        }
    };

    p_value.min(1.0)
}
