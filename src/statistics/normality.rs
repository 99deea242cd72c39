//! Shapiro-Wilk and Jarque-Bera tests of normality
//!
//! Shapiro-Wilk follows Royston's AS R94 approximation for the coefficients
//! and the p-value, valid for 3 <= n <= 5000.

use super::descriptive::{central_moment, mean, min_max};
use super::distributions::{chi_squared_sf, normal_quantile, normal_sf};
use super::{ensure_min_len, Result, StatsError};
use std::f64::consts::PI;

/// Above this sample size the Shapiro-Wilk p-value may be inaccurate.
pub const SHAPIRO_MAX_ACCURATE_N: usize = 5000;

/// Above this sample size Jarque-Bera is the better choice.
pub const SHAPIRO_PREFERRED_MAX_N: usize = 2000;

const SMALL: f64 = 1e-19;

const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

/// Test statistic with its p-value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalityResult {
    pub statistic: f64,
    pub p_value: f64,
}

/// Evaluates `c[0] + c[1] x + c[2] x^2 + ...`.
fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, coefficient| acc * x + coefficient)
}

/// Shapiro-Wilk W test.
///
/// # Errors
/// * [`StatsError::TooFewObservations`] - fewer than three values
/// * [`StatsError::ConstantInput`] - all values (nearly) identical
pub fn shapiro_wilk(values: &[f64]) -> Result<NormalityResult> {
    ensure_min_len("Shapiro-Wilk test", values, 3)?;
    let n = values.len();

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let range = sorted[n - 1] - sorted[0];
    if range < SMALL {
        return Err(StatsError::ConstantInput("Shapiro-Wilk test"));
    }

    let half = shapiro_coefficients(n)?;
    let mut weights = vec![0.0; n];
    for (i, &a) in half.iter().enumerate() {
        weights[i] = -a;
        weights[n - 1 - i] = a;
    }

    // W is the squared correlation between the ordered sample and the weights.
    let scaled: Vec<f64> = sorted.iter().map(|value| value / range).collect();
    let weight_mean = mean(&weights);
    let value_mean = mean(&scaled);
    let (mut ssa, mut ssx, mut sax) = (0.0, 0.0, 0.0);
    for (weight, value) in weights.iter().zip(&scaled) {
        let dw = weight - weight_mean;
        let dx = value - value_mean;
        ssa += dw * dw;
        ssx += dx * dx;
        sax += dw * dx;
    }
    let w = (sax * sax / (ssa * ssx)).min(1.0);

    Ok(NormalityResult {
        statistic: w,
        p_value: shapiro_p_value(w, n),
    })
}

/// Upper half of the antisymmetric coefficient vector, largest first.
fn shapiro_coefficients(n: usize) -> Result<Vec<f64>> {
    let half_len = n / 2;
    if n == 3 {
        return Ok(vec![0.5f64.sqrt()]);
    }

    let nf = n as f64;
    let m = (1..=half_len)
        .map(|i| normal_quantile((i as f64 - 0.375) / (nf + 0.25)))
        .collect::<Result<Vec<f64>>>()?;
    let summ2 = 2.0 * m.iter().map(|value| value * value).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / nf.sqrt();

    let mut a = vec![0.0; half_len];
    let a1 = poly(&C1, rsn) - m[0] / ssumm2;
    a[0] = a1;

    let (first_scaled, fac) = if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
        a[1] = a2;
        let fac = ((summ2 - 2.0 * m[0].powi(2) - 2.0 * m[1].powi(2))
            / (1.0 - 2.0 * a1.powi(2) - 2.0 * a2.powi(2)))
        .sqrt();
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[0].powi(2)) / (1.0 - 2.0 * a1.powi(2))).sqrt();
        (1, fac)
    };

    for i in first_scaled..half_len {
        a[i] = -m[i] / fac;
    }

    Ok(a)
}

fn shapiro_p_value(w: f64, n: usize) -> f64 {
    if n == 3 {
        let p = 6.0 / PI * (w.sqrt().asin() - PI / 3.0);
        return p.max(0.0);
    }

    let nf = n as f64;
    let mut y = (1.0 - w).ln();
    let (m, s) = if n <= 11 {
        let gamma = poly(&G, nf);
        if y >= gamma {
            return 1e-99;
        }
        y = -(gamma - y).ln();
        (poly(&C3, nf), poly(&C4, nf).exp())
    } else {
        let ln_n = nf.ln();
        (poly(&C5, ln_n), poly(&C6, ln_n).exp())
    };

    normal_sf((y - m) / s)
}

/// Jarque-Bera test based on the sample skewness and kurtosis.
///
/// # Errors
/// * [`StatsError::TooFewObservations`] - fewer than two values
/// * [`StatsError::ConstantInput`] - zero variance
pub fn jarque_bera(values: &[f64]) -> Result<NormalityResult> {
    ensure_min_len("Jarque-Bera test", values, 2)?;
    if min_max(values).is_some_and(|(min, max)| min == max) {
        return Err(StatsError::ConstantInput("Jarque-Bera test"));
    }

    let n = values.len() as f64;
    let m2 = central_moment(values, 2);
    let skewness = central_moment(values, 3) / m2.powf(1.5);
    let kurtosis = central_moment(values, 4) / (m2 * m2);

    let statistic = n / 6.0 * (skewness * skewness + (kurtosis - 3.0).powi(2) / 4.0);
    Ok(NormalityResult {
        statistic,
        p_value: chi_squared_sf(statistic, 2.0)?,
    })
}
