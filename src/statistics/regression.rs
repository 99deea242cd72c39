//! Ordinary least-squares fit of one variable on another

use super::distributions::student_t_two_sided;
use super::{ensure_min_len, ensure_same_length, Result, StatsError};

/// Keeps the t statistic finite when `r` is exactly +/-1.
const TINY: f64 = 1e-20;

/// Result of a simple linear regression `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRegression {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation between `x` and `y`
    pub r_value: f64,
    /// Two-sided p-value for a zero slope
    pub p_value: f64,
    /// Standard error of the slope
    pub std_err: f64,
}

impl LinearRegression {
    /// Value of the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits `y` on `x` by least squares.
///
/// # Errors
/// * [`StatsError::LengthMismatch`] - `x` and `y` differ in length
/// * [`StatsError::TooFewObservations`] - fewer than two points
/// * [`StatsError::ConstantInput`] - every `x` is identical
pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<LinearRegression> {
    ensure_same_length(x, y)?;
    ensure_min_len("Linear regression", x, 2)?;

    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let mut ss_x = 0.0;
    let mut ss_y = 0.0;
    let mut ss_xy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        ss_x += dx * dx;
        ss_y += dy * dy;
        ss_xy += dx * dy;
    }
    ss_x /= n;
    ss_y /= n;
    ss_xy /= n;

    if ss_x == 0.0 {
        return Err(StatsError::ConstantInput("Linear regression"));
    }

    let r_value = if ss_y == 0.0 {
        0.0
    } else {
        (ss_xy / (ss_x * ss_y).sqrt()).clamp(-1.0, 1.0)
    };

    let slope = ss_xy / ss_x;
    let intercept = y_mean - slope * x_mean;

    let (p_value, std_err) = if x.len() == 2 {
        // A line through two points is a perfect fit.
        let p_value = if y[0] == y[1] { 1.0 } else { 0.0 };
        (p_value, 0.0)
    } else {
        let df = n - 2.0;
        let t = r_value * (df / ((1.0 - r_value + TINY) * (1.0 + r_value + TINY))).sqrt();
        let p_value = student_t_two_sided(t, df)?;
        let std_err = ((1.0 - r_value * r_value) * ss_y / ss_x / df).sqrt();
        (p_value, std_err)
    };

    Ok(LinearRegression {
        slope,
        intercept,
        r_value,
        p_value,
        std_err,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_line() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [3.0, 5.0, 7.0, 9.0];
        let fit = linear_regression(&x, &y).unwrap();

        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.r_value - 1.0).abs() < 1e-12);
        assert!(fit.p_value < 1e-6);
        assert!(fit.std_err.abs() < 1e-6);
        assert!((fit.predict(10.0) - 21.0).abs() < 1e-12);
    }

    #[test]
    fn test_noisy_line() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let fit = linear_regression(&x, &y).unwrap();

        assert!((fit.slope - 0.6).abs() < 1e-12);
        assert!((fit.intercept - 2.2).abs() < 1e-12);
        assert!((fit.r_value - 0.7745966692414834).abs() < 1e-12);
        assert!((fit.p_value - 0.1240270766).abs() < 1e-6);
    }

    #[test]
    fn test_constant_x_is_rejected() {
        let result = linear_regression(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]);
        assert_eq!(result, Err(StatsError::ConstantInput("Linear regression")));
    }

    #[test]
    fn test_mismatched_lengths_are_rejected() {
        let result = linear_regression(&[1.0, 2.0], &[1.0]);
        assert!(matches!(result, Err(StatsError::LengthMismatch { .. })));
    }
}
