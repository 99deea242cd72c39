//! Pearson product-moment and Spearman rank correlation

use super::distributions::student_t_two_sided;
use super::ranks::average_ranks;
use super::{ensure_min_len, ensure_same_length, Result, StatsError};

/// Correlation coefficient with its two-sided p-value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correlation {
    pub coefficient: f64,
    pub p_value: f64,
}

/// Pearson's r between two equally long samples.
///
/// Returns [`StatsError::ConstantInput`] when either sample has zero variance.
pub fn pearson_r(x: &[f64], y: &[f64]) -> Result<f64> {
    ensure_same_length(x, y)?;
    ensure_min_len("Pearson correlation", x, 2)?;

    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let (mut ss_x, mut ss_y, mut ss_xy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        ss_x += dx * dx;
        ss_y += dy * dy;
        ss_xy += dx * dy;
    }

    if ss_x == 0.0 || ss_y == 0.0 {
        return Err(StatsError::ConstantInput("Pearson correlation"));
    }

    Ok((ss_xy / (ss_x * ss_y).sqrt()).clamp(-1.0, 1.0))
}

/// Pearson's r with the p-value of the t test for zero correlation.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<Correlation> {
    let r = pearson_r(x, y)?;
    let p_value = correlation_p_value(r, x.len())?;

    Ok(Correlation {
        coefficient: r,
        p_value,
    })
}

/// Symmetric matrix of pairwise Pearson coefficients; the diagonal is 1.
pub fn correlation_matrix(columns: &[&[f64]]) -> Result<Vec<Vec<f64>>> {
    let mut matrix = vec![vec![1.0; columns.len()]; columns.len()];

    for i in 0..columns.len() {
        for j in (i + 1)..columns.len() {
            let r = pearson_r(columns[i], columns[j])?;
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    Ok(matrix)
}

/// Spearman's rho: Pearson's r computed on average ranks.
pub fn spearman(x: &[f64], y: &[f64]) -> Result<Correlation> {
    ensure_same_length(x, y)?;
    let rho = pearson_r(&average_ranks(x), &average_ranks(y)).map_err(|error| match error {
        StatsError::ConstantInput(_) => StatsError::ConstantInput("Spearman correlation"),
        other => other,
    })?;
    let p_value = correlation_p_value(rho, x.len())?;

    Ok(Correlation {
        coefficient: rho,
        p_value,
    })
}

/// Two-sided p-value of `t = r * sqrt((n - 2) / (1 - r^2))` with `n - 2` degrees of freedom.
fn correlation_p_value(r: f64, n: usize) -> Result<f64> {
    if n < 3 {
        return Ok(1.0);
    }
    if r.abs() == 1.0 {
        return Ok(0.0);
    }

    let df = (n - 2) as f64;
    let t = r * (df / ((1.0 - r) * (1.0 + r))).sqrt();
    student_t_two_sided(t, df)
}
