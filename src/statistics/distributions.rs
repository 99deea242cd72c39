//! Tail probabilities of the reference distributions, backed by [`statrs`]

use super::{Result, StatsError};
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, Normal, StudentsT};
use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

/// Upper tail of the standard normal distribution, `P(Z > z)`.
pub fn normal_sf(z: f64) -> f64 {
    0.5 * erfc(z / SQRT_2)
}

/// Two-sided p-value of a standard normal statistic.
pub fn normal_two_sided(z: f64) -> f64 {
    (2.0 * normal_sf(z.abs())).min(1.0)
}

/// Quantile function of the standard normal distribution.
pub fn normal_quantile(p: f64) -> Result<f64> {
    let normal = Normal::new(0.0, 1.0).map_err(|e| StatsError::Distribution(e.to_string()))?;
    Ok(normal.inverse_cdf(p))
}

/// Two-sided p-value of a Student's t statistic with `df` degrees of freedom.
pub fn student_t_two_sided(t: f64, df: f64) -> Result<f64> {
    if t.is_infinite() {
        return Ok(0.0);
    }

    let students_t =
        StudentsT::new(0.0, 1.0, df).map_err(|e| StatsError::Distribution(e.to_string()))?;
    Ok((2.0 * students_t.sf(t.abs())).min(1.0))
}

/// Upper tail of the F distribution with `(d1, d2)` degrees of freedom.
pub fn f_sf(statistic: f64, d1: f64, d2: f64) -> Result<f64> {
    if statistic.is_infinite() {
        return Ok(0.0);
    }

    let f = FisherSnedecor::new(d1, d2).map_err(|e| StatsError::Distribution(e.to_string()))?;
    Ok(f.sf(statistic).clamp(0.0, 1.0))
}

/// Upper tail of the chi-squared distribution with `df` degrees of freedom.
pub fn chi_squared_sf(statistic: f64, df: f64) -> Result<f64> {
    let chi_squared =
        ChiSquared::new(df).map_err(|e| StatsError::Distribution(e.to_string()))?;
    Ok(chi_squared.sf(statistic).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_tails() {
        assert!((normal_sf(0.0) - 0.5).abs() < 1e-12);
        assert!((normal_two_sided(1.959963984540054) - 0.05).abs() < 1e-9);
        assert!((normal_quantile(0.975).unwrap() - 1.959963984540054).abs() < 1e-9);
    }

    #[test]
    fn test_student_t_two_sided() {
        // t(10) critical value at 5%
        let p = student_t_two_sided(2.228138851986274, 10.0).unwrap();
        assert!((p - 0.05).abs() < 1e-6);
        assert_eq!(student_t_two_sided(f64::INFINITY, 10.0).unwrap(), 0.0);
    }

    #[test]
    fn test_f_sf() {
        // F(2, 10) critical value at 5%
        let p = f_sf(4.102821015130399, 2.0, 10.0).unwrap();
        assert!((p - 0.05).abs() < 1e-6);
        assert!(matches!(f_sf(1.0, 0.0, 10.0), Err(StatsError::Distribution(_))));
    }

    #[test]
    fn test_chi_squared_sf_two_degrees_is_exponential() {
        let p = chi_squared_sf(3.0, 2.0).unwrap();
        assert!((p - (-1.5f64).exp()).abs() < 1e-10);
    }
}
