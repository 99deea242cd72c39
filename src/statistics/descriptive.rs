//! Descriptive statistics and histogram binning

/// Arithmetic mean; `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance with one delta degree of freedom, as pandas' `var()`.
///
/// `NaN` for fewer than two observations.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }

    let mean = mean(values);
    let sum_of_squares: f64 = values.iter().map(|value| (value - mean).powi(2)).sum();
    sum_of_squares / (values.len() - 1) as f64
}

/// `k`-th central moment with the biased (population) denominator.
pub fn central_moment(values: &[f64], k: i32) -> f64 {
    let mean = mean(values);
    values.iter().map(|value| (value - mean).powi(k)).sum::<f64>() / values.len() as f64
}

/// Median; `NaN` for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let middle = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[middle - 1] + sorted[middle]) / 2.0
    } else {
        sorted[middle]
    }
}

/// Smallest and largest value, ignoring `NaN`. `None` when nothing remains.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|value| !value.is_nan())
        .fold(None, |range, value| match range {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
}

/// A single histogram bin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Splits the value range into `bins` equal-width bins.
///
/// Every bin is half-open except the last one, which also includes the
/// maximum. A constant sample is spread over `value - 0.5 .. value + 0.5`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let Some((mut min, mut max)) = min_max(values) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|index| HistogramBin {
            start: min + width * index as f64,
            end: if index + 1 == bins {
                max
            } else {
                min + width * (index + 1) as f64
            },
            count: 0,
        })
        .collect();

    for value in values.iter().filter(|value| !value.is_nan()) {
        let index = (((value - min) / width) as usize).min(bins - 1);
        histogram[index].count += 1;
    }

    histogram
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_variance() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), 5.0);
        assert!((variance(&values) - 32.0 / 7.0).abs() < 1e-12);
        assert!(variance(&[1.0]).is_nan());
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn test_central_moment() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert!((central_moment(&values, 2) - 1.25).abs() < 1e-12);
        assert!(central_moment(&values, 3).abs() < 1e-12);
    }

    #[test]
    fn test_min_max_ignores_nan() {
        assert_eq!(min_max(&[f64::NAN, 3.0, -1.0]), Some((-1.0, 3.0)));
        assert_eq!(min_max(&[f64::NAN]), None);
    }

    #[test]
    fn test_histogram_counts_every_value() {
        let values = [0.0, 0.1, 0.5, 0.9, 1.0, 1.0];
        let bins = histogram(&values, 10);

        assert_eq!(bins.len(), 10);
        assert_eq!(bins.iter().map(|bin| bin.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[9].end, 1.0);
        assert_eq!(bins[9].count, 3);
    }

    #[test]
    fn test_histogram_constant_sample() {
        let bins = histogram(&[2.0, 2.0], 10);
        assert_eq!(bins[0].start, 1.5);
        assert_eq!(bins[9].end, 2.5);
        assert_eq!(bins[5].count, 2);
    }
}
