//! Descriptive statistics over the non-missing values of one parameter

use serde::{Deserialize, Serialize};

/// Mean, sample standard deviation and range of a value series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    /// Number of values the statistics were computed over
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (N−1 denominator); exactly 0.0 when all values are equal
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl DescriptiveStats {
    /// Compute statistics over `values`. `None` when the slice is empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let count = values.len();
        if count == 0 {
            return None;
        }

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        // A constant series must not pick up rounding spread from the summed mean
        if min == max {
            return Some(Self { count, mean: min, std: 0.0, min, max });
        }

        let mean = values.iter().sum::<f64>() / count as f64;
        let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        let std = (sum_sq / (count - 1) as f64).sqrt();

        Some(Self { count, mean, std, min, max })
    }
}

/// Values with lost samples removed, order preserved
pub fn present_values(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().copied().collect()
}

/// |x[i] − x[i−1]| for each adjacent pair where both samples are present.
/// A lost sample removes both ranges it would take part in.
pub fn moving_ranges(values: &[Option<f64>]) -> Vec<f64> {
    values
        .windows(2)
        .filter_map(|w| match (w[0], w[1]) {
            (Some(prev), Some(next)) => Some((next - prev).abs()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_basic_statistics() {
        let stats = DescriptiveStats::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.count, 8);
        assert!((stats.mean - 5.0).abs() < EPS);
        // Sample variance 32 / 7
        assert!((stats.std - (32.0f64 / 7.0).sqrt()).abs() < EPS);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
    }

    #[test]
    fn test_single_value_has_zero_std() {
        let stats = DescriptiveStats::from_values(&[3.3]).unwrap();
        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.min, stats.max);
    }

    #[test]
    fn test_empty_is_none() {
        assert_eq!(DescriptiveStats::from_values(&[]), None);
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let values = present_values(&[Some(1.0), None, Some(3.0), None]);
        assert_eq!(values, vec![1.0, 3.0]);
    }

    #[test]
    fn test_constant_series_has_exact_zero_std() {
        for values in [vec![0.1; 3], vec![3.3; 7], vec![-86.94991397326173; 7]] {
            let stats = DescriptiveStats::from_values(&values).unwrap();
            assert_eq!(stats.std, 0.0, "values {:?}", values);
            assert_eq!(stats.mean, values[0]);
        }
    }

    #[test]
    fn test_moving_ranges() {
        assert_eq!(moving_ranges(&[Some(1.0), Some(4.0), Some(2.0), Some(2.0)]), vec![3.0, 2.0, 0.0]);
        assert!(moving_ranges(&[Some(1.0)]).is_empty());
        assert!(moving_ranges(&[]).is_empty());
    }

    #[test]
    fn test_moving_ranges_skip_pairs_touching_a_gap() {
        assert_eq!(moving_ranges(&[Some(1.0), None, Some(10.0), Some(11.0)]), vec![1.0]);
        assert!(moving_ranges(&[Some(1.0), None, Some(2.0)]).is_empty());
    }
}
