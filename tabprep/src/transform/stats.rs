//! Summary statistics over a numeric column. NaN cells are skipped.

use serde::Serialize;

/// Statistics computed from the non-missing values of a column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Standard deviation with `ddof` delta degrees of freedom
    pub std: f64,
}

impl ColumnStats {
    /// Compute statistics, ignoring NaN.
    ///
    /// With no values every statistic is NaN; `std` is NaN when
    /// `count <= ddof`.
    pub fn compute(values: &[f64], ddof: u8) -> Self {
        let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        let count = present.len();

        if count == 0 {
            return Self {
                count,
                min: f64::NAN,
                max: f64::NAN,
                mean: f64::NAN,
                std: f64::NAN,
            };
        }

        let min = present.iter().copied().fold(f64::INFINITY, f64::min);
        let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = present.iter().sum::<f64>() / count as f64;

        let dof = count as f64 - f64::from(ddof);
        let std = if dof > 0.0 {
            let ss: f64 = present.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / dof).sqrt()
        } else {
            f64::NAN
        };

        Self {
            count,
            min,
            max,
            mean,
            std,
        }
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let stats = ColumnStats::compute(&[1.0, 2.0, 3.0, 4.0, 5.0], 1);
        assert_eq!(stats.count, 5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.mean, 3.0);
        // sample variance = 10 / 4
        assert!((stats.std - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_population_std() {
        let stats = ColumnStats::compute(&[1.0, 2.0, 3.0], 0);
        assert!((stats.std - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_skips_nan() {
        let stats = ColumnStats::compute(&[f64::NAN, 2.0, 4.0], 1);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.range(), 2.0);
    }

    #[test]
    fn test_empty_and_single() {
        let empty = ColumnStats::compute(&[], 1);
        assert!(empty.mean.is_nan());
        assert!(empty.range().is_nan());

        let single = ColumnStats::compute(&[7.0], 1);
        assert_eq!(single.mean, 7.0);
        assert!(single.std.is_nan());
    }
}
