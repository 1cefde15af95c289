//! IQR whisker bounds and capping
//!
//! Bounds follow the box-plot convention: `Q1 - k*IQR` and `Q3 + k*IQR`,
//! with quartiles from linear interpolation between order statistics.

use crate::error::{CancelError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Fitted whisker bounds for a column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WhiskerBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl WhiskerBounds {
    /// Compute bounds over the non-null values of a column
    pub fn fit(ca: &Float64Chunked, factor: f64) -> Result<Self> {
        let q1 = ca.quantile(0.25, QuantileMethod::Linear)?;
        let q3 = ca.quantile(0.75, QuantileMethod::Linear)?;
        let (Some(q1), Some(q3)) = (q1, q3) else {
            return Err(CancelError::DataError(format!(
                "cannot compute quartiles of empty column '{}'",
                ca.name()
            )));
        };
        let iqr = q3 - q1;

        Ok(Self {
            q1,
            q3,
            lower: q1 - factor * iqr,
            upper: q3 + factor * iqr,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Replace values with the upper whisker.
    ///
    /// With a sentinel, only values at or above it are replaced; without one,
    /// every value above the whisker is.
    pub fn cap_upper(&self, values: &[f64], sentinel: Option<f64>) -> (Vec<f64>, usize) {
        let mut replaced = 0usize;
        let capped = values
            .iter()
            .map(|&v| {
                let hit = match sentinel {
                    Some(ceiling) => v >= ceiling,
                    None => v > self.upper,
                };
                if hit {
                    replaced += 1;
                    self.upper
                } else {
                    v
                }
            })
            .collect();
        (capped, replaced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunked(values: &[f64]) -> Float64Chunked {
        Float64Chunked::from_slice("price".into(), values)
    }

    #[test]
    fn test_bounds_computation() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let bounds = WhiskerBounds::fit(&chunked(&values), 1.5).unwrap();
        assert_eq!(bounds.q1, 2.0);
        assert_eq!(bounds.q3, 4.0);
        assert_eq!(bounds.upper, 7.0);
        assert_eq!(bounds.lower, -1.0);
    }

    #[test]
    fn test_sentinel_capping_only_touches_ceiling() {
        let values = [10.0, 20.0, 30.0, 40.0, 90.0, 600.0];
        let bounds = WhiskerBounds::fit(&chunked(&values), 1.5).unwrap();
        let (capped, replaced) = bounds.cap_upper(&values, Some(500.0));
        assert_eq!(replaced, 1);
        assert_eq!(capped[4], 90.0);
        assert_eq!(capped[5], bounds.upper);
    }

    #[test]
    fn test_strict_capping_respects_whisker() {
        let values = [10.0, 20.0, 30.0, 40.0, 90.0, 600.0];
        let bounds = WhiskerBounds::fit(&chunked(&values), 1.5).unwrap();
        let (capped, _) = bounds.cap_upper(&values, None);
        assert!(capped.iter().all(|&v| v <= bounds.upper));
    }

    #[test]
    fn test_quartiles_interpolate_linearly() {
        let bounds = WhiskerBounds::fit(&chunked(&[1.0, 2.0, 3.0, 4.0]), 1.5).unwrap();
        assert!((bounds.q1 - 1.75).abs() < 1e-12);
        assert!((bounds.q3 - 3.25).abs() < 1e-12);
        assert!((bounds.iqr() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_nulls_are_ignored() {
        let ca = Float64Chunked::new("price".into(), &[Some(1.0), None, Some(2.0), Some(3.0), Some(4.0), Some(5.0)]);
        let bounds = WhiskerBounds::fit(&ca, 1.5).unwrap();
        assert_eq!(bounds.q1, 2.0);
        assert_eq!(bounds.q3, 4.0);
    }

    #[test]
    fn test_empty_column_errors() {
        assert!(matches!(
            WhiskerBounds::fit(&chunked(&[]), 1.5),
            Err(CancelError::DataError(_))
        ));
    }
}
