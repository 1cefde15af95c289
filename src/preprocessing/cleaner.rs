//! Booking data cleaning

use crate::error::{CancelError, Result};
use super::config::{CategoryRemapConfig, CleaningConfig, PriceCapConfig};
use super::outlier::WhiskerBounds;
use super::schema::{column_f64, require_columns};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What a cleaning pass changed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub rows: usize,
    pub dropped_columns: Vec<String>,
    pub remapped_values: usize,
    pub price_bounds: Option<WhiskerBounds>,
    pub capped_values: usize,
    pub positive_rate: f64,
}

/// Turns a raw booking extract into a modeling-ready frame
#[derive(Debug, Clone)]
pub struct DataPreparer {
    config: CleaningConfig,
}

impl Default for DataPreparer {
    fn default() -> Self {
        Self::new(CleaningConfig::default())
    }
}

impl DataPreparer {
    pub fn new(config: CleaningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Clean a frame, returning the new frame and a summary of the edits
    pub fn prepare(&self, df: &DataFrame) -> Result<(DataFrame, CleaningSummary)> {
        let mut required: Vec<&str> = vec![self.config.target_column.as_str()];
        if let Some(remap) = &self.config.category_remap {
            required.push(remap.column.as_str());
        }
        if let Some(cap) = &self.config.price_cap {
            required.push(cap.column.as_str());
        }
        require_columns(df, &required)?;

        let mut summary = CleaningSummary {
            rows: df.height(),
            ..Default::default()
        };

        let mut result = if df.column(&self.config.id_column).is_ok() {
            summary.dropped_columns.push(self.config.id_column.clone());
            df.drop(&self.config.id_column)?
        } else {
            df.clone()
        };

        if let Some(remap) = &self.config.category_remap {
            summary.remapped_values = remap_categories(&mut result, remap)?;
            debug!(column = %remap.column, remapped = summary.remapped_values, "Remapped rare categories");
        }

        if let Some(cap) = &self.config.price_cap {
            let (bounds, capped) = cap_column(&mut result, cap)?;
            debug!(
                column = %cap.column,
                upper = bounds.upper,
                capped,
                "Capped values at upper whisker"
            );
            summary.price_bounds = Some(bounds);
            summary.capped_values = capped;
        }

        let labels = encode_outcome(
            &result,
            &self.config.target_column,
            &self.config.positive_label,
            &self.config.negative_label,
        )?;
        summary.positive_rate = if labels.is_empty() {
            0.0
        } else {
            labels.iter().filter(|&&v| v == 1).count() as f64 / labels.len() as f64
        };
        let column: Column = Series::new(self.config.target_column.as_str().into(), labels).into();
        result.with_column(column)?;

        info!(
            rows = summary.rows,
            positive_rate = summary.positive_rate,
            "Cleaned booking data"
        );
        Ok((result, summary))
    }
}

/// Move out-of-set codes to the nearest valid code (ties go to the smaller code)
pub fn nearest_valid(value: i64, valid: &[i64]) -> i64 {
    valid
        .iter()
        .copied()
        .min_by_key(|v| ((v - value).abs(), *v))
        .unwrap_or(value)
}

fn remap_categories(df: &mut DataFrame, remap: &CategoryRemapConfig) -> Result<usize> {
    if remap.valid.is_empty() {
        return Err(CancelError::InvalidParameter {
            name: "category_remap.valid".to_string(),
            value: "[]".to_string(),
            reason: "at least one valid code is required".to_string(),
        });
    }

    let column = df
        .column(&remap.column)
        .map_err(|_| CancelError::FeatureNotFound(remap.column.clone()))?;
    let casted = column.cast(&DataType::Int64)?;

    let mut remapped = 0usize;
    let values: Vec<Option<i64>> = casted
        .as_materialized_series()
        .i64()?
        .into_iter()
        .map(|v| {
            v.map(|code| {
                if remap.valid.contains(&code) {
                    code
                } else {
                    remapped += 1;
                    nearest_valid(code, &remap.valid)
                }
            })
        })
        .collect();

    let column: Column = Series::new(remap.column.as_str().into(), values).into();
    df.with_column(column)?;
    Ok(remapped)
}

fn cap_column(df: &mut DataFrame, cap: &PriceCapConfig) -> Result<(WhiskerBounds, usize)> {
    let casted = df
        .column(&cap.column)
        .map_err(|_| CancelError::FeatureNotFound(cap.column.clone()))?
        .cast(&DataType::Float64)?;
    let bounds = WhiskerBounds::fit(casted.as_materialized_series().f64()?, cap.iqr_factor)?;
    let values = column_f64(df, &cap.column)?;
    let (capped, replaced) = bounds.cap_upper(&values, cap.sentinel);

    let column: Column = Series::new(cap.column.as_str().into(), capped).into();
    df.with_column(column)?;
    Ok((bounds, replaced))
}

/// Map outcome labels to 0/1; numeric 0/1 columns pass through
pub fn encode_outcome(
    df: &DataFrame,
    target: &str,
    positive: &str,
    negative: &str,
) -> Result<Vec<i32>> {
    let column = df
        .column(target)
        .map_err(|_| CancelError::FeatureNotFound(target.to_string()))?;

    if matches!(column.dtype(), DataType::String) {
        let ca = column.as_materialized_series().str()?;
        ca.into_iter()
            .enumerate()
            .map(|(row, v)| match v {
                Some(label) if label == positive => Ok(1),
                Some(label) if label == negative => Ok(0),
                Some(label) => Err(CancelError::DataError(format!(
                    "unexpected label '{}' in '{}' at row {}",
                    label, target, row
                ))),
                None => Err(CancelError::DataError(format!(
                    "null label in '{}' at row {}",
                    target, row
                ))),
            })
            .collect()
    } else {
        column_f64(df, target)?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                if v == 1.0 {
                    Ok(1)
                } else if v == 0.0 {
                    Ok(0)
                } else {
                    Err(CancelError::DataError(format!(
                        "target '{}' must be 0/1, found {} at row {}",
                        target, v, row
                    )))
                }
            })
            .collect()
    }
}
