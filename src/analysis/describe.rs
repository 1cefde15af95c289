//! Column summaries, duplicates and correlations

use crate::error::{CancelError, Result};
use crate::preprocessing::schema::{column_f64, is_text};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column data type for summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Numeric,
    Categorical,
}

/// Summary statistics of one column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: ColumnType,
    pub count: usize,
    pub null_count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
    pub unique_count: Option<usize>,
    /// Most frequent level and its count (categorical only)
    pub top: Option<(String, usize)>,
}

impl ColumnSummary {
    fn new(name: impl Into<String>, dtype: ColumnType) -> Self {
        Self {
            name: name.into(),
            dtype,
            count: 0,
            null_count: 0,
            mean: None,
            std: None,
            min: None,
            q1: None,
            median: None,
            q3: None,
            max: None,
            unique_count: None,
            top: None,
        }
    }

    fn numeric(name: &str, column: &Column) -> Result<Self> {
        let mut summary = Self::new(name, ColumnType::Numeric);
        summary.null_count = column.null_count();
        summary.count = column.len() - summary.null_count;
        if summary.count == 0 {
            return Ok(summary);
        }

        let casted = column.cast(&DataType::Float64)?;
        let ca = casted.as_materialized_series().f64()?;
        summary.mean = ca.mean();
        summary.std = ca.std(1).filter(|s| s.is_finite());
        summary.min = ca.min();
        summary.max = ca.max();
        summary.q1 = ca.quantile(0.25, QuantileMethod::Linear)?;
        summary.median = ca.median();
        summary.q3 = ca.quantile(0.75, QuantileMethod::Linear)?;
        Ok(summary)
    }

    fn categorical(name: &str, column: &Column) -> Result<Self> {
        let mut summary = Self::new(name, ColumnType::Categorical);
        summary.null_count = column.null_count();
        summary.count = column.len() - summary.null_count;

        let nulls_as_level = usize::from(summary.null_count > 0);
        summary.unique_count = Some(column.n_unique()?.saturating_sub(nulls_as_level));
        summary.top = level_counts(column)?.into_iter().next();
        Ok(summary)
    }
}

/// Non-null level counts, most frequent first, ties by level
fn level_counts(column: &Column) -> Result<Vec<(String, usize)>> {
    let series = column.as_materialized_series().cast(&DataType::String)?;
    let counts = series.value_counts(false, false, "count".into(), false)?;

    let levels = counts.column(series.name().as_str())?.as_materialized_series().str()?.clone();
    let totals = counts.column("count")?.cast(&DataType::UInt64)?;
    let totals = totals.as_materialized_series().u64()?;

    let mut out: Vec<(String, usize)> = levels
        .into_iter()
        .zip(totals.into_iter())
        .filter_map(|(level, count)| Some((level?.to_string(), count? as usize)))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(out)
}

/// Per-column summary in frame order
pub fn describe(df: &DataFrame) -> Result<Vec<ColumnSummary>> {
    df.get_columns()
        .iter()
        .map(|column| {
            let name = column.name().to_string();
            if is_text(column) {
                ColumnSummary::categorical(&name, column)
            } else {
                ColumnSummary::numeric(&name, column)
            }
        })
        .collect()
}

/// Text rendering of every value in a column, nulls as `None`
pub fn column_keys(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| CancelError::FeatureNotFound(name.to_string()))?;
    let casted = column.cast(&DataType::String)?;
    let ca = casted.as_materialized_series().str()?;
    Ok(ca.into_iter().map(|v| v.map(|s| s.to_string())).collect())
}

/// Rows identical to an earlier row
pub fn duplicate_rows(df: &DataFrame) -> Result<usize> {
    let distinct = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
    Ok(df.height() - distinct.height())
}

/// Level counts of a column with their share of the rows, most frequent first
pub fn value_counts(df: &DataFrame, name: &str) -> Result<Vec<(String, usize, f64)>> {
    let column = df
        .column(name)
        .map_err(|_| CancelError::FeatureNotFound(name.to_string()))?;
    let total = df.height();
    Ok(level_counts(column)?
        .into_iter()
        .map(|(level, count)| {
            let share = if total > 0 { count as f64 / total as f64 * 100.0 } else { 0.0 };
            (level, count, share)
        })
        .collect())
}

/// Pearson correlations over the numeric columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `values[i][j]` = corr(columns[i], columns[j]); NaN for constant columns
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    let columns: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| !is_text(c))
        .map(|c| c.name().to_string())
        .collect();

    let data: Vec<Vec<f64>> = columns
        .iter()
        .map(|name| column_f64(df, name))
        .collect::<Result<_>>()?;

    let centered: Vec<(Vec<f64>, f64)> = data
        .iter()
        .map(|values| {
            let n = values.len().max(1) as f64;
            let mean = values.iter().sum::<f64>() / n;
            let dev: Vec<f64> = values.iter().map(|v| v - mean).collect();
            let norm = dev.iter().map(|d| d * d).sum::<f64>().sqrt();
            (dev, norm)
        })
        .collect();

    let k = columns.len();
    let mut values = vec![vec![f64::NAN; k]; k];
    for i in 0..k {
        for j in i..k {
            let (di, ni) = &centered[i];
            let (dj, nj) = &centered[j];
            let r = if *ni > 0.0 && *nj > 0.0 {
                let dot: f64 = di.iter().zip(dj.iter()).map(|(a, b)| a * b).sum();
                (dot / (ni * nj)).clamp(-1.0, 1.0)
            } else {
                f64::NAN
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix { columns, values })
}
