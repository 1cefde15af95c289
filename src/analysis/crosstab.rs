//! Predictor-by-outcome contingency tables

use crate::error::{CancelError, Result};
use crate::preprocessing::schema::column_f64;
use super::describe::column_keys;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// One predictor level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosstabRow {
    pub level: String,
    /// Counts per outcome class `[0, 1]`
    pub counts: [usize; 2],
    pub total: usize,
    /// Row-normalized shares per outcome class
    pub proportions: [f64; 2],
}

impl CrosstabRow {
    fn new(level: String, counts: [usize; 2]) -> Self {
        let total = counts[0] + counts[1];
        let proportions = if total > 0 {
            [counts[0] as f64 / total as f64, counts[1] as f64 / total as f64]
        } else {
            [0.0, 0.0]
        };
        Self {
            level,
            counts,
            total,
            proportions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crosstab {
    pub predictor: String,
    pub target: String,
    pub rows: Vec<CrosstabRow>,
    /// Column margins, `level` is "All"
    pub totals: CrosstabRow,
    /// Outcome class with fewer rows overall; rows are sorted by its count
    pub minority_class: usize,
}

impl Crosstab {
    pub fn row(&self, level: &str) -> Option<&CrosstabRow> {
        self.rows.iter().find(|r| r.level == level)
    }
}

fn compare_levels(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

/// Count outcomes per predictor level. The target must already be encoded
/// to 0/1. Rows with a null predictor are skipped.
pub fn crosstab(df: &DataFrame, predictor: &str, target: &str) -> Result<Crosstab> {
    let levels = column_keys(df, predictor)?;
    let outcome = column_f64(df, target)?;

    let mut counts: HashMap<String, [usize; 2]> = HashMap::new();
    for (level, &y) in levels.into_iter().zip(outcome.iter()) {
        let class = if y == 0.0 {
            0
        } else if y == 1.0 {
            1
        } else {
            return Err(CancelError::DataError(format!(
                "column '{}' holds {} where 0 or 1 was expected",
                target, y
            )));
        };
        if let Some(level) = level {
            counts.entry(level).or_insert([0, 0])[class] += 1;
        }
    }

    let mut rows: Vec<CrosstabRow> = counts
        .into_iter()
        .map(|(level, c)| CrosstabRow::new(level, c))
        .collect();
    rows.sort_by(|a, b| compare_levels(&a.level, &b.level));

    let class_totals = rows.iter().fold([0usize, 0usize], |acc, r| {
        [acc[0] + r.counts[0], acc[1] + r.counts[1]]
    });
    let minority_class = if class_totals[0] < class_totals[1] { 0 } else { 1 };
    rows.sort_by(|a, b| b.counts[minority_class].cmp(&a.counts[minority_class]));

    Ok(Crosstab {
        predictor: predictor.to_string(),
        target: target.to_string(),
        rows,
        totals: CrosstabRow::new("All".to_string(), class_totals),
        minority_class,
    })
}
