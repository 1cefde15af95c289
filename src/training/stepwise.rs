//! Backward elimination on logit p-values

use crate::error::Result;
use crate::preprocessing::DesignMatrix;
use super::config::SelectionConfig;
use super::logistic::LogitModel;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One eliminated predictor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EliminationStep {
    pub feature: String,
    pub p_value: f64,
    /// Predictors left after this removal
    pub remaining: usize,
}

/// Outcome of backward elimination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSet {
    pub selected: Vec<String>,
    pub eliminated: Vec<EliminationStep>,
    /// Final fit on `selected`; `None` only when every column was eliminated
    pub model: Option<LogitModel>,
}

/// Refit and drop the single least significant predictor until every
/// remaining p-value is at or below `config.significance`.
///
/// The intercept column, when present, is a candidate like any other. Ties on
/// the largest p-value go to the earliest column. Fit failures propagate.
pub fn select_features(x: &DesignMatrix, y: &Array1<f64>, config: &SelectionConfig) -> Result<FeatureSet> {
    let mut columns = x.columns.clone();
    let mut eliminated = Vec::new();

    while !columns.is_empty() {
        let model = LogitModel::fit(&x.select(&columns)?, y, &config.logit)?;
        let p_values = model.p_values();

        let mut worst: Option<(usize, f64)> = None;
        for (i, &p) in p_values.iter().enumerate() {
            if p.is_nan() {
                continue;
            }
            if worst.map_or(true, |(_, w)| p > w) {
                worst = Some((i, p));
            }
        }

        match worst {
            Some((idx, p_value)) if p_value > config.significance => {
                let feature = columns.remove(idx);
                debug!(%feature, p_value, remaining = columns.len(), "Eliminated predictor");
                eliminated.push(EliminationStep {
                    feature,
                    p_value,
                    remaining: columns.len(),
                });
            }
            _ => {
                info!(
                    selected = columns.len(),
                    eliminated = eliminated.len(),
                    "Backward elimination finished"
                );
                return Ok(FeatureSet {
                    selected: columns,
                    eliminated,
                    model: Some(model),
                });
            }
        }
    }

    info!(eliminated = eliminated.len(), "Backward elimination removed every predictor");
    Ok(FeatureSet {
        selected: columns,
        eliminated,
        model: None,
    })
}
