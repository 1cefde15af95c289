//! Decision threshold selection
//!
//! Two rules pick a cut-off from a model's training-set probabilities:
//! Youden's J on the ROC curve, and the point where precision and recall meet.

use crate::error::Result;
use crate::metrics::{pr_curve, roc_curve};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default cut-off for hard predictions
pub const DEFAULT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdRule {
    Default,
    Youden,
    PrecisionRecallCrossover,
}

impl fmt::Display for ThresholdRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdRule::Default => write!(f, "default"),
            ThresholdRule::Youden => write!(f, "youden"),
            ThresholdRule::PrecisionRecallCrossover => write!(f, "pr-crossover"),
        }
    }
}

/// A chosen threshold and the criterion value that picked it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdChoice {
    pub rule: ThresholdRule,
    pub threshold: f64,
    /// `tpr - fpr` for Youden, `|precision - recall|` for the crossover
    pub criterion: f64,
}

impl ThresholdChoice {
    pub fn default_cutoff() -> Self {
        Self {
            rule: ThresholdRule::Default,
            threshold: DEFAULT_THRESHOLD,
            criterion: f64::NAN,
        }
    }
}

/// Threshold maximizing `tpr - fpr`; the highest such threshold wins ties
pub fn youden_threshold(scores: &Array1<f64>, labels: &Array1<f64>) -> Result<ThresholdChoice> {
    let roc = roc_curve(scores, labels)?;

    let mut best: Option<(f64, f64)> = None;
    for point in roc.points.iter().filter(|p| p.threshold.is_finite()) {
        let j = point.tpr - point.fpr;
        if best.map_or(true, |(_, b)| j > b) {
            best = Some((point.threshold, j));
        }
    }

    // sweep() guarantees at least one finite point
    let (threshold, criterion) = best.unwrap_or((DEFAULT_THRESHOLD, 0.0));
    Ok(ThresholdChoice {
        rule: ThresholdRule::Youden,
        threshold,
        criterion,
    })
}

/// Threshold minimizing `|precision - recall|`; the smallest such threshold wins ties
pub fn pr_crossover_threshold(scores: &Array1<f64>, labels: &Array1<f64>) -> Result<ThresholdChoice> {
    let pr = pr_curve(scores, labels)?;

    let mut best: Option<(f64, f64)> = None;
    // Points run from the highest threshold down, so `<=` keeps the smallest
    for point in &pr.points {
        let gap = (point.precision - point.recall).abs();
        if best.map_or(true, |(_, b)| gap <= b) {
            best = Some((point.threshold, gap));
        }
    }

    let (threshold, criterion) = best.unwrap_or((DEFAULT_THRESHOLD, 0.0));
    Ok(ThresholdChoice {
        rule: ThresholdRule::PrecisionRecallCrossover,
        threshold,
        criterion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CancelError;
    use ndarray::array;

    #[test]
    fn test_youden_picks_separating_cut() {
        let scores = array![0.1, 0.3, 0.35, 0.6, 0.8, 0.9];
        let labels = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let choice = youden_threshold(&scores, &labels).unwrap();
        assert_eq!(choice.threshold, 0.6);
        assert!((choice.criterion - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_youden_first_maximum() {
        // J = 0.5 at both 0.9 and 0.7
        let scores = array![0.9, 0.8, 0.7, 0.6];
        let labels = array![1.0, 0.0, 1.0, 0.0];
        let choice = youden_threshold(&scores, &labels).unwrap();
        assert_eq!(choice.threshold, 0.9);
        assert!((choice.criterion - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_crossover_balances_precision_and_recall() {
        let scores = array![0.95, 0.85, 0.7, 0.55, 0.45, 0.3, 0.2, 0.1];
        let labels = array![1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0];
        let choice = pr_crossover_threshold(&scores, &labels).unwrap();
        // At 0.45: tp = 3, fp = 2 -> precision 0.6, recall 0.75; at 0.55: 0.75 / 0.75
        assert_eq!(choice.threshold, 0.55);
        assert!(choice.criterion.abs() < 1e-12);
    }

    #[test]
    fn test_crossover_ties_prefer_smaller_threshold() {
        let scores = array![0.9, 0.7, 0.5, 0.3];
        let labels = array![0.0, 1.0, 1.0, 0.0];
        // 0.9: p 0, r 0 -> gap 0; 0.7: p 0.5, r 0.5 -> gap 0; 0.5: p 2/3, r 1
        let choice = pr_crossover_threshold(&scores, &labels).unwrap();
        assert_eq!(choice.threshold, 0.7);
    }

    #[test]
    fn test_degenerate_labels() {
        let scores = array![0.1, 0.9];
        let labels = array![0.0, 0.0];
        assert!(matches!(
            youden_threshold(&scores, &labels),
            Err(CancelError::DegenerateLabels { .. })
        ));
    }
}
