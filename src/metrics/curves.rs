//! ROC and precision-recall curves

use crate::error::{CancelError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// A single point on the ROC curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    /// Scores at or above this are predicted positive
    pub threshold: f64,
    pub fpr: f64,
    pub tpr: f64,
}

/// ROC curve with trapezoidal AUC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    /// From (0, 0) at an infinite threshold to (1, 1), thresholds descending
    pub points: Vec<RocPoint>,
    pub auc: f64,
}

/// A single point on the precision-recall curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrPoint {
    pub threshold: f64,
    pub precision: f64,
    pub recall: f64,
}

/// Precision-recall curve, thresholds descending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrCurve {
    pub points: Vec<PrPoint>,
    pub auc: f64,
}

/// Cumulative (fp, tp) counts at each distinct score, highest score first
fn sweep(scores: &Array1<f64>, labels: &Array1<f64>, context: &str) -> Result<(Vec<(f64, usize, usize)>, usize, usize)> {
    if scores.len() != labels.len() {
        return Err(CancelError::ShapeError {
            expected: format!("{} scores", labels.len()),
            actual: format!("{} scores", scores.len()),
        });
    }
    if scores.iter().any(|s| s.is_nan()) {
        return Err(CancelError::DataError("scores contain NaN".to_string()));
    }

    let positive: Vec<bool> = labels.iter().map(|&l| l >= 0.5).collect();
    let total_pos = positive.iter().filter(|&&p| p).count();
    let total_neg = positive.len() - total_pos;
    if total_pos == 0 {
        return Err(CancelError::DegenerateLabels { class: 0, context: context.to_string() });
    }
    if total_neg == 0 {
        return Err(CancelError::DegenerateLabels { class: 1, context: context.to_string() });
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut steps = Vec::new();
    let (mut tp, mut fp) = (0usize, 0usize);
    let mut i = 0;
    while i < order.len() {
        let current = scores[order[i]];
        while i < order.len() && scores[order[i]] == current {
            if positive[order[i]] {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        steps.push((current, fp, tp));
    }
    Ok((steps, total_pos, total_neg))
}

pub fn roc_curve(scores: &Array1<f64>, labels: &Array1<f64>) -> Result<RocCurve> {
    let (steps, total_pos, total_neg) = sweep(scores, labels, "ROC curve")?;
    let (p, n) = (total_pos as f64, total_neg as f64);

    let mut points = Vec::with_capacity(steps.len() + 1);
    points.push(RocPoint { threshold: f64::INFINITY, fpr: 0.0, tpr: 0.0 });
    points.extend(steps.into_iter().map(|(threshold, fp, tp)| RocPoint {
        threshold,
        fpr: fp as f64 / n,
        tpr: tp as f64 / p,
    }));

    let auc = trapezoidal_auc(
        &points.iter().map(|p| p.fpr).collect::<Vec<_>>(),
        &points.iter().map(|p| p.tpr).collect::<Vec<_>>(),
    );
    Ok(RocCurve { points, auc })
}

pub fn pr_curve(scores: &Array1<f64>, labels: &Array1<f64>) -> Result<PrCurve> {
    let (steps, total_pos, _) = sweep(scores, labels, "precision-recall curve")?;
    let p = total_pos as f64;

    let points: Vec<PrPoint> = steps
        .into_iter()
        .map(|(threshold, fp, tp)| PrPoint {
            threshold,
            precision: tp as f64 / (tp + fp) as f64,
            recall: tp as f64 / p,
        })
        .collect();

    // Anchor at (recall 0, precision 1) for the area
    let mut recall = vec![0.0];
    let mut precision = vec![1.0];
    recall.extend(points.iter().map(|p| p.recall));
    precision.extend(points.iter().map(|p| p.precision));
    let auc = trapezoidal_auc(&recall, &precision);

    Ok(PrCurve { points, auc })
}

pub fn roc_auc(scores: &Array1<f64>, labels: &Array1<f64>) -> Result<f64> {
    Ok(roc_curve(scores, labels)?.auc)
}

fn trapezoidal_auc(x: &[f64], y: &[f64]) -> f64 {
    let mut auc = 0.0;
    for i in 1..x.len() {
        auc += (x[i] - x[i - 1]).abs() * (y[i] + y[i - 1]) / 2.0;
    }
    auc
}
