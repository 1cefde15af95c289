//! Binary classification metrics

use crate::error::{CancelError, Result};
use crate::preprocessing::DesignMatrix;
use crate::training::Classifier;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// 2x2 confusion matrix, rows = actual, columns = predicted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
    pub tp: usize,
}

impl ConfusionMatrix {
    /// Count outcomes from 0/1 vectors
    pub fn from_predictions(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(CancelError::ShapeError {
                expected: format!("{} predictions", y_true.len()),
                actual: format!("{} predictions", y_pred.len()),
            });
        }

        let mut cm = Self::default();
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            match (t >= 0.5, p >= 0.5) {
                (true, true) => cm.tp += 1,
                (false, true) => cm.fp += 1,
                (false, false) => cm.tn += 1,
                (true, false) => cm.fn_ += 1,
            }
        }
        Ok(cm)
    }

    pub fn total(&self) -> usize {
        self.tn + self.fp + self.fn_ + self.tp
    }

    /// `[[tn, fp], [fn, tp]]`
    pub fn counts(&self) -> [[usize; 2]; 2] {
        [[self.tn, self.fp], [self.fn_, self.tp]]
    }

    /// Each cell as a percentage of all samples
    pub fn overall_pct(&self) -> [[f64; 2]; 2] {
        let total = self.total();
        self.counts().map(|row| row.map(|c| pct(c, total)))
    }

    /// Each cell as a percentage of its actual-class row
    pub fn row_pct(&self) -> [[f64; 2]; 2] {
        self.counts().map(|row| {
            let total = row[0] + row[1];
            row.map(|c| pct(c, total))
        })
    }

    /// Each cell as a percentage of its predicted-class column
    pub fn column_pct(&self) -> [[f64; 2]; 2] {
        let c = self.counts();
        let cols = [c[0][0] + c[1][0], c[0][1] + c[1][1]];
        [
            [pct(c[0][0], cols[0]), pct(c[0][1], cols[1])],
            [pct(c[1][0], cols[0]), pct(c[1][1], cols[1])],
        ]
    }
}

fn pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Scores of one (model, partition, threshold) evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub threshold: f64,
    pub confusion: ConfusionMatrix,
}

impl ClassificationMetrics {
    /// Zero-denominator precision, recall and F1 are reported as 0
    pub fn from_confusion(confusion: ConfusionMatrix, threshold: f64) -> Self {
        let ConfusionMatrix { tn, fp, fn_, tp } = confusion;
        let total = confusion.total();

        let accuracy = if total > 0 {
            (tp + tn) as f64 / total as f64
        } else {
            0.0
        };
        let precision = if tp + fp > 0 {
            tp as f64 / (tp + fp) as f64
        } else {
            0.0
        };
        let recall = if tp + fn_ > 0 {
            tp as f64 / (tp + fn_) as f64
        } else {
            0.0
        };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            accuracy,
            precision,
            recall,
            f1,
            threshold,
            confusion,
        }
    }

    /// Binarize probabilities at `threshold` (inclusive) and score them
    pub fn from_probabilities(y_true: &Array1<f64>, proba: &Array1<f64>, threshold: f64) -> Result<Self> {
        let y_pred = crate::training::binarize(proba, threshold);
        let confusion = ConfusionMatrix::from_predictions(y_true, &y_pred)?;
        Ok(Self::from_confusion(confusion, threshold))
    }
}

/// Score a fitted model's hard predictions on a partition at a decision threshold
pub fn evaluate<M: Classifier + ?Sized>(
    model: &M,
    x: &DesignMatrix,
    y: &Array1<f64>,
    threshold: f64,
) -> Result<ClassificationMetrics> {
    let y_pred = model.predict(x, threshold)?;
    let confusion = ConfusionMatrix::from_predictions(y, &y_pred)?;
    Ok(ClassificationMetrics::from_confusion(confusion, threshold))
}

/// F1 of hard 0/1 predictions
pub fn f1_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    let confusion = ConfusionMatrix::from_predictions(y_true, y_pred)?;
    Ok(ClassificationMetrics::from_confusion(confusion, 0.5).f1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_classification_metrics() {
        let y_true = array![1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 0.0];
        let y_pred = array![1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0];

        let cm = ConfusionMatrix::from_predictions(&y_true, &y_pred).unwrap();
        assert_eq!(cm.counts(), [[3, 1], [1, 3]]);

        let m = ClassificationMetrics::from_confusion(cm, 0.5);
        assert_eq!(m.accuracy, 6.0 / 8.0);
        assert_eq!(m.precision, 0.75);
        assert_eq!(m.recall, 0.75);
        assert!((m.f1 - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_zero_denominators() {
        let y_true = array![0.0, 0.0, 1.0];
        let y_pred = array![0.0, 0.0, 0.0];
        let cm = ConfusionMatrix::from_predictions(&y_true, &y_pred).unwrap();
        let m = ClassificationMetrics::from_confusion(cm, 0.5);
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.recall, 0.0);
        assert_eq!(m.f1, 0.0);
        assert_eq!(m.accuracy, 2.0 / 3.0);
    }

    #[test]
    fn test_percentages() {
        let cm = ConfusionMatrix { tn: 6, fp: 2, fn_: 1, tp: 1 };
        assert_eq!(cm.overall_pct()[0][0], 60.0);
        assert_eq!(cm.row_pct()[0], [75.0, 25.0]);
        assert!((cm.column_pct()[0][1] - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let y = array![1.0, 0.0];
        let p = array![0.5, 0.2];
        let m = ClassificationMetrics::from_probabilities(&y, &p, 0.5).unwrap();
        assert_eq!(m.confusion.tp, 1);
    }

    #[test]
    fn test_length_mismatch() {
        let y = array![1.0, 0.0];
        let p = array![1.0];
        assert!(ConfusionMatrix::from_predictions(&y, &p).is_err());
    }
}
