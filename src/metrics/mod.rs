//! Evaluation metrics
//!
//! Confusion matrices, accuracy/precision/recall/F1 at a decision threshold,
//! and the ROC and precision-recall curves the threshold rules work from.

mod classification;
pub mod curves;

pub use classification::{evaluate, f1_score, ClassificationMetrics, ConfusionMatrix};
pub use curves::{pr_curve, roc_auc, roc_curve, PrCurve, PrPoint, RocCurve, RocPoint};
