//! Report tables
//!
//! Every table renders through `Display` and serializes with serde, so the
//! CLI prints the same values the JSON report carries.

mod tables;

pub use tables::{CoefficientTable, ComparisonTable, ModelColumn, OddsTable, VifTable};

use crate::metrics::ConfusionMatrix;

/// Confusion matrix cells as `count (overall %)`, actual classes as rows
pub fn render_confusion(confusion: &ConfusionMatrix) -> String {
    let counts = confusion.counts();
    let pct = confusion.overall_pct();
    let cell = |i: usize, j: usize| format!("{} ({:.2}%)", counts[i][j], pct[i][j]);

    let mut out = String::new();
    out.push_str(&format!("{:<10}  {:>18}  {:>18}\n", "actual", "predicted 0", "predicted 1"));
    for i in 0..2 {
        out.push_str(&format!("{:<10}  {:>18}  {:>18}\n", i, cell(i, 0), cell(i, 1)));
    }
    out
}
