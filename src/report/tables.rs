//! Plain-text and JSON tables for model comparison and logit inference

use crate::metrics::ClassificationMetrics;
use crate::training::{CoefficientRow, LogitModel, OddsRow, VifRow};
use serde::{Deserialize, Serialize};
use std::fmt;

const METRIC_NAMES: [&str; 4] = ["Accuracy", "Recall", "Precision", "F1"];

/// One model column of a comparison table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelColumn {
    pub name: String,
    pub metrics: ClassificationMetrics,
}

/// Metrics as rows, models as columns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComparisonTable {
    pub title: String,
    pub models: Vec<ModelColumn>,
}

impl ComparisonTable {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            models: Vec::new(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, metrics: ClassificationMetrics) -> &mut Self {
        self.models.push(ModelColumn {
            name: name.into(),
            metrics,
        });
        self
    }

    pub fn with_model(mut self, name: impl Into<String>, metrics: ClassificationMetrics) -> Self {
        self.push(name, metrics);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ClassificationMetrics> {
        self.models.iter().find(|m| m.name == name).map(|m| &m.metrics)
    }

    /// Model with the highest F1; the first one wins ties
    pub fn best_by_f1(&self) -> Option<&ModelColumn> {
        self.models.iter().fold(None, |best: Option<&ModelColumn>, m| match best {
            Some(b) if b.metrics.f1 >= m.metrics.f1 => Some(b),
            _ => Some(m),
        })
    }

    fn metric(metrics: &ClassificationMetrics, row: usize) -> f64 {
        match row {
            0 => metrics.accuracy,
            1 => metrics.recall,
            2 => metrics.precision,
            _ => metrics.f1,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ComparisonTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths: Vec<usize> = self.models.iter().map(|m| m.name.len().max(8)).collect();
        if !self.title.is_empty() {
            writeln!(f, "{}", self.title)?;
        }

        write!(f, "{:<10}", "")?;
        for (model, w) in self.models.iter().zip(&widths) {
            write!(f, "  {:>w$}", model.name, w = w)?;
        }
        writeln!(f)?;

        for (row, name) in METRIC_NAMES.iter().enumerate() {
            write!(f, "{:<10}", name)?;
            for (model, w) in self.models.iter().zip(&widths) {
                write!(f, "  {:>w$.6}", Self::metric(&model.metrics, row), w = w)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Logit coefficient table with fit statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoefficientTable {
    pub rows: Vec<CoefficientRow>,
    pub n_obs: usize,
    pub iterations: usize,
    pub llf: f64,
    pub llnull: f64,
    pub pseudo_r2: f64,
    pub aic: f64,
    pub bic: f64,
}

impl CoefficientTable {
    pub fn from_model(model: &LogitModel) -> Self {
        Self {
            rows: model.summary(),
            n_obs: model.n_obs,
            iterations: model.iterations,
            llf: model.llf,
            llnull: model.llnull,
            pseudo_r2: model.pseudo_r2(),
            aic: model.aic(),
            bic: model.bic(),
        }
    }

    /// Rows whose p-value exceeds `significance`
    pub fn insignificant(&self, significance: f64) -> Vec<&CoefficientRow> {
        self.rows.iter().filter(|r| r.p_value > significance).collect()
    }
}

impl fmt::Display for CoefficientTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_w = self.rows.iter().map(|r| r.name.len()).max().unwrap_or(0).max(8);
        writeln!(
            f,
            "No. Observations: {:<8} Pseudo R-squ.: {:.4}   Log-Likelihood: {:.2}",
            self.n_obs, self.pseudo_r2, self.llf
        )?;
        writeln!(
            f,
            "Iterations: {:<14} LL-Null: {:.2}   AIC: {:.2}   BIC: {:.2}",
            self.iterations, self.llnull, self.aic, self.bic
        )?;
        writeln!(
            f,
            "{:<w$}  {:>10} {:>10} {:>8} {:>8} {:>10} {:>10}",
            "", "coef", "std err", "z", "P>|z|", "[0.025", "0.975]",
            w = name_w
        )?;
        for r in &self.rows {
            writeln!(
                f,
                "{:<w$}  {:>10.4} {:>10.4} {:>8.3} {:>8.3} {:>10.4} {:>10.4}",
                r.name, r.coef, r.std_err, r.z, r.p_value, r.ci_lower, r.ci_upper,
                w = name_w
            )?;
        }
        Ok(())
    }
}

/// Odds ratios and percentage change in odds per coefficient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsTable {
    pub rows: Vec<OddsRow>,
}

impl OddsTable {
    pub fn from_model(model: &LogitModel) -> Self {
        Self { rows: model.odds() }
    }
}

impl fmt::Display for OddsTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_w = self.rows.iter().map(|r| r.name.len()).max().unwrap_or(0).max(8);
        writeln!(f, "{:<w$}  {:>12} {:>18}", "", "Odds", "Change in odds %", w = name_w)?;
        for r in &self.rows {
            writeln!(f, "{:<w$}  {:>12.4} {:>18.2}", r.name, r.odds_ratio, r.change_pct, w = name_w)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VifTable {
    pub rows: Vec<VifRow>,
}

impl fmt::Display for VifTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_w = self.rows.iter().map(|r| r.feature.len()).max().unwrap_or(0).max(8);
        for r in &self.rows {
            writeln!(f, "{:<w$}  {:>10.4}", r.feature, r.vif, w = name_w)?;
        }
        Ok(())
    }
}
