//! Pipeline configuration

use crate::error::Result;
use crate::preprocessing::{CleaningConfig, SplitConfig};
use crate::training::{GridSearchConfig, PruningConfig, SelectionConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Every knob of a full run, loadable from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Booking CSV
    pub data_path: Option<PathBuf>,

    /// Reject frames missing any booking column
    pub require_schema: bool,

    pub cleaning: CleaningConfig,
    pub split: SplitConfig,
    pub selection: SelectionConfig,
    pub grid: GridSearchConfig,
    pub pruning: PruningConfig,

    /// Predictors crosstabbed against the outcome
    pub crosstab_columns: Vec<String>,

    /// Run the logistic regression section
    pub run_logit: bool,

    /// Run the decision tree section
    pub run_trees: bool,

    /// Depth of the exported tree rules
    pub rules_depth: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            require_schema: true,
            cleaning: CleaningConfig::default(),
            split: SplitConfig::default(),
            selection: SelectionConfig::default(),
            grid: GridSearchConfig::default(),
            pruning: PruningConfig::default(),
            crosstab_columns: [
                "market_segment_type",
                "no_of_special_requests",
                "repeated_guest",
                "arrival_month",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            run_logit: true,
            run_trees: true,
            rules_depth: 6,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    pub fn with_sections(mut self, logit: bool, trees: bool) -> Self {
        self.run_logit = logit;
        self.run_trees = trees;
        self
    }

    pub fn with_require_schema(mut self, require: bool) -> Self {
        self.require_schema = require;
        self
    }

    pub fn with_grid(mut self, grid: GridSearchConfig) -> Self {
        self.grid = grid;
        self
    }

    /// Load from a JSON file; absent fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
