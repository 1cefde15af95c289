//! hotel-cancel - hotel booking cancellation modeling
//!
//! This crate predicts booking cancellations from tabular booking attributes:
//! - Data cleaning, one-hot encoding and a seeded train/test split
//! - Logistic regression with Wald inference and stepwise p-value elimination
//! - Gini decision trees with grid-searched pre-pruning and cost-complexity post-pruning
//! - Threshold tuning, metrics and comparison tables
//!
//! # Modules
//!
//! ## Data
//! - [`preprocessing`] - Schema validation, cleaning, encoding, splitting
//! - [`analysis`] - Column summaries, duplicates, crosstabs, correlations
//!
//! ## Models
//! - [`training`] - Logit, stepwise selection, VIF, decision trees, pruning
//! - [`threshold`] - Youden and precision/recall crossover cut-offs
//! - [`metrics`] - Confusion matrices, F1, ROC and PR curves
//!
//! ## Output
//! - [`report`] - Comparison, coefficient and odds tables
//! - [`pipeline`] - End-to-end orchestration and JSON reports
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Data
pub mod preprocessing;
pub mod analysis;

// Models
pub mod training;
pub mod threshold;
pub mod metrics;

// Output
pub mod report;
pub mod pipeline;
pub mod cli;

pub use error::{CancelError, Result};

/// Prelude for convenient imports
pub mod prelude {
    // Error types
    pub use crate::error::{CancelError, Result};

    // Data
    pub use crate::preprocessing::{
        train_test_split, CleaningConfig, DataPreparer, DesignMatrix, OneHotEncoder, Partition, SplitConfig,
        TrainTestSplit,
    };

    // Models
    pub use crate::training::{
        grid_search, post_prune, select_features, Classifier, DecisionTree, GridSearchConfig, LogitModel,
        PruningConfig, SelectionConfig, TreeConfig,
    };
    pub use crate::threshold::{pr_crossover_threshold, youden_threshold, ThresholdChoice, DEFAULT_THRESHOLD};
    pub use crate::metrics::{evaluate, ClassificationMetrics, ConfusionMatrix};

    // Output
    pub use crate::report::{CoefficientTable, ComparisonTable, OddsTable};
    pub use crate::pipeline::{run_pipeline, PipelineConfig, PipelineReport};
}
