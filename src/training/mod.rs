//! Model training module
//!
//! Provides the two model families used for cancellation prediction:
//! - Logistic regression fitted by Newton-Raphson, with Wald inference
//! - Backward elimination on logit p-values, and variance inflation factors
//! - Gini decision trees (depth-first or best-first growth)
//! - Grid-searched pre-pruning over stratified folds
//! - Cost-complexity post-pruning

mod config;
mod linalg;
mod models;
pub mod cross_validation;
pub mod decision_tree;
pub mod grid_search;
pub mod logistic;
pub mod pruning;
pub mod stepwise;
pub mod vif;

pub use config::{ClassWeight, GridSearchConfig, LogitConfig, PruningConfig, SelectionConfig, TreeConfig};
pub use models::{binarize, Classifier};
pub use cross_validation::{CVSplit, CrossValidator};
pub use decision_tree::{DecisionTree, NodeKind, PruningPath, TreeNode};
pub use grid_search::{grid_search, CandidateScore, GridSearchResult};
pub use logistic::{CoefficientRow, LogitModel, OddsRow};
pub use pruning::{cost_complexity_path, post_prune, select_best_by_f1, sweep_alphas, AlphaScore, PostPruningResult, PrunedTree};
pub use stepwise::{select_features, EliminationStep, FeatureSet};
pub use vif::{variance_inflation_factors, VifRow};
