//! Training configuration

use serde::{Deserialize, Serialize};

/// Newton-Raphson settings for the logit fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogitConfig {
    /// Maximum Newton iterations
    pub max_iter: usize,
    /// Converged once every parameter moves by less than this
    pub tol: f64,
}

impl Default for LogitConfig {
    fn default() -> Self {
        Self {
            max_iter: 35,
            tol: 1e-8,
        }
    }
}

/// Backward elimination settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Predictors with a p-value above this are eliminated
    pub significance: f64,
    pub logit: LogitConfig,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            significance: 0.05,
            logit: LogitConfig::default(),
        }
    }
}

impl SelectionConfig {
    pub fn with_significance(mut self, significance: f64) -> Self {
        self.significance = significance;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.logit.max_iter = max_iter;
        self
    }
}

/// Per-class sample weighting for tree training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ClassWeight {
    /// Every sample counts once
    #[default]
    Uniform,
    /// `n_samples / (n_classes * class_count)`
    Balanced,
}

/// Decision tree hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Grow best-first when set
    pub max_leaf_nodes: Option<usize>,
    pub class_weight: ClassWeight,
    /// Cost-complexity pruning strength applied after growth
    pub ccp_alpha: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_leaf_nodes: None,
            class_weight: ClassWeight::Uniform,
            ccp_alpha: 0.0,
        }
    }
}

impl TreeConfig {
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_min_samples_split(mut self, n: usize) -> Self {
        self.min_samples_split = n;
        self
    }

    pub fn with_min_samples_leaf(mut self, n: usize) -> Self {
        self.min_samples_leaf = n;
        self
    }

    pub fn with_max_leaf_nodes(mut self, n: usize) -> Self {
        self.max_leaf_nodes = Some(n);
        self
    }

    pub fn with_class_weight(mut self, weight: ClassWeight) -> Self {
        self.class_weight = weight;
        self
    }

    pub fn with_ccp_alpha(mut self, alpha: f64) -> Self {
        self.ccp_alpha = alpha;
        self
    }
}

/// Hyperparameter grid for the pre-pruned tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSearchConfig {
    pub max_depth: Vec<usize>,
    pub max_leaf_nodes: Vec<usize>,
    pub min_samples_split: Vec<usize>,
    pub cv_folds: usize,
    /// Seed for shuffling rows within each class before folding; `None` keeps row order
    pub cv_shuffle: Option<u64>,
    pub class_weight: ClassWeight,
}

impl Default for GridSearchConfig {
    fn default() -> Self {
        Self {
            max_depth: vec![2, 4, 6],
            max_leaf_nodes: vec![50, 75, 150, 250],
            min_samples_split: vec![10, 30, 50, 70],
            cv_folds: 5,
            cv_shuffle: None,
            class_weight: ClassWeight::Balanced,
        }
    }
}

impl GridSearchConfig {
    /// Every combination, parameters sorted by name with the last varying fastest
    pub fn candidates(&self) -> Vec<TreeConfig> {
        let mut out = Vec::with_capacity(
            self.max_depth.len() * self.max_leaf_nodes.len() * self.min_samples_split.len(),
        );
        for &depth in &self.max_depth {
            for &leaves in &self.max_leaf_nodes {
                for &split in &self.min_samples_split {
                    out.push(
                        TreeConfig::default()
                            .with_max_depth(depth)
                            .with_max_leaf_nodes(leaves)
                            .with_min_samples_split(split)
                            .with_class_weight(self.class_weight),
                    );
                }
            }
        }
        out
    }

    pub fn with_cv_folds(mut self, folds: usize) -> Self {
        self.cv_folds = folds;
        self
    }

    pub fn with_cv_shuffle(mut self, seed: Option<u64>) -> Self {
        self.cv_shuffle = seed;
        self
    }
}

/// Post-pruning settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruningConfig {
    pub class_weight: ClassWeight,
    /// Threshold used when scoring each pruned tree
    pub threshold: f64,
}

impl Default for PruningConfig {
    fn default() -> Self {
        Self {
            class_weight: ClassWeight::Balanced,
            threshold: 0.5,
        }
    }
}
