//! Cost-complexity post-pruning sweep

use crate::error::{CancelError, Result};
use crate::metrics::evaluate;
use crate::preprocessing::{DesignMatrix, TrainTestSplit};
use super::config::{PruningConfig, TreeConfig};
use super::decision_tree::{DecisionTree, PruningPath};
use ndarray::Array1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Tree pruned at one alpha
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrunedTree {
    pub alpha: f64,
    pub tree: DecisionTree,
}

/// Size and F1 of one pruned tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaScore {
    pub alpha: f64,
    pub node_count: usize,
    pub depth: usize,
    pub train_f1: f64,
    pub test_f1: f64,
}

/// Full post-pruning run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPruningResult {
    pub path: PruningPath,
    pub scores: Vec<AlphaScore>,
    pub best_index: usize,
    pub best: PrunedTree,
}

/// Effective alphas of an unconstrained tree grown with `config`.
/// Round-off can leave tiny negative alphas; they are reported as magnitudes.
pub fn cost_complexity_path(x: &DesignMatrix, y: &Array1<f64>, config: &TreeConfig) -> Result<PruningPath> {
    let tree = DecisionTree::fit(&config.with_ccp_alpha(0.0), x, y)?;
    let mut path = tree.cost_complexity_path();
    for alpha in &mut path.ccp_alphas {
        *alpha = alpha.abs();
    }
    Ok(path)
}

/// One pruned tree per alpha, from a single full-depth fit
pub fn sweep_alphas(
    x: &DesignMatrix,
    y: &Array1<f64>,
    alphas: &[f64],
    config: &TreeConfig,
) -> Result<Vec<PrunedTree>> {
    let full = DecisionTree::fit(&config.with_ccp_alpha(0.0), x, y)?;
    Ok(alphas
        .par_iter()
        .map(|&alpha| PrunedTree {
            alpha,
            tree: full.prune(alpha),
        })
        .collect())
}

/// Score each pruned tree on both partitions; the first maximum of test F1 wins.
///
/// Choosing by test F1 leaks the held-out partition into model selection.
pub fn select_best_by_f1(trees: &[PrunedTree], split: &TrainTestSplit, threshold: f64) -> Result<(usize, Vec<AlphaScore>)> {
    if trees.is_empty() {
        return Err(CancelError::ValidationError("no pruned trees to compare".to_string()));
    }

    let scores = trees
        .par_iter()
        .map(|pruned| {
            Ok(AlphaScore {
                alpha: pruned.alpha,
                node_count: pruned.tree.node_count(),
                depth: pruned.tree.depth(),
                train_f1: evaluate(&pruned.tree, &split.x_train, &split.y_train, threshold)?.f1,
                test_f1: evaluate(&pruned.tree, &split.x_test, &split.y_test, threshold)?.f1,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut best = 0;
    for (i, score) in scores.iter().enumerate() {
        if score.test_f1 > scores[best].test_f1 {
            best = i;
        }
    }
    Ok((best, scores))
}

/// Path, sweep (without the root-only alpha) and selection in one call
pub fn post_prune(split: &TrainTestSplit, config: &PruningConfig) -> Result<PostPruningResult> {
    let tree_config = TreeConfig::default().with_class_weight(config.class_weight);
    let path = cost_complexity_path(&split.x_train, &split.y_train, &tree_config)?;

    let usable = &path.ccp_alphas[..path.ccp_alphas.len().saturating_sub(1)];
    let alphas: Vec<f64> = if usable.is_empty() { vec![0.0] } else { usable.to_vec() };

    let trees = sweep_alphas(&split.x_train, &split.y_train, &alphas, &tree_config)?;
    let (best_index, scores) = select_best_by_f1(&trees, split, config.threshold)?;

    let best = trees[best_index].clone();
    info!(
        alphas = alphas.len(),
        best_alpha = best.alpha,
        nodes = best.tree.node_count(),
        test_f1 = scores[best_index].test_f1,
        "Post-pruning finished"
    );

    Ok(PostPruningResult {
        path,
        scores,
        best_index,
        best,
    })
}
