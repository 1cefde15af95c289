//! Exhaustive hyperparameter search for the pre-pruned tree

use crate::error::{CancelError, Result};
use crate::metrics::f1_score;
use crate::preprocessing::DesignMatrix;
use super::config::{GridSearchConfig, TreeConfig};
use super::cross_validation::CrossValidator;
use super::decision_tree::DecisionTree;
use super::models::Classifier;
use ndarray::{Array1, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// Cross-validated score of one grid point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateScore {
    pub config: TreeConfig,
    pub fold_f1: Vec<f64>,
    pub mean_f1: f64,
}

/// Search outcome, with the winner refit on the full training partition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSearchResult {
    pub candidates: Vec<CandidateScore>,
    pub best_index: usize,
    pub model: DecisionTree,
    pub duration_secs: f64,
}

impl GridSearchResult {
    pub fn best(&self) -> &CandidateScore {
        &self.candidates[self.best_index]
    }
}

/// Score every grid point by mean F1 over stratified folds
/// and refit the best one. The first best point wins ties.
pub fn grid_search(x: &DesignMatrix, y: &Array1<f64>, grid: &GridSearchConfig) -> Result<GridSearchResult> {
    let start = Instant::now();
    let candidates = grid.candidates();
    if candidates.is_empty() {
        return Err(CancelError::InvalidParameter {
            name: "grid".to_string(),
            value: "{}".to_string(),
            reason: "every parameter needs at least one value".to_string(),
        });
    }

    let splits = CrossValidator::new(grid.cv_folds)
        .with_shuffle(grid.cv_shuffle)
        .split(y)?;

    let folds: Vec<_> = splits
        .iter()
        .map(|split| {
            (
                x.take_rows(&split.train_indices),
                y.select(Axis(0), &split.train_indices),
                x.take_rows(&split.test_indices),
                y.select(Axis(0), &split.test_indices),
            )
        })
        .collect();

    let scored: Vec<CandidateScore> = candidates
        .into_par_iter()
        .map(|config| {
            let fold_f1 = folds
                .iter()
                .map(|(x_tr, y_tr, x_val, y_val)| {
                    let tree = DecisionTree::fit(&config, x_tr, y_tr)?;
                    f1_score(y_val, &tree.predict(x_val, 0.5)?)
                })
                .collect::<Result<Vec<f64>>>()?;
            let mean_f1 = fold_f1.iter().sum::<f64>() / fold_f1.len() as f64;
            Ok(CandidateScore {
                config,
                fold_f1,
                mean_f1,
            })
        })
        .collect::<Result<_>>()?;

    let mut best_index = 0;
    for (i, candidate) in scored.iter().enumerate() {
        if candidate.mean_f1 > scored[best_index].mean_f1 {
            best_index = i;
        }
    }

    let model = DecisionTree::fit(&scored[best_index].config, x, y)?;
    let duration_secs = start.elapsed().as_secs_f64();
    info!(
        candidates = scored.len(),
        best_f1 = scored[best_index].mean_f1,
        max_depth = ?scored[best_index].config.max_depth,
        max_leaf_nodes = ?scored[best_index].config.max_leaf_nodes,
        min_samples_split = scored[best_index].config.min_samples_split,
        duration_secs,
        "Grid search finished"
    );

    Ok(GridSearchResult {
        candidates: scored,
        best_index,
        model,
        duration_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::config::ClassWeight;
    use ndarray::Array2;

    #[test]
    fn test_grid_search_picks_best_and_refits() {
        let n = 80;
        let data = Array2::from_shape_fn((n, 2), |(i, j)| if j == 0 { i as f64 } else { (i % 7) as f64 });
        let y = Array1::from_shape_fn(n, |i| if i >= 60 { 1.0 } else { 0.0 });
        let x = DesignMatrix::new(vec!["signal".to_string(), "cycle".to_string()], data).unwrap();

        let grid = GridSearchConfig {
            max_depth: vec![1, 3],
            max_leaf_nodes: vec![2, 4],
            min_samples_split: vec![2, 100],
            cv_folds: 4,
            cv_shuffle: None,
            class_weight: ClassWeight::Balanced,
        };
        let result = grid_search(&x, &y, &grid).unwrap();

        assert_eq!(result.candidates.len(), 8);
        let best = result.best();
        assert!(result.candidates.iter().all(|c| c.mean_f1 <= best.mean_f1));
        // Earlier candidates with the same score would have won
        assert!(result.candidates[..result.best_index]
            .iter()
            .all(|c| c.mean_f1 < best.mean_f1));
        assert_eq!(result.model.config, best.config);
        assert_eq!(best.fold_f1.len(), 4);
    }

    #[test]
    fn test_shuffled_folds_are_seeded() {
        let n = 60;
        let data = Array2::from_shape_fn((n, 1), |(i, _)| i as f64);
        let y = Array1::from_shape_fn(n, |i| if i >= 40 || i % 11 == 3 { 1.0 } else { 0.0 });
        let x = DesignMatrix::new(vec!["lead_time".to_string()], data).unwrap();

        let grid = GridSearchConfig {
            max_depth: vec![1, 2],
            max_leaf_nodes: vec![4],
            min_samples_split: vec![2],
            ..GridSearchConfig::default()
        }
        .with_cv_folds(3)
        .with_cv_shuffle(Some(7));
        let a = grid_search(&x, &y, &grid).unwrap();
        let b = grid_search(&x, &y, &grid).unwrap();

        let scores = |r: &GridSearchResult| r.candidates.iter().map(|c| c.fold_f1.clone()).collect::<Vec<_>>();
        assert_eq!(scores(&a), scores(&b));
        assert_eq!(a.best_index, b.best_index);
    }
}
