//! Stratified cross-validation folds

use crate::error::{CancelError, Result};
use ndarray::Array1;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

/// A single train/validation split
#[derive(Debug, Clone, PartialEq)]
pub struct CVSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
    pub fold_idx: usize,
}

/// Stratified K-fold splitter
#[derive(Debug, Clone)]
pub struct CrossValidator {
    n_splits: usize,
    /// Seed for shuffling rows within each class; `None` keeps row order
    shuffle: Option<u64>,
}

impl CrossValidator {
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: None,
        }
    }

    pub fn with_shuffle(mut self, seed: Option<u64>) -> Self {
        self.shuffle = seed;
        self
    }

    fn check_splits(n_samples: usize, n_splits: usize) -> Result<()> {
        if n_splits < 2 {
            return Err(CancelError::ValidationError(
                "n_splits must be at least 2".to_string(),
            ));
        }
        if n_samples < n_splits {
            return Err(CancelError::ValidationError(format!(
                "n_samples ({}) must be >= n_splits ({})",
                n_samples, n_splits
            )));
        }
        Ok(())
    }

    /// Within each class, rows in order (or shuffled) fill fold 0 first, then fold 1, and so on;
    /// per-fold class counts follow a round-robin over the class-sorted labels.
    pub fn split(&self, y: &Array1<f64>) -> Result<Vec<CVSplit>> {
        let n_splits = self.n_splits;
        let n_samples = y.len();
        Self::check_splits(n_samples, n_splits)?;

        let mut classes: Vec<i64> = y.iter().map(|v| v.round() as i64).collect();
        classes.sort_unstable();
        classes.dedup();
        let class_of: Vec<usize> = y
            .iter()
            .map(|v| {
                let c = v.round() as i64;
                classes.iter().position(|&k| k == c).unwrap_or(0)
            })
            .collect();

        let mut counts = vec![0usize; classes.len()];
        for &c in &class_of {
            counts[c] += 1;
        }
        if counts.iter().all(|&c| c < n_splits) {
            return Err(CancelError::ValidationError(format!(
                "n_splits ({}) exceeds the size of every class",
                n_splits
            )));
        }
        if let Some(&smallest) = counts.iter().min() {
            if smallest < n_splits {
                warn!(smallest, n_splits, "Least populated class has fewer members than folds");
            }
        }

        // allocation[fold][class] over the class-sorted label sequence
        let mut allocation = vec![vec![0usize; classes.len()]; n_splits];
        let mut position = 0;
        for (class, &count) in counts.iter().enumerate() {
            for _ in 0..count {
                allocation[position % n_splits][class] += 1;
                position += 1;
            }
        }

        let mut rng = self.shuffle.map(ChaCha8Rng::seed_from_u64);
        let mut fold_of = vec![0usize; n_samples];
        for class in 0..classes.len() {
            let mut members: Vec<usize> = (0..n_samples).filter(|&i| class_of[i] == class).collect();
            if let Some(rng) = rng.as_mut() {
                members.shuffle(rng);
            }
            let mut cursor = 0;
            for (fold, per_class) in allocation.iter().enumerate() {
                for &idx in &members[cursor..cursor + per_class[class]] {
                    fold_of[idx] = fold;
                }
                cursor += per_class[class];
            }
        }

        Ok(Self::from_assignment(&fold_of, n_splits))
    }

    fn from_assignment(fold_of: &[usize], n_splits: usize) -> Vec<CVSplit> {
        (0..n_splits)
            .map(|fold_idx| {
                let (test_indices, train_indices): (Vec<usize>, Vec<usize>) =
                    (0..fold_of.len()).partition(|&i| fold_of[i] == fold_idx);
                CVSplit {
                    train_indices,
                    test_indices,
                    fold_idx,
                }
            })
            .collect()
    }
}
