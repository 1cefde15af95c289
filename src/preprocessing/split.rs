//! Seeded train/test partitioning

use crate::error::{CancelError, Result};
use super::config::SplitConfig;
use super::encoder::DesignMatrix;
use ndarray::{Array1, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Row indices of a train/test partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl Partition {
    /// Shuffle `0..n_samples` and hold out the first `ceil(n * test_size)` rows
    pub fn shuffled(n_samples: usize, config: &SplitConfig) -> Result<Self> {
        if !(config.test_size > 0.0 && config.test_size < 1.0) {
            return Err(CancelError::InvalidParameter {
                name: "test_size".to_string(),
                value: config.test_size.to_string(),
                reason: "must lie strictly between 0 and 1".to_string(),
            });
        }

        let n_test = (n_samples as f64 * config.test_size).ceil() as usize;
        if n_test == 0 || n_test >= n_samples {
            return Err(CancelError::ValidationError(format!(
                "cannot split {} samples with test_size {}",
                n_samples, config.test_size
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(config.random_state);
        indices.shuffle(&mut rng);

        let train = indices.split_off(n_test);
        Ok(Self { train, test: indices })
    }

    /// Use caller-chosen row sets
    pub fn from_indices(n_samples: usize, train: Vec<usize>, test: Vec<usize>) -> Result<Self> {
        let mut seen = vec![false; n_samples];
        for &i in train.iter().chain(test.iter()) {
            if i >= n_samples {
                return Err(CancelError::ValidationError(format!(
                    "row index {} out of range for {} samples",
                    i, n_samples
                )));
            }
            if seen[i] {
                return Err(CancelError::ValidationError(format!(
                    "row {} appears in more than one partition",
                    i
                )));
            }
            seen[i] = true;
        }
        Ok(Self { train, test })
    }
}

/// Materialized train/test matrices sharing one column schema
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: DesignMatrix,
    pub x_test: DesignMatrix,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
    pub partition: Partition,
}

impl TrainTestSplit {
    pub fn apply(x: &DesignMatrix, y: &Array1<f64>, partition: Partition) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(CancelError::ShapeError {
                expected: format!("y length = {}", x.nrows()),
                actual: format!("y length = {}", y.len()),
            });
        }
        Ok(Self {
            x_train: x.take_rows(&partition.train),
            x_test: x.take_rows(&partition.test),
            y_train: y.select(Axis(0), &partition.train),
            y_test: y.select(Axis(0), &partition.test),
            partition,
        })
    }

    /// Same partition, different column layout (e.g. with an intercept)
    pub fn map_features(&self, f: impl Fn(&DesignMatrix) -> DesignMatrix) -> Self {
        Self {
            x_train: f(&self.x_train),
            x_test: f(&self.x_test),
            y_train: self.y_train.clone(),
            y_test: self.y_test.clone(),
            partition: self.partition.clone(),
        }
    }
}

/// Positive-class share of a label vector
pub fn class_balance(y: &Array1<f64>) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    y.iter().filter(|&&v| v >= 0.5).count() as f64 / y.len() as f64
}

pub fn train_test_split(x: &DesignMatrix, y: &Array1<f64>, config: &SplitConfig) -> Result<TrainTestSplit> {
    let partition = Partition::shuffled(x.nrows(), config)?;
    TrainTestSplit::apply(x, y, partition)
}
