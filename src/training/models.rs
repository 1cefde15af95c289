//! Shared model traits

use crate::error::Result;
use crate::preprocessing::DesignMatrix;
use ndarray::Array1;

/// Binary classifier over named design matrices
pub trait Classifier: Send + Sync {
    /// Columns the model was trained on, in training order
    fn feature_names(&self) -> &[String];

    /// Probability of the positive class for each row
    fn predict_proba(&self, x: &DesignMatrix) -> Result<Array1<f64>>;

    /// Hard 0/1 predictions, positive when `probability >= threshold`
    fn predict(&self, x: &DesignMatrix, threshold: f64) -> Result<Array1<f64>> {
        Ok(binarize(&self.predict_proba(x)?, threshold))
    }

    /// Impurity or effect based importances, if the model has them
    fn feature_importances(&self) -> Option<Array1<f64>> {
        None
    }
}

/// Apply a decision threshold to probabilities
pub fn binarize(proba: &Array1<f64>, threshold: f64) -> Array1<f64> {
    proba.mapv(|p| if p >= threshold { 1.0 } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_binarize_inclusive() {
        let p = array![0.1, 0.5, 0.49, 0.9];
        assert_eq!(binarize(&p, 0.5), array![0.0, 1.0, 0.0, 1.0]);
    }
}
