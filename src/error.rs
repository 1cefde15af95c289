//! Error types for the cancellation modeling pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, CancelError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum CancelError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Column not found: {0}")]
    FeatureNotFound(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Convergence failed after {iterations} iterations, coefficient of '{column}' still moving")]
    ConvergenceError { iterations: usize, column: String },

    #[error("Perfect separation detected after {iterations} iterations, coefficients are not identified")]
    PerfectSeparation { iterations: usize },

    #[error("Labels contain a single class ({class}), {context} is undefined")]
    DegenerateLabels { class: u8, context: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Computation error: {0}")]
    ComputationError(String),
}

impl From<polars::error::PolarsError> for CancelError {
    fn from(err: polars::error::PolarsError) -> Self {
        CancelError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for CancelError {
    fn from(err: serde_json::Error) -> Self {
        CancelError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for CancelError {
    fn from(err: ndarray::ShapeError) -> Self {
        CancelError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CancelError::DataError("test error".to_string());
        assert_eq!(err.to_string(), "Data error: test error");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CancelError = io_err.into();
        assert!(matches!(err, CancelError::IoError(_)));
    }

    #[test]
    fn test_degenerate_labels_display() {
        let err = CancelError::DegenerateLabels {
            class: 1,
            context: "ROC curve".to_string(),
        };
        assert!(err.to_string().contains("single class (1)"));
    }
}
