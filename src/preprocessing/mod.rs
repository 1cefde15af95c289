//! Data preprocessing module
//!
//! Turns a raw booking extract into model inputs:
//! - Schema validation and typed column access
//! - Cleaning (identifier drop, rare-code remapping, whisker capping, outcome encoding)
//! - One-hot encoding into a frozen design matrix schema
//! - Seeded train/test partitioning

mod config;
mod cleaner;
mod encoder;
pub mod outlier;
pub mod schema;
pub mod split;

pub use config::{CategoryRemapConfig, CleaningConfig, PriceCapConfig, SplitConfig};
pub use cleaner::{encode_outcome, nearest_valid, CleaningSummary, DataPreparer};
pub use encoder::{reindex, CategoricalLevels, DesignMatrix, EncodingSchema, OneHotEncoder, INTERCEPT};
pub use outlier::WhiskerBounds;
pub use schema::{validate_bookings, BOOKING_COLUMNS, CATEGORICAL_COLUMNS};
pub use split::{train_test_split, Partition, TrainTestSplit};
