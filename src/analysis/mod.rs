//! Exploratory analysis of booking frames
//!
//! Tables only: column summaries, duplicate counts, outcome crosstabs and
//! Pearson correlations.

pub mod crosstab;
pub mod describe;

pub use crosstab::{crosstab, Crosstab, CrosstabRow};
pub use describe::{
    column_keys, correlation_matrix, describe, duplicate_rows, value_counts, ColumnSummary, ColumnType,
    CorrelationMatrix,
};
