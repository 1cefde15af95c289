//! Booking table schema

use crate::error::{CancelError, Result};
use polars::prelude::*;

/// Columns every booking extract must carry
pub const BOOKING_COLUMNS: [&str; 19] = [
    "Booking_ID",
    "no_of_adults",
    "no_of_children",
    "no_of_weekend_nights",
    "no_of_week_nights",
    "type_of_meal_plan",
    "required_car_parking_space",
    "room_type_reserved",
    "lead_time",
    "arrival_year",
    "arrival_month",
    "arrival_date",
    "market_segment_type",
    "repeated_guest",
    "no_of_previous_cancellations",
    "no_of_previous_bookings_not_canceled",
    "avg_price_per_room",
    "no_of_special_requests",
    "booking_status",
];

/// Categorical booking attributes, encoded as indicators downstream
pub const CATEGORICAL_COLUMNS: [&str; 3] = [
    "type_of_meal_plan",
    "room_type_reserved",
    "market_segment_type",
];

/// Fail fast on the first missing column
pub fn require_columns(df: &DataFrame, columns: &[&str]) -> Result<()> {
    for name in columns {
        if df.column(name).is_err() {
            return Err(CancelError::FeatureNotFound(name.to_string()));
        }
    }
    Ok(())
}

/// Validate a raw booking extract against the full schema
pub fn validate_bookings(df: &DataFrame) -> Result<()> {
    require_columns(df, &BOOKING_COLUMNS)
}

/// Whether a column holds text values
pub fn is_text(column: &Column) -> bool {
    matches!(column.dtype(), DataType::String)
}

/// Read a column as `f64`, rejecting nulls
pub fn column_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| CancelError::FeatureNotFound(name.to_string()))?;
    let casted = column.cast(&DataType::Float64)?;
    casted
        .as_materialized_series()
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| CancelError::DataError(format!("null value in '{}' at row {}", name, row)))
        })
        .collect()
}

/// Read a text column, rejecting nulls
pub fn column_str(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df
        .column(name)
        .map_err(|_| CancelError::FeatureNotFound(name.to_string()))?;
    let ca = column.as_materialized_series().str()?;
    ca.into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.map(|s| s.to_string())
                .ok_or_else(|| CancelError::DataError(format!("null value in '{}' at row {}", name, row)))
        })
        .collect()
}
