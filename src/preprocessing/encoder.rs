//! One-hot encoding into a fixed-schema design matrix

use crate::error::{CancelError, Result};
use super::schema::{column_f64, column_str, is_text};
use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Name of the intercept column added for the logit models
pub const INTERCEPT: &str = "const";

/// A categorical column and its retained (non-reference) levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalLevels {
    pub column: String,
    /// Dropped reference level (first in sorted order)
    pub reference: String,
    pub levels: Vec<String>,
}

/// Column layout frozen at fit time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingSchema {
    pub target: String,
    pub numeric: Vec<String>,
    pub categorical: Vec<CategoricalLevels>,
    pub columns: Vec<String>,
}

/// Numeric matrix with named columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignMatrix {
    pub columns: Vec<String>,
    pub data: Array2<f64>,
}

impl DesignMatrix {
    pub fn new(columns: Vec<String>, data: Array2<f64>) -> Result<Self> {
        if columns.len() != data.ncols() {
            return Err(CancelError::ShapeError {
                expected: format!("{} columns", columns.len()),
                actual: format!("{} columns", data.ncols()),
            });
        }
        Ok(Self { columns, data })
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Prepend a column of ones named `const`
    pub fn with_intercept(&self) -> Self {
        if self.column_index(INTERCEPT).is_some() {
            return self.clone();
        }
        let n = self.nrows();
        let mut data = Array2::ones((n, self.ncols() + 1));
        data.slice_mut(ndarray::s![.., 1..]).assign(&self.data);
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(INTERCEPT.to_string());
        columns.extend(self.columns.iter().cloned());
        Self { columns, data }
    }

    /// Keep the named columns, in the order given
    pub fn select(&self, names: &[String]) -> Result<Self> {
        let indices: Vec<usize> = names
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| CancelError::FeatureNotFound(name.clone()))
            })
            .collect::<Result<_>>()?;
        Ok(Self {
            columns: names.to_vec(),
            data: self.data.select(Axis(1), &indices),
        })
    }

    /// Keep the given rows, in the order given
    pub fn take_rows(&self, rows: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            data: self.data.select(Axis(0), rows),
        }
    }
}

/// Fits the indicator layout on one frame and replays it on others
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneHotEncoder {
    schema: Option<EncodingSchema>,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema(&self) -> Option<&EncodingSchema> {
        self.schema.as_ref()
    }

    /// Learn numeric columns and categorical levels (reference level dropped)
    pub fn fit(&mut self, df: &DataFrame, target: &str) -> Result<&mut Self> {
        if df.column(target).is_err() {
            return Err(CancelError::FeatureNotFound(target.to_string()));
        }

        let mut numeric = Vec::new();
        let mut categorical = Vec::new();

        for column in df.get_columns() {
            let name = column.name().to_string();
            if name == target {
                continue;
            }
            if is_text(column) {
                let values = column_str(df, &name)?;
                let mut levels: Vec<String> = values
                    .into_iter()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect();
                if levels.is_empty() {
                    continue;
                }
                let reference = levels.remove(0);
                categorical.push(CategoricalLevels {
                    column: name,
                    reference,
                    levels,
                });
            } else {
                numeric.push(name);
            }
        }

        let mut columns = numeric.clone();
        for cat in &categorical {
            for level in &cat.levels {
                columns.push(format!("{}_{}", cat.column, level));
            }
        }

        self.schema = Some(EncodingSchema {
            target: target.to_string(),
            numeric,
            categorical,
            columns,
        });
        Ok(self)
    }

    /// Encode a frame into the fitted layout
    pub fn transform(&self, df: &DataFrame) -> Result<DesignMatrix> {
        let schema = self.schema.as_ref().ok_or(CancelError::ModelNotFitted)?;
        let n_rows = df.height();

        let mut col_data: Vec<Vec<f64>> = Vec::with_capacity(schema.columns.len());
        for name in &schema.numeric {
            col_data.push(column_f64(df, name)?);
        }

        for cat in &schema.categorical {
            let values = column_str(df, &cat.column)?;
            for level in &cat.levels {
                col_data.push(
                    values
                        .iter()
                        .map(|v| if v == level { 1.0 } else { 0.0 })
                        .collect(),
                );
            }
        }

        let col_refs: Vec<&[f64]> = col_data.iter().map(|c| c.as_slice()).collect();
        let data = Array2::from_shape_fn((n_rows, col_refs.len()), |(r, c)| col_refs[c][r]);
        DesignMatrix::new(schema.columns.clone(), data)
    }

    /// Read the target column of a cleaned frame
    pub fn target(&self, df: &DataFrame) -> Result<Array1<f64>> {
        let schema = self.schema.as_ref().ok_or(CancelError::ModelNotFitted)?;
        Ok(Array1::from_vec(column_f64(df, &schema.target)?))
    }

    pub fn fit_transform(&mut self, df: &DataFrame, target: &str) -> Result<(DesignMatrix, Array1<f64>)> {
        self.fit(df, target)?;
        Ok((self.transform(df)?, self.target(df)?))
    }
}

/// Reindex an encoded matrix to a target column list, zero-filling absent columns
pub fn reindex(matrix: &DesignMatrix, columns: &[String]) -> DesignMatrix {
    let n = matrix.nrows();
    let mut data = Array2::zeros((n, columns.len()));
    for (j, name) in columns.iter().enumerate() {
        if let Some(src) = matrix.column_index(name) {
            data.column_mut(j).assign(&matrix.data.column(src));
        }
    }
    DesignMatrix {
        columns: columns.to_vec(),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        df!(
            "lead_time" => &[10i64, 200, 35, 80],
            "room" => &["Room_Type 1", "Room_Type 4", "Room_Type 1", "Room_Type 2"],
            "segment" => &["Online", "Offline", "Corporate", "Online"],
            "booking_status" => &[0i32, 1, 0, 1]
        )
        .unwrap()
    }

    #[test]
    fn test_get_dummies_layout() {
        let mut encoder = OneHotEncoder::new();
        let (x, y) = encoder.fit_transform(&frame(), "booking_status").unwrap();

        assert_eq!(
            x.columns,
            vec![
                "lead_time",
                "room_Room_Type 2",
                "room_Room_Type 4",
                "segment_Offline",
                "segment_Online",
            ]
        );
        assert_eq!(x.data.row(1).to_vec(), vec![200.0, 0.0, 1.0, 1.0, 0.0]);
        assert_eq!(x.data.row(2).to_vec(), vec![35.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(y.to_vec(), vec![0.0, 1.0, 0.0, 1.0]);

        let schema = encoder.schema().unwrap();
        assert_eq!(schema.categorical[1].reference, "Corporate");
    }

    #[test]
    fn test_unseen_level_encodes_as_zeros() {
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&frame(), "booking_status").unwrap();

        let new = df!(
            "lead_time" => &[5i64],
            "room" => &["Room_Type 7"],
            "segment" => &["Aviation"],
            "booking_status" => &[0i32]
        )
        .unwrap();
        let x = encoder.transform(&new).unwrap();
        assert_eq!(x.data.row(0).to_vec(), vec![5.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_numeric_column_fails() {
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&frame(), "booking_status").unwrap();
        let new = df!("room" => &["Room_Type 1"], "segment" => &["Online"]).unwrap();
        assert!(matches!(encoder.transform(&new), Err(CancelError::FeatureNotFound(_))));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let mut a = OneHotEncoder::new();
        let mut b = OneHotEncoder::new();
        let (xa, _) = a.fit_transform(&frame(), "booking_status").unwrap();
        let (xb, _) = b.fit_transform(&frame(), "booking_status").unwrap();
        assert_eq!(xa, xb);
    }

    #[test]
    fn test_intercept_and_select() {
        let mut encoder = OneHotEncoder::new();
        let (x, _) = encoder.fit_transform(&frame(), "booking_status").unwrap();
        let with_const = x.with_intercept();
        assert_eq!(with_const.columns[0], INTERCEPT);
        assert!(with_const.data.column(0).iter().all(|&v| v == 1.0));

        let picked = with_const
            .select(&["lead_time".to_string(), INTERCEPT.to_string()])
            .unwrap();
        assert_eq!(picked.data.row(1).to_vec(), vec![200.0, 1.0]);
    }

    #[test]
    fn test_reindex_fills_zeros() {
        let matrix = DesignMatrix::new(
            vec!["a".to_string()],
            ndarray::array![[1.0], [2.0]],
        )
        .unwrap();
        let out = reindex(&matrix, &["b".to_string(), "a".to_string()]);
        assert_eq!(out.data, ndarray::array![[0.0, 1.0], [0.0, 2.0]]);
    }
}
