//! Variance inflation factors

use crate::error::{CancelError, Result};
use crate::preprocessing::DesignMatrix;
use super::linalg::solve_least_squares;
use ndarray::{Array1, Axis};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VifRow {
    pub feature: String,
    pub vif: f64,
}

/// Regress each column on all the others and report `1 / (1 - R^2)`.
///
/// R^2 is centered when the other columns contain a constant, uncentered
/// otherwise. Near-collinear columns report large values. When the other
/// columns are themselves exactly collinear the regression has no unique
/// solution and the whole call fails with `ComputationError`.
pub fn variance_inflation_factors(x: &DesignMatrix) -> Result<Vec<VifRow>> {
    let k = x.ncols();
    if k < 2 {
        return Err(CancelError::ValidationError(
            "variance inflation needs at least two columns".to_string(),
        ));
    }

    let constant: Vec<bool> = (0..k).map(|j| is_constant(&x.data.column(j).to_owned())).collect();

    (0..k)
        .map(|target| {
            let others: Vec<usize> = (0..k).filter(|&j| j != target).collect();
            let regressors = x.data.select(Axis(1), &others);
            let response = x.data.column(target).to_owned();

            let beta = solve_least_squares(&regressors, &response).ok_or_else(|| {
                CancelError::ComputationError(format!(
                    "singular regressors when explaining '{}'",
                    x.columns[target]
                ))
            })?;
            let residual = &response - &regressors.dot(&beta);
            let ss_res = residual.mapv(|r| r * r).sum();

            let centered = others.iter().any(|&j| constant[j]);
            let ss_tot = if centered {
                let mean = response.mean().unwrap_or(0.0);
                response.mapv(|v| (v - mean) * (v - mean)).sum()
            } else {
                response.mapv(|v| v * v).sum()
            };

            let r2 = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };
            let vif = if r2 >= 1.0 { f64::INFINITY } else { 1.0 / (1.0 - r2) };
            Ok(VifRow {
                feature: x.columns[target].clone(),
                vif,
            })
        })
        .collect()
}

fn is_constant(column: &Array1<f64>) -> bool {
    match column.first() {
        Some(&first) => first != 0.0 && column.iter().all(|&v| v == first),
        None => false,
    }
}
