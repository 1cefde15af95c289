//! Maximum-likelihood logistic regression with Wald inference
//!
//! The design matrix is used as given: no intercept is added implicitly,
//! callers prepend a `const` column when they want one. Parameters start at
//! zero and follow Newton-Raphson steps on the log-likelihood until every
//! parameter moves by at most `tol`.

use crate::error::{CancelError, Result};
use crate::preprocessing::DesignMatrix;
use super::config::LogitConfig;
use super::linalg::{cholesky_solve, matrix_inverse};
use super::models::Classifier;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Two-sided 97.5% standard normal quantile
const Z_975: f64 = 1.959_963_984_540_054;

/// One row of the coefficient summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientRow {
    pub name: String,
    pub coef: f64,
    pub std_err: f64,
    pub z: f64,
    pub p_value: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

/// Multiplicative effect of a unit change in a predictor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsRow {
    pub name: String,
    pub odds_ratio: f64,
    /// `(odds_ratio - 1) * 100`
    pub change_pct: f64,
}

/// Fitted logit model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogitModel {
    pub features: Vec<String>,
    pub params: Array1<f64>,
    pub covariance: Array2<f64>,
    pub std_errors: Array1<f64>,
    /// Log-likelihood at the fitted parameters
    pub llf: f64,
    /// Log-likelihood of the intercept-only model
    pub llnull: f64,
    pub n_obs: usize,
    pub iterations: usize,
}

impl LogitModel {
    /// Fit on a named design matrix and a 0/1 target
    pub fn fit(x: &DesignMatrix, y: &Array1<f64>, config: &LogitConfig) -> Result<Self> {
        let (n, k) = x.data.dim();
        if n != y.len() {
            return Err(CancelError::ShapeError {
                expected: format!("y length = {}", n),
                actual: format!("y length = {}", y.len()),
            });
        }
        if k == 0 {
            return Err(CancelError::InvalidParameter {
                name: "features".to_string(),
                value: "[]".to_string(),
                reason: "at least one column is required".to_string(),
            });
        }
        if let Some(bad) = y.iter().find(|&&v| v != 0.0 && v != 1.0) {
            return Err(CancelError::DataError(format!(
                "logit target must be 0/1, found {}",
                bad
            )));
        }

        let data = &x.data;
        let mut beta = Array1::<f64>::zeros(k);
        let mut converged = false;
        let mut iterations = 0;
        let mut last_step = Array1::<f64>::zeros(k);

        while iterations < config.max_iter {
            iterations += 1;

            let mu = data.dot(&beta).mapv(sigmoid);
            let gradient = data.t().dot(&(y - &mu));
            let information = weighted_gram(data, &mu);

            let step = cholesky_solve(&information, &gradient)
                .or_else(|| matrix_inverse(&information).map(|inv| inv.dot(&gradient)))
                .ok_or_else(|| {
                    CancelError::ComputationError(format!(
                        "singular information matrix at iteration {}",
                        iterations
                    ))
                })?;

            beta += &step;
            if beta.iter().any(|v| !v.is_finite()) {
                return Err(CancelError::ComputationError(
                    "non-finite parameter estimate".to_string(),
                ));
            }

            let fitted = data.dot(&beta).mapv(sigmoid);
            if perfectly_predicted(&fitted, y) {
                return Err(CancelError::PerfectSeparation { iterations });
            }

            if step.iter().all(|d| d.abs() <= config.tol) {
                converged = true;
                break;
            }
            last_step = step;
        }

        if !converged {
            // Quasi-separated columns keep taking the largest steps
            let drifting = last_step
                .iter()
                .enumerate()
                .fold(0, |best, (i, d)| if d.abs() > last_step[best].abs() { i } else { best });
            return Err(CancelError::ConvergenceError {
                iterations,
                column: x.columns[drifting].clone(),
            });
        }

        let eta = data.dot(&beta);
        let mu = eta.mapv(sigmoid);
        let covariance = matrix_inverse(&weighted_gram(data, &mu)).ok_or_else(|| {
            CancelError::ComputationError("singular information matrix at optimum".to_string())
        })?;
        let variances = covariance.diag().to_owned();
        if variances.iter().any(|&v| !(v > 0.0) || !v.is_finite()) {
            return Err(CancelError::ComputationError(
                "covariance matrix has a non-positive diagonal".to_string(),
            ));
        }

        let llf = eta
            .iter()
            .zip(y.iter())
            .map(|(&e, &t)| t * e - softplus(e))
            .sum();

        debug!(features = k, iterations, llf, "Logit converged");

        Ok(Self {
            features: x.columns.clone(),
            params: beta,
            covariance,
            std_errors: variances.mapv(f64::sqrt),
            llf,
            llnull: null_log_likelihood(y),
            n_obs: n,
            iterations,
        })
    }

    pub fn n_params(&self) -> usize {
        self.params.len()
    }

    pub fn z_values(&self) -> Array1<f64> {
        &self.params / &self.std_errors
    }

    pub fn p_values(&self) -> Array1<f64> {
        self.z_values().mapv(two_sided_p)
    }

    pub fn p_value(&self, name: &str) -> Option<f64> {
        let idx = self.features.iter().position(|f| f == name)?;
        Some(two_sided_p(self.params[idx] / self.std_errors[idx]))
    }

    pub fn coefficient(&self, name: &str) -> Option<f64> {
        let idx = self.features.iter().position(|f| f == name)?;
        Some(self.params[idx])
    }

    /// McFadden's pseudo R-squared
    pub fn pseudo_r2(&self) -> f64 {
        if self.llnull == 0.0 {
            return 0.0;
        }
        1.0 - self.llf / self.llnull
    }

    pub fn aic(&self) -> f64 {
        -2.0 * self.llf + 2.0 * self.n_params() as f64
    }

    pub fn bic(&self) -> f64 {
        -2.0 * self.llf + self.n_params() as f64 * (self.n_obs as f64).ln()
    }

    /// Likelihood-ratio statistic against the intercept-only model
    pub fn lr_statistic(&self) -> f64 {
        2.0 * (self.llf - self.llnull)
    }

    pub fn summary(&self) -> Vec<CoefficientRow> {
        self.features
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let coef = self.params[i];
                let se = self.std_errors[i];
                let z = coef / se;
                CoefficientRow {
                    name: name.clone(),
                    coef,
                    std_err: se,
                    z,
                    p_value: two_sided_p(z),
                    ci_lower: coef - Z_975 * se,
                    ci_upper: coef + Z_975 * se,
                }
            })
            .collect()
    }

    pub fn odds(&self) -> Vec<OddsRow> {
        self.features
            .iter()
            .zip(self.params.iter())
            .map(|(name, &coef)| {
                let odds_ratio = coef.exp();
                OddsRow {
                    name: name.clone(),
                    odds_ratio,
                    change_pct: (odds_ratio - 1.0) * 100.0,
                }
            })
            .collect()
    }
}

impl Classifier for LogitModel {
    fn feature_names(&self) -> &[String] {
        &self.features
    }

    fn predict_proba(&self, x: &DesignMatrix) -> Result<Array1<f64>> {
        let aligned = x.select(&self.features)?;
        Ok(aligned.data.dot(&self.params).mapv(sigmoid))
    }
}

/// `X^T diag(mu (1 - mu)) X`
fn weighted_gram(x: &Array2<f64>, mu: &Array1<f64>) -> Array2<f64> {
    let w = mu.mapv(|p| p * (1.0 - p));
    let xw = x * &w.insert_axis(Axis(1));
    x.t().dot(&xw)
}

/// Fitted probabilities indistinguishable from the labels
fn perfectly_predicted(fitted: &Array1<f64>, y: &Array1<f64>) -> bool {
    fitted
        .iter()
        .zip(y.iter())
        .all(|(&p, &t)| (p - t).abs() <= 1e-8 + 1e-5 * t.abs())
}

fn null_log_likelihood(y: &Array1<f64>) -> f64 {
    let n = y.len() as f64;
    let p = y.sum() / n;
    if p <= 0.0 || p >= 1.0 {
        return 0.0;
    }
    n * (p * p.ln() + (1.0 - p) * (1.0 - p).ln())
}

pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^z)` without overflow
fn softplus(z: f64) -> f64 {
    z.max(0.0) + (-z.abs()).exp().ln_1p()
}

/// Complementary error function for x >= 0 (Abramowitz and Stegun 7.1.26)
fn erfc(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let t = 1.0 / (1.0 + p * x);
    (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp()
}

/// Two-sided standard normal tail probability
pub fn two_sided_p(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    erfc(z.abs() / std::f64::consts::SQRT_2).min(1.0)
}
