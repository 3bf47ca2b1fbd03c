//! Variance inflation factors.

use super::DiagnosticError;
use crate::core::RegressionOptions;
use crate::solvers::{FittedRegressor, OlsRegressor, RegressionError, Regressor};
use crate::utils::detect_constant_columns;
use faer::{Col, Mat};
use std::fmt;

/// VIF of every column of `x`.
///
/// Column `j` is regressed (with intercept) on the remaining columns and
/// `VIF_j = 1 / (1 - R²_j)`. An exact linear combination of the other
/// columns scores `f64::INFINITY`, and so does a constant column, which is
/// collinear with the intercept. Otherwise, with fewer than two columns (or
/// three rows) every score is 1.
///
/// Non-finite values and failed auxiliary fits are returned as errors.
pub fn variance_inflation_factor(x: &Mat<f64>) -> Result<Col<f64>, DiagnosticError> {
    let (n, p) = (x.nrows(), x.ncols());
    if (0..p).any(|j| (0..n).any(|i| !x[(i, j)].is_finite())) {
        return Err(RegressionError::NumericalError(
            "feature matrix contains non-finite values".into(),
        )
        .into());
    }

    let constant = detect_constant_columns(x, RegressionOptions::default().rank_tolerance);
    let auxiliary = OlsRegressor::builder().compute_inference(false).build();

    let mut vif = Vec::with_capacity(p);
    for j in 0..p {
        let score = if constant[j] {
            f64::INFINITY
        } else if p < 2 || n < 3 {
            1.0
        } else {
            let others = Mat::from_fn(n, p - 1, |i, k| x[(i, k + usize::from(k >= j))]);
            let target = Col::from_fn(n, |i| x[(i, j)]);
            inflation(auxiliary.fit(&others, &target)?.r_squared())
        };
        vif.push(score);
    }

    Ok(Col::from_fn(p, |j| vif[j]))
}

fn inflation(r_squared: f64) -> f64 {
    let unexplained = 1.0 - r_squared;
    if unexplained <= 1e-14 {
        f64::INFINITY
    } else {
        (1.0 / unexplained).max(1.0)
    }
}

/// A feature's VIF.
#[derive(Debug, Clone, PartialEq)]
pub struct VifScore {
    pub vif: f64,
    pub feature: String,
}

impl VifScore {
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.vif > threshold
    }
}

impl fmt::Display for VifScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>12.6}  {}", self.vif, self.feature)
    }
}

/// VIF of each column of `x`, paired with `names` in column order.
///
/// These are centered VIFs: every auxiliary regression carries an
/// intercept. The uncentered variant, which regresses each column on the
/// others through the origin, reports different (usually larger) values
/// for the same data.
pub fn vif_scores<S: AsRef<str>>(
    names: &[S],
    x: &Mat<f64>,
) -> Result<Vec<VifScore>, DiagnosticError> {
    let vif = variance_inflation_factor(x)?;
    Ok(names
        .iter()
        .zip(vif.iter())
        .map(|(name, &vif)| VifScore {
            vif,
            feature: name.as_ref().to_string(),
        })
        .collect())
}

/// Features scoring above `threshold` (5 is the usual cut-off).
pub fn high_vif_features(scores: &[VifScore], threshold: f64) -> Vec<&str> {
    scores
        .iter()
        .filter(|s| s.exceeds(threshold))
        .map(|s| s.feature.as_str())
        .collect()
}
