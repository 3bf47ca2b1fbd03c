//! Breusch-Pagan test for heteroscedasticity.
//!
//! Squared residuals are regressed on `[1 | Z]`. Under the null hypothesis of
//! homoscedasticity the regressors carry no information about the residual
//! variance.

use super::DiagnosticError;
use crate::solvers::{FittedRegressor, OlsRegressor, Regressor};
use faer::{Col, Mat};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::fmt;

/// Options for [`breusch_pagan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreuschPaganOptions {
    /// Koenker's studentized statistic `n * R²` (default). When false the
    /// classic statistic `ESS / 2` on scaled squared residuals is used,
    /// which assumes normal errors.
    pub robust: bool,
}

impl Default for BreuschPaganOptions {
    fn default() -> Self {
        Self { robust: true }
    }
}

/// Result of the Breusch-Pagan test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreuschPagan {
    /// Lagrange multiplier statistic.
    pub lm: f64,
    /// p-value of `lm` under χ²(df).
    pub lm_p_value: f64,
    /// F statistic of the auxiliary regression.
    pub f_statistic: f64,
    /// p-value of the F statistic.
    pub f_p_value: f64,
    /// Degrees of freedom (regressors in the auxiliary regression).
    pub df: usize,
}

impl fmt::Display for BreuschPagan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Lagrange Multiplier p-value: {}", self.lm_p_value)?;
        writeln!(f, "F-statistic p-value: {}", self.f_p_value)
    }
}

/// Breusch-Pagan test of `residuals` against the columns of `exog`.
///
/// `exog` must not contain a constant column; the intercept is added here.
pub fn breusch_pagan(
    residuals: &Col<f64>,
    exog: &Mat<f64>,
    options: &BreuschPaganOptions,
) -> Result<BreuschPagan, DiagnosticError> {
    let n = residuals.nrows();

    if exog.nrows() != n {
        return Err(DiagnosticError::DimensionMismatch {
            expected: n,
            got: exog.nrows(),
        });
    }
    if exog.ncols() == 0 {
        return Err(DiagnosticError::NoRegressors);
    }
    if n <= exog.ncols() + 1 {
        return Err(DiagnosticError::InsufficientObservations {
            needed: exog.ncols() + 2,
            got: n,
        });
    }

    let squared = Col::from_fn(n, |i| residuals[i].powi(2));
    let sigma2 = squared.iter().sum::<f64>() / n as f64;

    let spread: f64 = squared.iter().map(|&s| (s - sigma2).powi(2)).sum();
    if spread <= 1e-24 * n as f64 * sigma2 * sigma2 {
        // Constant squared residuals: nothing for the regressors to explain.
        return Ok(BreuschPagan {
            lm: 0.0,
            lm_p_value: 1.0,
            f_statistic: 0.0,
            f_p_value: 1.0,
            df: exog.ncols(),
        });
    }

    let response = if options.robust {
        squared
    } else {
        Col::from_fn(n, |i| squared[i] / sigma2)
    };

    let aux = OlsRegressor::builder()
        .with_intercept(true)
        .compute_inference(false)
        .build()
        .fit(exog, &response)?;
    let result = aux.result();
    let df = result.model_df();

    let lm = if options.robust {
        n as f64 * result.r_squared
    } else {
        let mean = response.iter().sum::<f64>() / n as f64;
        let ess: f64 = result
            .fitted_values
            .iter()
            .map(|&f| (f - mean).powi(2))
            .sum();
        ess / 2.0
    };

    let lm_p_value = if df == 0 {
        1.0
    } else {
        ChiSquared::new(df as f64).map_or(f64::NAN, |d| d.sf(lm).clamp(0.0, 1.0))
    };

    // A constant auxiliary response gives no F statistic; no evidence against the null.
    let (f_statistic, f_p_value) = if result.f_pvalue.is_nan() {
        (0.0, 1.0)
    } else {
        (result.f_statistic, result.f_pvalue)
    };

    tracing::debug!(lm, lm_p_value, f_statistic, f_p_value, df, "Breusch-Pagan test");

    Ok(BreuschPagan {
        lm,
        lm_p_value,
        f_statistic,
        f_p_value,
        df,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wiggle(i: usize) -> f64 {
        ((i * 7919) % 17) as f64 / 17.0 - 0.5
    }

    #[test]
    fn test_constant_variance() {
        let n = 80;
        let x = Mat::from_fn(n, 1, |i, _| i as f64);
        let resid = Col::from_fn(n, |i| if i % 2 == 0 { 1.0 } else { -1.0 });

        let bp = breusch_pagan(&resid, &x, &BreuschPaganOptions::default()).unwrap();

        // Squared residuals are constant: nothing to explain.
        assert_eq!(bp.lm, 0.0);
        assert_eq!(bp.lm_p_value, 1.0);
        assert_eq!(bp.f_p_value, 1.0);
        assert_eq!(bp.df, 1);
    }

    #[test]
    fn test_growing_variance() {
        let n = 80;
        let x = Mat::from_fn(n, 1, |i, _| i as f64);
        let resid = Col::from_fn(n, |i| (1.0 + i as f64) * wiggle(i));

        let bp = breusch_pagan(&resid, &x, &BreuschPaganOptions::default()).unwrap();

        assert!(bp.lm_p_value < 0.01, "lm p = {}", bp.lm_p_value);
        assert!(bp.f_p_value < 0.01, "f p = {}", bp.f_p_value);
    }

    #[test]
    fn test_classic_statistic_in_range() {
        let n = 50;
        let x = Mat::from_fn(n, 2, |i, j| ((i + 3 * j) as f64 * 0.37).sin());
        let resid = Col::from_fn(n, wiggle);

        let bp = breusch_pagan(&resid, &x, &BreuschPaganOptions { robust: false }).unwrap();

        assert!(bp.lm >= 0.0);
        assert!((0.0..=1.0).contains(&bp.lm_p_value));
        assert!((0.0..=1.0).contains(&bp.f_p_value));
        assert_eq!(bp.df, 2);
    }

    #[test]
    fn test_shape_errors() {
        let resid = Col::from_fn(10, |i| i as f64);
        let x = Mat::from_fn(9, 1, |i, _| i as f64);
        assert!(matches!(
            breusch_pagan(&resid, &x, &BreuschPaganOptions::default()),
            Err(DiagnosticError::DimensionMismatch { .. })
        ));

        let empty: Mat<f64> = Mat::zeros(10, 0);
        assert!(matches!(
            breusch_pagan(&resid, &empty, &BreuschPaganOptions::default()),
            Err(DiagnosticError::NoRegressors)
        ));
    }
}
