//! Rainbow test for linearity.
//!
//! The model is refit on a central subset of the observations. If the
//! relationship is linear, the subset fit should not be much better than the
//! full fit; a large F statistic (low p-value) signals non-linearity.

use super::DiagnosticError;
use crate::core::{OptionsError, RegressionOptions};
use crate::solvers::{FittedRegressor, OlsRegressor, Regressor};
use crate::utils::row_range;
use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use std::fmt;

/// Options for [`rainbow_test`].
#[derive(Debug, Clone, PartialEq)]
pub struct RainbowOptions {
    /// Fraction of observations in the central subset (default: 0.5).
    pub frac: f64,
    /// Variable to order observations by before taking the subset.
    /// `None` keeps row order.
    pub order_by: Option<String>,
}

impl Default for RainbowOptions {
    fn default() -> Self {
        Self {
            frac: 0.5,
            order_by: None,
        }
    }
}

impl RainbowOptions {
    pub fn builder() -> RainbowOptionsBuilder {
        RainbowOptionsBuilder::default()
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(self.frac > 0.0 && self.frac < 1.0) {
            return Err(OptionsError::InvalidFraction(self.frac));
        }
        Ok(())
    }
}

/// Builder for `RainbowOptions`.
#[derive(Debug, Clone, Default)]
pub struct RainbowOptionsBuilder {
    options: RainbowOptions,
}

impl RainbowOptionsBuilder {
    pub fn frac(mut self, frac: f64) -> Self {
        self.options.frac = frac;
        self
    }

    pub fn order_by(mut self, name: impl Into<String>) -> Self {
        self.options.order_by = Some(name.into());
        self
    }

    pub fn build(self) -> Result<RainbowOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }
}

/// Result of the rainbow test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainbowTest {
    pub statistic: f64,
    pub p_value: f64,
    /// Rows in the central subset.
    pub n_subset: usize,
    /// Numerator degrees of freedom (`n - n_subset`).
    pub df_num: usize,
    /// Denominator degrees of freedom (residual df of the subset fit).
    pub df_denom: usize,
}

impl fmt::Display for RainbowTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rainbow statistic: {}", self.statistic)?;
        writeln!(f, "Rainbow p-value: {}", self.p_value)
    }
}

/// Rainbow test of `y ~ x`.
///
/// `sort_key`, when given, holds one value per row; rows are stably ordered by
/// it before the central subset is taken.
pub fn rainbow_test(
    x: &Mat<f64>,
    y: &Col<f64>,
    regression: &RegressionOptions,
    options: &RainbowOptions,
    sort_key: Option<&[f64]>,
) -> Result<RainbowTest, DiagnosticError> {
    options.validate()?;

    let n = x.nrows();
    if y.nrows() != n {
        return Err(DiagnosticError::DimensionMismatch {
            expected: n,
            got: y.nrows(),
        });
    }

    let (x, y) = match sort_key {
        Some(key) => {
            if key.len() != n {
                return Err(DiagnosticError::DimensionMismatch {
                    expected: n,
                    got: key.len(),
                });
            }
            let mut order: Vec<usize> = (0..n).collect();
            order.sort_by(|&a, &b| key[a].total_cmp(&key[b]));
            (
                Mat::from_fn(n, x.ncols(), |i, j| x[(order[i], j)]),
                Col::from_fn(n, |i| y[order[i]]),
            )
        }
        None => (x.clone(), y.clone()),
    };

    let model = OlsRegressor::new(RegressionOptions {
        compute_inference: false,
        ..regression.clone()
    });
    let full = model.fit(&x, &y)?;

    let low = (0.5 * (1.0 - options.frac) * n as f64).ceil() as usize;
    let upp = ((low as f64 + options.frac * n as f64).floor() as usize).min(n);
    let n_mid = upp.saturating_sub(low);
    let n_params = full.result().n_parameters;

    if n_mid <= n_params {
        return Err(DiagnosticError::InsufficientObservations {
            needed: n_params + 1,
            got: n_mid,
        });
    }

    let (x_mid, y_mid) = row_range(&x, &y, low, upp);
    let mid = model.fit(&x_mid, &y_mid)?;

    let rss = full.result().rss();
    let rss_mid = mid.result().rss();
    let df_num = n - n_mid;
    let df_denom = mid.result().residual_df();
    if df_denom == 0 {
        return Err(DiagnosticError::InsufficientObservations {
            needed: n_params + 1,
            got: n_mid,
        });
    }

    let (statistic, p_value) = if rss_mid > 0.0 {
        let f = ((rss - rss_mid) / df_num as f64) / (rss_mid / df_denom as f64);
        let p = FisherSnedecor::new(df_num as f64, df_denom as f64)
            .map_or(f64::NAN, |d| d.sf(f.max(0.0)).clamp(0.0, 1.0));
        (f, p)
    } else if rss > 0.0 {
        // The subset is fit exactly while the full sample is not.
        (f64::INFINITY, 0.0)
    } else {
        (0.0, 1.0)
    };

    tracing::debug!(statistic, p_value, n_mid, df_num, df_denom, "rainbow test");

    Ok(RainbowTest {
        statistic,
        p_value,
        n_subset: n_mid,
        df_num,
        df_denom,
    })
}
