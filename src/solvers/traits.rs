//! Estimator seams shared by the model layer and the diagnostics.

use crate::core::{OptionsError, RegressionResult};
use faer::{Col, Mat};
use thiserror::Error;

/// Reasons a least-squares fit can be refused.
#[derive(Debug, Error)]
pub enum RegressionError {
    #[error("dimension mismatch: X has {x_rows} rows but y has {y_len} elements")]
    DimensionMismatch { x_rows: usize, y_len: usize },

    #[error("insufficient observations: need at least {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    #[error("every feature is zero, nothing to regress on")]
    AllFeaturesConstant,

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),

    #[error("numerical error: {0}")]
    NumericalError(String),
}

/// An unfitted estimator. `fit` takes an `(n, p)` design and `n` responses.
pub trait Regressor {
    type Fitted: FittedRegressor;

    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError>;
}

/// A fitted estimator.
pub trait FittedRegressor {
    /// Predictions for a design with the same columns as the training one.
    fn predict(&self, x: &Mat<f64>) -> Col<f64>;

    fn result(&self) -> &RegressionResult;

    fn coefficients(&self) -> &Col<f64> {
        &self.result().coefficients
    }

    fn intercept(&self) -> Option<f64> {
        self.result().intercept
    }

    fn r_squared(&self) -> f64 {
        self.result().r_squared
    }
}
