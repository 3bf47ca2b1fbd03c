//! Formula-based linear models.
//!
//! [`FittedModel`] ties an OLS fit to the formula and data it came from, so
//! that diagnostics can refit subsets or recover the design matrix.

mod fitted;
mod summary;

use crate::core::{FormulaError, FrameError};
use crate::solvers::RegressionError;
use thiserror::Error;

pub use fitted::{FittedModel, Params, INTERCEPT};
pub use summary::{CoefficientRow, Summary};

/// Errors raised while fitting or applying a [`FittedModel`].
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Formula(#[from] FormulaError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("model fit failed: {0}")]
    Regression(#[from] RegressionError),
}
