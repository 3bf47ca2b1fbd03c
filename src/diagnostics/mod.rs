//! Regression assumption diagnostics.
//!
//! This module provides the statistics behind each assumption check:
//!
//! - **Correlation**: Pearson matrix and target-correlation screening
//! - **Rainbow**: F test of linearity comparing a central subset with the full fit
//! - **Normality**: Q-Q coordinates and the Jarque-Bera test
//! - **Breusch-Pagan**: Lagrange multiplier test for heteroscedasticity
//! - **VIF**: Variance Inflation Factor for multicollinearity detection
//! - **Residuals**: Durbin-Watson statistic
//!
//! # Example
//!
//! ```rust,ignore
//! use lm_diagnostics::diagnostics::{high_vif_features, vif_scores};
//!
//! let scores = vif_scores(df.feature_names(), &df.feature_matrix())?;
//! let collinear = high_vif_features(&scores, 5.0);
//! ```

mod breusch_pagan;
mod correlation;
mod normality;
mod rainbow;
mod residuals;
mod vif;

use crate::core::{FrameError, OptionsError};
use crate::solvers::RegressionError;
use thiserror::Error;

pub use breusch_pagan::{breusch_pagan, BreuschPagan, BreuschPaganOptions};
pub use correlation::{
    pearson, split_by_threshold, CorrelationMatrix, CorrelationSplit, FeatureCorrelation,
};
pub use normality::{jarque_bera, qq_points, JarqueBera, QqLine, QqOptions, QqPoints};
pub use rainbow::{rainbow_test, RainbowOptions, RainbowOptionsBuilder, RainbowTest};
pub use residuals::{durbin_watson, response_residuals};
pub use vif::{high_vif_features, variance_inflation_factor, vif_scores, VifScore};

/// Errors raised by diagnostic tests.
#[derive(Debug, Error)]
pub enum DiagnosticError {
    #[error("insufficient observations: need at least {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    #[error("dimension mismatch: expected {expected} rows, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("test requires at least one regressor")]
    NoRegressors,

    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error(transparent)]
    InvalidOptions(#[from] OptionsError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("auxiliary regression failed: {0}")]
    Regression(#[from] RegressionError),
}
