//! Exploratory analysis and assumption checks for linear regression.
//!
//! Screen features by their correlation with a target, fit an ordinary
//! least squares model from a formula and check the classical assumptions
//! behind it: linearity (rainbow test), normality of residuals (Q-Q plot),
//! homoscedasticity (Breusch-Pagan test) and independence of the features
//! (variance inflation factors). Plots are rendered to SVG strings.
//!
//! # Example
//!
//! ```rust,ignore
//! use lm_diagnostics::prelude::*;
//!
//! // Column 0 is the target
//! let df = DataFrame::new(vec![
//!     ("price", price),
//!     ("sqft", sqft),
//!     ("rooms", rooms),
//! ])?;
//!
//! let screen = screen_correlations(&df, 0.5)?;
//! let model = fit_model(&df)?;
//! let rainbow = check_linearity(&model)?;
//! let qq = check_normality(&model)?;
//! let bp = check_homoscedasticity(&model, &df)?;
//! let vif = check_independence(&df)?;
//! ```

pub mod core;
pub mod diagnostics;
pub mod inference;
pub mod model;
pub mod plot;
pub mod solvers;
pub mod utils;
pub mod workflow;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{
        DataFrame, Formula, FrameError, RegressionOptions, RegressionOptionsBuilder,
        RegressionResult,
    };
    pub use crate::diagnostics::{
        breusch_pagan, rainbow_test, variance_inflation_factor, BreuschPaganOptions,
        CorrelationMatrix, QqLine, QqOptions, RainbowOptions, RainbowTest, VifScore,
    };
    pub use crate::model::{FittedModel, Params};
    pub use crate::plot::{PlotConfig, Svg};
    pub use crate::solvers::{FittedRegressor, OlsRegressor, Regressor};
    pub use crate::workflow::{
        check_homoscedasticity, check_independence, check_linearity, check_normality,
        fit_formula, fit_model, screen_correlations, CorrelationScreen, HomoscedasticityCheck,
        WorkflowError,
    };
}

pub use crate::core::{DataFrame, Formula, RegressionOptions, RegressionResult};
pub use crate::model::FittedModel;
pub use crate::workflow::{
    check_homoscedasticity, check_independence, check_linearity, check_normality, fit_formula,
    fit_model, screen_correlations,
};
