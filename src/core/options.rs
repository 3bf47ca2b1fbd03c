//! Fit options and the option validation shared by every check.

use thiserror::Error;

/// How an OLS fit is set up.
#[derive(Debug, Clone)]
pub struct RegressionOptions {
    /// Add an intercept column (default `true`).
    pub with_intercept: bool,
    /// Attach standard errors, t tests and intervals (default `true`).
    pub compute_inference: bool,
    /// Coverage of the coefficient intervals, in `(0, 1)`.
    pub confidence_level: f64,
    /// Pivots of R below `rank_tolerance * |R[0,0]|` mark a column as aliased.
    pub rank_tolerance: f64,
}

impl Default for RegressionOptions {
    fn default() -> Self {
        Self {
            with_intercept: true,
            compute_inference: true,
            confidence_level: 0.95,
            rank_tolerance: 1e-10,
        }
    }
}

/// A parameter outside its admissible range.
#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("confidence_level must be in (0, 1), got {0}")]
    InvalidConfidenceLevel(f64),
    #[error("rank_tolerance must be positive, got {0}")]
    InvalidRankTolerance(f64),
    #[error("threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),
    #[error("frac must be in (0, 1), got {0}")]
    InvalidFraction(f64),
    #[error("plot dimensions must be positive, got {width}x{height}")]
    InvalidPlotSize { width: u32, height: u32 },
}

impl RegressionOptions {
    pub fn builder() -> RegressionOptionsBuilder {
        RegressionOptionsBuilder::default()
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        let level = self.confidence_level;
        if !(level > 0.0 && level < 1.0) {
            return Err(OptionsError::InvalidConfidenceLevel(level));
        }
        let tol = self.rank_tolerance;
        if !(tol > 0.0 && tol.is_finite()) {
            return Err(OptionsError::InvalidRankTolerance(tol));
        }
        Ok(())
    }
}

/// Builder for [`RegressionOptions`].
#[derive(Debug, Clone, Default)]
pub struct RegressionOptionsBuilder {
    options: RegressionOptions,
}

impl RegressionOptionsBuilder {
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.options.with_intercept = include;
        self
    }

    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.options.compute_inference = compute;
        self
    }

    pub fn confidence_level(mut self, level: f64) -> Self {
        self.options.confidence_level = level;
        self
    }

    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.options.rank_tolerance = tol;
        self
    }

    pub fn build(self) -> Result<RegressionOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Skips validation; [`OlsRegressor`](crate::solvers::OlsRegressor)
    /// validates again before fitting.
    pub fn build_unchecked(self) -> RegressionOptions {
        self.options
    }
}

/// Validate a correlation threshold: `0 < th <= 1`.
pub fn validate_threshold(threshold: f64) -> Result<(), OptionsError> {
    if threshold > 0.0 && threshold <= 1.0 {
        Ok(())
    } else {
        Err(OptionsError::InvalidThreshold(threshold))
    }
}
