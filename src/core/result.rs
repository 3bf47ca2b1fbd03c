//! Output of an OLS fit.

use faer::Col;

/// Standard error, t statistic, p-value and confidence interval of one
/// parameter. Aliased parameters hold NaN throughout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterInference {
    pub std_error: f64,
    pub t_statistic: f64,
    /// Two-sided p-value of `H0: parameter = 0`.
    pub p_value: f64,
    /// `(lower, upper)` at the fit's confidence level.
    pub conf_interval: (f64, f64),
}

impl ParameterInference {
    pub(crate) fn undefined() -> Self {
        Self {
            std_error: f64::NAN,
            t_statistic: f64::NAN,
            p_value: f64::NAN,
            conf_interval: (f64::NAN, f64::NAN),
        }
    }
}

/// Inference for every parameter of a fit.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    /// Present when the model has an intercept.
    pub intercept: Option<ParameterInference>,
    /// One entry per design column, in column order.
    pub coefficients: Vec<ParameterInference>,
}

/// Coefficients, residuals and goodness-of-fit statistics of an OLS fit.
#[derive(Debug, Clone)]
pub struct RegressionResult {
    /// One coefficient per design column. Aliased columns hold NaN.
    pub coefficients: Col<f64>,
    pub intercept: Option<f64>,
    /// `y - ŷ`.
    pub residuals: Col<f64>,
    pub fitted_values: Col<f64>,

    /// Numerical rank of the (centered) design matrix.
    pub rank: usize,
    /// Estimated parameters, intercept included.
    pub n_parameters: usize,
    pub n_observations: usize,
    /// Columns dropped as linear combinations of earlier ones.
    pub aliased: Vec<bool>,

    /// R², centered when the model has an intercept.
    pub r_squared: f64,
    pub adj_r_squared: f64,
    /// Residual variance estimate `RSS / (n - p)`.
    pub mse: f64,
    pub f_statistic: f64,
    pub f_pvalue: f64,
    /// Gaussian log-likelihood at the ML variance `RSS / n`.
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,

    pub confidence_level: f64,
    /// `None` when not requested or when the residual degrees of freedom
    /// are exhausted.
    pub inference: Option<Inference>,
}

impl RegressionResult {
    /// Residual degrees of freedom (n - p).
    pub fn residual_df(&self) -> usize {
        self.n_observations.saturating_sub(self.n_parameters)
    }

    /// Model degrees of freedom (p - 1 if intercept, else p).
    pub fn model_df(&self) -> usize {
        self.n_parameters
            .saturating_sub(usize::from(self.intercept.is_some()))
    }

    pub fn has_aliased(&self) -> bool {
        self.aliased.contains(&true)
    }

    /// Residual sum of squares.
    pub fn rss(&self) -> f64 {
        self.residuals.iter().map(|&r| r * r).sum()
    }
}
