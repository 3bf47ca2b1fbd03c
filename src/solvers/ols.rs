//! Ordinary least squares via column-pivoted QR.

use crate::core::{Inference, RegressionOptions, RegressionOptionsBuilder, RegressionResult};
use crate::inference::CoefficientInference;
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use crate::utils::{center_columns, center_vector, detect_constant_columns};
use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use std::f64::consts::PI;

/// Ordinary least squares estimator.
///
/// With an intercept the design and response are centered before the QR
/// solve and the intercept is recovered from the means. Columns that are
/// constant, or linear combinations of earlier pivots, are aliased: their
/// coefficient is NaN and they are ignored for prediction.
///
/// ```rust,ignore
/// use lm_diagnostics::solvers::{FittedRegressor, OlsRegressor, Regressor};
/// use faer::{Col, Mat};
///
/// let x = Mat::from_fn(100, 2, |i, j| (i * (j + 1)) as f64 % 7.0);
/// let y = Col::from_fn(100, |i| 1.0 + 0.5 * x[(i, 0)]);
///
/// let fitted = OlsRegressor::builder().build().fit(&x, &y)?;
/// println!("R² = {}", fitted.r_squared());
/// ```
#[derive(Debug, Clone)]
pub struct OlsRegressor {
    options: RegressionOptions,
}

impl OlsRegressor {
    pub fn new(options: RegressionOptions) -> Self {
        Self { options }
    }

    pub fn builder() -> OlsRegressorBuilder {
        OlsRegressorBuilder::default()
    }

    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }
}

/// Estimates from the QR solve, before any statistics are attached.
struct Solution {
    coefficients: Col<f64>,
    intercept: Option<f64>,
    aliased: Vec<bool>,
    rank: usize,
}

impl Solution {
    fn n_parameters(&self) -> usize {
        self.rank + usize::from(self.intercept.is_some())
    }

    fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        Col::from_fn(x.nrows(), |i| {
            (0..x.ncols())
                .filter(|&j| !self.aliased[j])
                .fold(self.intercept.unwrap_or(0.0), |acc, j| {
                    acc + x[(i, j)] * self.coefficients[j]
                })
        })
    }
}

impl Regressor for OlsRegressor {
    type Fitted = FittedOls;

    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        self.options.validate()?;
        self.check_inputs(x, y)?;

        let solution = if self.options.with_intercept {
            self.solve_centered(x, y)
        } else {
            self.solve_through_origin(x, y)?
        };

        if solution.aliased.contains(&true) {
            tracing::warn!(
                rank = solution.rank,
                n_features = x.ncols(),
                "design matrix is rank deficient, aliased coefficients set to NaN"
            );
        }

        let fitted_values = solution.predict(x);
        let residuals = Col::from_fn(y.nrows(), |i| y[i] - fitted_values[i]);
        let result = self.assemble(x, y, solution, residuals, fitted_values);

        tracing::debug!(
            n_observations = result.n_observations,
            rank = result.rank,
            r_squared = result.r_squared,
            "fitted OLS model"
        );

        Ok(FittedOls {
            options: self.options.clone(),
            result,
        })
    }
}

impl OlsRegressor {
    fn check_inputs(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<(), RegressionError> {
        let n = x.nrows();
        if n != y.nrows() {
            return Err(RegressionError::DimensionMismatch {
                x_rows: n,
                y_len: y.nrows(),
            });
        }

        // An exact fit (n == p) is allowed and leaves no residual df.
        let needed = (x.ncols() + usize::from(self.options.with_intercept)).max(2);
        if n < needed {
            return Err(RegressionError::InsufficientObservations { needed, got: n });
        }

        let finite_x = (0..x.ncols()).all(|j| (0..n).all(|i| x[(i, j)].is_finite()));
        if !finite_x || !y.iter().all(|v| v.is_finite()) {
            return Err(RegressionError::NumericalError(
                "design matrix or response contains non-finite values".into(),
            ));
        }
        Ok(())
    }

    fn solve_centered(&self, x: &Mat<f64>, y: &Col<f64>) -> Solution {
        let constant = detect_constant_columns(x, self.options.rank_tolerance);
        let (xc, x_means) = center_columns(x);
        let (yc, y_mean) = center_vector(y);

        let (coefficients, aliased, rank) = self.pivoted_qr_solve(&xc, &yc, constant);
        let intercept = (0..x.ncols())
            .filter(|&j| !aliased[j])
            .fold(y_mean, |b0, j| b0 - x_means[j] * coefficients[j]);

        Solution {
            coefficients,
            intercept: Some(intercept),
            aliased,
            rank,
        }
    }

    fn solve_through_origin(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Solution, RegressionError> {
        let tol = self.options.rank_tolerance;
        if (0..x.ncols()).all(|j| (0..x.nrows()).all(|i| x[(i, j)].abs() < tol)) {
            return Err(RegressionError::AllFeaturesConstant);
        }
        // A constant column is a valid regressor here.
        let (coefficients, aliased, rank) = self.pivoted_qr_solve(x, y, vec![false; x.ncols()]);
        Ok(Solution {
            coefficients,
            intercept: None,
            aliased,
            rank,
        })
    }

    /// Least squares on `x`, dropping columns pre-flagged in `aliased` and
    /// those whose pivoted R diagonal falls under the relative tolerance.
    fn pivoted_qr_solve(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
        mut aliased: Vec<bool>,
    ) -> (Col<f64>, Vec<bool>, usize) {
        let p = x.ncols();
        if p == 0 {
            return (Col::zeros(0), aliased, 0);
        }

        let qr = x.col_piv_qr();
        let r = qr.R();
        // position[j] = pivoted position of original column j
        let position = qr.P().arrays().0.to_vec();

        let scale = r[(0, 0)].abs().max(1.0);
        let rank = (0..p.min(x.nrows()))
            .take_while(|&i| r[(i, i)].abs() > self.options.rank_tolerance * scale)
            .count();

        for j in 0..p {
            aliased[j] |= position[j] >= rank;
        }
        if rank == 0 {
            return (Col::from_fn(p, |_| f64::NAN), vec![true; p], 0);
        }

        let qty = qr.compute_Q().transpose() * y;
        let mut beta = vec![0.0; rank];
        for i in (0..rank).rev() {
            let tail: f64 = ((i + 1)..rank).map(|k| r[(i, k)] * beta[k]).sum();
            beta[i] = (qty[i] - tail) / r[(i, i)];
        }

        let coefficients = Col::from_fn(p, |j| if aliased[j] { f64::NAN } else { beta[position[j]] });
        (coefficients, aliased, rank)
    }

    fn assemble(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
        solution: Solution,
        residuals: Col<f64>,
        fitted_values: Col<f64>,
    ) -> RegressionResult {
        let n = y.nrows();
        let has_intercept = solution.intercept.is_some();
        let n_parameters = solution.n_parameters();
        let fit = GoodnessOfFit::compute(y, &residuals, has_intercept, n_parameters);

        let inference = if self.options.compute_inference {
            self.inference(x, &solution, fit.mse, n - n_parameters)
        } else {
            None
        };

        RegressionResult {
            coefficients: solution.coefficients,
            intercept: solution.intercept,
            residuals,
            fitted_values,
            rank: solution.rank,
            n_parameters,
            n_observations: n,
            aliased: solution.aliased,
            r_squared: fit.r_squared,
            adj_r_squared: fit.adj_r_squared,
            mse: fit.mse,
            f_statistic: fit.f_statistic,
            f_pvalue: fit.f_pvalue,
            log_likelihood: fit.log_likelihood,
            aic: fit.aic,
            bic: fit.bic,
            confidence_level: self.options.confidence_level,
            inference,
        }
    }

    fn inference(&self, x: &Mat<f64>, solution: &Solution, mse: f64, df: usize) -> Option<Inference> {
        if df == 0 || !mse.is_finite() {
            return None;
        }
        CoefficientInference::compute(
            x,
            &solution.coefficients,
            solution.intercept,
            &solution.aliased,
            mse,
            df,
            self.options.confidence_level,
        )
        .map_err(|reason| tracing::debug!(reason, "skipping coefficient inference"))
        .ok()
    }
}

/// Summary statistics derived from the residuals alone.
struct GoodnessOfFit {
    r_squared: f64,
    adj_r_squared: f64,
    mse: f64,
    f_statistic: f64,
    f_pvalue: f64,
    log_likelihood: f64,
    aic: f64,
    bic: f64,
}

impl GoodnessOfFit {
    fn compute(y: &Col<f64>, residuals: &Col<f64>, has_intercept: bool, k: usize) -> Self {
        let n = y.nrows();
        let nf = n as f64;

        // Centered TSS with an intercept, uncentered otherwise.
        let center = if has_intercept {
            y.iter().sum::<f64>() / nf
        } else {
            0.0
        };
        let tss: f64 = y.iter().map(|&v| (v - center).powi(2)).sum();
        let rss: f64 = residuals.iter().map(|&e| e * e).sum();

        let r_squared = match (tss > 0.0, rss < 1e-10) {
            (true, _) => (1.0 - rss / tss).clamp(0.0, 1.0),
            (false, true) => 1.0,
            (false, false) => 0.0,
        };

        let df_resid = (n - k) as f64;
        let df_total = (n - usize::from(has_intercept)) as f64;
        let df_model = (k - usize::from(has_intercept)) as f64;

        let adj_r_squared = if df_resid > 0.0 && df_total > 0.0 {
            1.0 - (1.0 - r_squared) * df_total / df_resid
        } else {
            f64::NAN
        };
        let mse = if df_resid > 0.0 { rss / df_resid } else { f64::NAN };

        let explained = tss - rss;
        let f_statistic = if df_model <= 0.0 || df_resid <= 0.0 {
            f64::NAN
        } else if mse > 0.0 {
            (explained / df_model) / mse
        } else if explained > 0.0 {
            f64::INFINITY
        } else {
            f64::NAN
        };
        let f_pvalue = if f_statistic == f64::INFINITY {
            0.0
        } else if f_statistic.is_finite() {
            FisherSnedecor::new(df_model, df_resid)
                .map_or(f64::NAN, |d| d.sf(f_statistic).clamp(0.0, 1.0))
        } else {
            f64::NAN
        };

        let sigma2 = rss / nf;
        let log_likelihood = if sigma2 > 0.0 {
            -0.5 * nf * (1.0 + (2.0 * PI).ln() + sigma2.ln())
        } else {
            f64::NAN
        };
        let kf = k as f64;
        let (aic, bic) = if log_likelihood.is_finite() {
            (2.0 * kf - 2.0 * log_likelihood, kf * nf.ln() - 2.0 * log_likelihood)
        } else {
            (f64::NAN, f64::NAN)
        };

        Self {
            r_squared,
            adj_r_squared,
            mse,
            f_statistic,
            f_pvalue,
            log_likelihood,
            aic,
            bic,
        }
    }
}

/// Result of [`OlsRegressor::fit`].
#[derive(Debug, Clone)]
pub struct FittedOls {
    options: RegressionOptions,
    result: RegressionResult,
}

impl FittedOls {
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }
}

impl FittedRegressor for FittedOls {
    fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        let b = &self.result.coefficients;
        Col::from_fn(x.nrows(), |i| {
            (0..x.ncols())
                .filter(|&j| !self.result.aliased[j] && b[j].is_finite())
                .fold(self.result.intercept.unwrap_or(0.0), |acc, j| acc + x[(i, j)] * b[j])
        })
    }

    fn result(&self) -> &RegressionResult {
        &self.result
    }
}

/// Builder for [`OlsRegressor`]. Options are validated at fit time.
#[derive(Debug, Clone, Default)]
pub struct OlsRegressorBuilder {
    builder: RegressionOptionsBuilder,
}

impl OlsRegressorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_intercept(mut self, include: bool) -> Self {
        self.builder = self.builder.with_intercept(include);
        self
    }

    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.builder = self.builder.compute_inference(compute);
        self
    }

    pub fn confidence_level(mut self, level: f64) -> Self {
        self.builder = self.builder.confidence_level(level);
        self
    }

    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.builder = self.builder.rank_tolerance(tol);
        self
    }

    pub fn build(self) -> OlsRegressor {
        OlsRegressor::new(self.builder.build_unchecked())
    }
}
