//! Standard errors, t tests and confidence intervals for OLS parameters.

use crate::core::{Inference, ParameterInference};
use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Computes inference statistics for regression coefficients.
pub struct CoefficientInference;

impl CoefficientInference {
    /// Standard errors `sqrt(σ² · (X'X)⁻¹_jj)` of the coefficients, and of the
    /// intercept when `with_intercept` is set (the design is then `[1 | X]`).
    ///
    /// Aliased columns are left out of `X'X` and get NaN.
    pub fn standard_errors(
        x: &Mat<f64>,
        mse: f64,
        aliased: &[bool],
        with_intercept: bool,
    ) -> Result<(Option<f64>, Col<f64>), &'static str> {
        let diag = active_inverse_diagonal(x, aliased, with_intercept)?;
        let se = |d: f64| if mse * d >= 0.0 { (mse * d).sqrt() } else { f64::NAN };

        let intercept = with_intercept.then(|| se(diag[0]));
        let coefficients = Col::from_fn(x.ncols(), |j| se(diag[j + 1]));
        Ok((intercept, coefficients))
    }

    /// Full inference for an OLS fit with `df` residual degrees of freedom.
    #[allow(clippy::too_many_arguments)]
    pub fn compute(
        x: &Mat<f64>,
        coefficients: &Col<f64>,
        intercept: Option<f64>,
        aliased: &[bool],
        mse: f64,
        df: usize,
        confidence_level: f64,
    ) -> Result<Inference, &'static str> {
        if df == 0 {
            return Err("no residual degrees of freedom");
        }
        let t_dist = StudentsT::new(0.0, 1.0, df as f64).map_err(|_| "invalid t distribution")?;
        let t_crit = t_dist.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0);

        let (se_intercept, se) = Self::standard_errors(x, mse, aliased, intercept.is_some())?;

        let row = |estimate: f64, std_error: f64| {
            if !estimate.is_finite() || !std_error.is_finite() {
                return ParameterInference::undefined();
            }
            let t_statistic = if std_error > 0.0 {
                estimate / std_error
            } else {
                f64::NAN
            };
            let p_value = if t_statistic.is_nan() {
                f64::NAN
            } else {
                (2.0 * t_dist.sf(t_statistic.abs())).clamp(0.0, 1.0)
            };
            ParameterInference {
                std_error,
                t_statistic,
                p_value,
                conf_interval: (estimate - t_crit * std_error, estimate + t_crit * std_error),
            }
        };

        Ok(Inference {
            intercept: intercept
                .zip(se_intercept)
                .map(|(b0, s)| row(b0, s)),
            coefficients: (0..coefficients.nrows())
                .map(|j| row(coefficients[j], se[j]))
                .collect(),
        })
    }
}

/// Diagonal of `(X'X)^(-1)` over the non-aliased columns, laid out as
/// `[intercept, x_0, .., x_{p-1}]`. Aliased slots (and the intercept slot
/// when `with_intercept` is false) hold NaN.
fn active_inverse_diagonal(
    x: &Mat<f64>,
    aliased: &[bool],
    with_intercept: bool,
) -> Result<Vec<f64>, &'static str> {
    let active: Vec<usize> = (0..x.ncols()).filter(|&j| !aliased[j]).collect();
    let offset = usize::from(with_intercept);
    let size = active.len() + offset;

    if size == 0 {
        return Err("all columns are aliased");
    }

    let design = Mat::from_fn(x.nrows(), size, |i, k| {
        if k < offset {
            1.0
        } else {
            x[(i, active[k - offset])]
        }
    });
    let inv = invert_via_qr(&(design.transpose() * &design))?;

    let mut diag = vec![f64::NAN; x.ncols() + 1];
    if with_intercept {
        diag[0] = inv[(0, 0)];
    }
    for (k, &j) in active.iter().enumerate() {
        diag[j + 1] = inv[(k + offset, k + offset)];
    }
    Ok(diag)
}

/// Inverse of a square matrix using QR decomposition.
fn invert_via_qr(matrix: &Mat<f64>) -> Result<Mat<f64>, &'static str> {
    let n = matrix.nrows();

    let qr = matrix.qr();
    let q = qr.compute_Q();
    let r = qr.R();

    let scale = (0..n).map(|i| r[(i, i)].abs()).fold(1.0_f64, f64::max);
    if (0..n).any(|i| r[(i, i)].abs() < 1e-10 * scale) {
        return Err("cross-product matrix is singular");
    }

    // Back-substitute R · inv = Q' one column at a time.
    let qt = q.transpose();
    let mut inv = Mat::zeros(n, n);
    for col in 0..n {
        for i in (0..n).rev() {
            let tail: f64 = ((i + 1)..n).map(|j| r[(i, j)] * inv[(j, col)]).sum();
            inv[(i, col)] = (qt[(i, col)] - tail) / r[(i, i)];
        }
    }

    Ok(inv)
}
