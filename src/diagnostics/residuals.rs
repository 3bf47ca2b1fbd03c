//! Residual-based statistics.

use super::DiagnosticError;
use faer::Col;

/// Residuals `y - ŷ` recomputed from an observed response and fitted values.
pub fn response_residuals(observed: &[f64], fitted: &Col<f64>) -> Result<Col<f64>, DiagnosticError> {
    if observed.len() != fitted.nrows() {
        return Err(DiagnosticError::DimensionMismatch {
            expected: fitted.nrows(),
            got: observed.len(),
        });
    }
    Ok(Col::from_fn(observed.len(), |i| observed[i] - fitted[i]))
}

/// Durbin-Watson statistic: `Σ(e_t - e_{t-1})² / Σe_t²`.
///
/// Near 2 for uncorrelated residuals, towards 0 for positive and towards 4
/// for negative first-order autocorrelation. NaN when all residuals are zero.
pub fn durbin_watson(residuals: &Col<f64>) -> f64 {
    let n = residuals.nrows();
    let ss: f64 = residuals.iter().map(|&e| e * e).sum();
    if ss == 0.0 {
        return f64::NAN;
    }

    let diff: f64 = (1..n)
        .map(|t| (residuals[t] - residuals[t - 1]).powi(2))
        .sum();
    diff / ss
}
