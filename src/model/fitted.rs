//! Fitted OLS model bound to its formula.

use super::summary::Summary;
use super::ModelError;
use crate::core::{DataFrame, Formula, RegressionOptions, RegressionResult};
use crate::solvers::{FittedOls, FittedRegressor, OlsRegressor, Regressor};
use faer::{Col, Mat};
use std::fmt;

/// Name of the intercept entry in [`Params`].
pub const INTERCEPT: &str = "Intercept";

/// Estimated parameters keyed by name, intercept first.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    entries: Vec<(String, f64)>,
}

impl Params {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, v)| v)
    }

    pub fn intercept(&self) -> Option<f64> {
        self.get(INTERCEPT)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.entries.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
        for (name, value) in &self.entries {
            writeln!(f, "{name:<width$}  {value:>14.6}")?;
        }
        Ok(())
    }
}

/// An OLS fit of `formula` on a data frame.
///
/// The design matrix holds the term columns in formula order, without the
/// intercept column.
#[derive(Debug, Clone)]
pub struct FittedModel {
    formula: Formula,
    design: Mat<f64>,
    response: Col<f64>,
    options: RegressionOptions,
    fit: FittedOls,
}

impl FittedModel {
    /// Fit `formula` on `df`. The formula's intercept flag overrides
    /// `options.with_intercept`.
    pub fn fit(
        df: &DataFrame,
        formula: &Formula,
        options: RegressionOptions,
    ) -> Result<Self, ModelError> {
        formula.check_against(df)?;

        let design = df.matrix_of(formula.terms())?;
        let y = df.column(formula.response())?;
        let response = Col::from_fn(y.len(), |i| y[i]);

        let options = RegressionOptions {
            with_intercept: formula.has_intercept(),
            ..options
        };
        let fit = OlsRegressor::new(options.clone()).fit(&design, &response)?;

        tracing::debug!(
            formula = %formula,
            r_squared = fit.result().r_squared,
            "fitted formula model"
        );

        Ok(Self {
            formula: formula.clone(),
            design,
            response,
            options,
            fit,
        })
    }

    /// Refit the same formula on other rows of the same variables.
    pub fn refit(&self, df: &DataFrame) -> Result<Self, ModelError> {
        Self::fit(df, &self.formula, self.options.clone())
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Term columns the model was fit on.
    pub fn design(&self) -> &Mat<f64> {
        &self.design
    }

    /// Response values the model was fit on.
    pub fn response(&self) -> &Col<f64> {
        &self.response
    }

    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    pub fn result(&self) -> &RegressionResult {
        self.fit.result()
    }

    pub fn n_observations(&self) -> usize {
        self.result().n_observations
    }

    /// Parameters: `Intercept` (when fit) followed by each term.
    pub fn params(&self) -> Params {
        let result = self.result();
        let mut entries = Vec::with_capacity(self.formula.terms().len() + 1);
        if let Some(b0) = result.intercept {
            entries.push((INTERCEPT.to_string(), b0));
        }
        for (j, term) in self.formula.terms().iter().enumerate() {
            entries.push((term.clone(), result.coefficients[j]));
        }
        Params { entries }
    }

    pub fn r_squared(&self) -> f64 {
        self.result().r_squared
    }

    pub fn residuals(&self) -> &Col<f64> {
        &self.result().residuals
    }

    pub fn fitted_values(&self) -> &Col<f64> {
        &self.result().fitted_values
    }

    /// In-sample predictions.
    pub fn predict(&self) -> Col<f64> {
        self.fit.predict(&self.design)
    }

    /// Predictions for the rows of another frame holding the formula's terms.
    pub fn predict_frame(&self, df: &DataFrame) -> Result<Col<f64>, ModelError> {
        let x = df.matrix_of(self.formula.terms())?;
        Ok(self.fit.predict(&x))
    }

    pub fn summary(&self) -> Summary<'_> {
        Summary::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FormulaError;
    use approx::assert_relative_eq;

    fn frame() -> DataFrame {
        let x1: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let x2: Vec<f64> = (0..20).map(|i| ((i * 7) % 5) as f64).collect();
        let y: Vec<f64> = x1
            .iter()
            .zip(&x2)
            .map(|(a, b)| 3.0 + 2.0 * a - 1.5 * b)
            .collect();
        DataFrame::new(vec![("y", y), ("x1", x1), ("x2", x2)]).unwrap()
    }

    #[test]
    fn test_params_intercept_first() {
        let df = frame();
        let formula = Formula::from_frame(&df).unwrap();
        let model = FittedModel::fit(&df, &formula, RegressionOptions::default()).unwrap();

        let params = model.params();
        let names: Vec<&str> = params.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Intercept", "x1", "x2"]);
        assert_relative_eq!(params.intercept().unwrap(), 3.0, epsilon = 1e-9);
        assert_relative_eq!(params.get("x1").unwrap(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(params.get("x2").unwrap(), -1.5, epsilon = 1e-9);
        assert_relative_eq!(model.r_squared(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_formula_without_intercept() {
        let df = frame();
        let formula = Formula::parse("y ~ x1 - 1").unwrap();
        let model = FittedModel::fit(&df, &formula, RegressionOptions::default()).unwrap();

        assert!(model.params().intercept().is_none());
        assert_eq!(model.params().len(), 1);
        assert!(!model.options().with_intercept);
    }

    #[test]
    fn test_predict_frame_matches_in_sample() {
        let df = frame();
        let formula = Formula::from_frame(&df).unwrap();
        let model = FittedModel::fit(&df, &formula, RegressionOptions::default()).unwrap();

        let in_sample = model.predict();
        let via_frame = model.predict_frame(&df).unwrap();
        for i in 0..df.n_rows() {
            assert_relative_eq!(in_sample[i], via_frame[i], epsilon = 1e-12);
            assert_relative_eq!(in_sample[i], model.fitted_values()[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_unknown_term_is_rejected() {
        let df = frame();
        let formula = Formula::parse("y ~ x1 + x3").unwrap();
        let err = FittedModel::fit(&df, &formula, RegressionOptions::default()).unwrap_err();
        assert!(matches!(err, ModelError::Formula(FormulaError::Frame(_))));
    }

    #[test]
    fn test_params_display_aligns_names() {
        let df = frame();
        let formula = Formula::from_frame(&df).unwrap();
        let model = FittedModel::fit(&df, &formula, RegressionOptions::default()).unwrap();

        let text = model.params().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Intercept  "));
        assert!(lines[1].starts_with("x1         "));
    }
}
