//! OLS model fitting tests.

mod common;

use approx::assert_relative_eq;
use faer::{Col, Mat};
use lm_diagnostics::core::{Formula, FormulaError, RegressionOptions};
use lm_diagnostics::model::{FittedModel, ModelError};
use lm_diagnostics::solvers::{FittedRegressor, OlsRegressor, RegressionError, Regressor};
use lm_diagnostics::workflow::{fit_formula, fit_model, WorkflowError};
use lm_diagnostics::DataFrame;

// ============================================================================
// Solver
// ============================================================================

#[test]
fn test_simple_linear_regression_with_intercept() {
    // y = 2 + 3*x
    let x = Mat::from_fn(5, 1, |i, _| i as f64);
    let y = Col::from_fn(5, |i| 2.0 + 3.0 * i as f64);

    let fitted = OlsRegressor::builder()
        .with_intercept(true)
        .build()
        .fit(&x, &y)
        .expect("fit should succeed");

    assert_relative_eq!(fitted.coefficients()[0], 3.0, epsilon = 1e-10);
    assert_relative_eq!(fitted.intercept().unwrap(), 2.0, epsilon = 1e-10);
    assert_relative_eq!(fitted.r_squared(), 1.0, epsilon = 1e-10);
}

#[test]
fn test_single_observation_fails() {
    let x = Mat::from_fn(1, 1, |_, _| 1.0);
    let y = Col::from_fn(1, |_| 5.0);

    let result = OlsRegressor::builder().build().fit(&x, &y);
    assert!(matches!(
        result,
        Err(RegressionError::InsufficientObservations { .. })
    ));
}

// ============================================================================
// Formula models
// ============================================================================

#[test]
fn test_recovers_coefficients() {
    let df = common::generate_linear_frame(200, 3, 1.0, 0.01, 42);
    let model = fit_model(&df).expect("fit should succeed");
    let params = model.params();

    assert_relative_eq!(params.intercept().unwrap(), 1.0, epsilon = 0.01);
    assert_relative_eq!(params.get("x1").unwrap(), 1.0, epsilon = 0.01);
    assert_relative_eq!(params.get("x2").unwrap(), 2.0, epsilon = 0.01);
    assert_relative_eq!(params.get("x3").unwrap(), 3.0, epsilon = 0.01);
}

#[test]
fn test_r_squared_bounds() {
    for seed in [1, 7, 42] {
        let df = common::generate_linear_frame(60, 2, 0.5, 2.0, seed);
        let model = fit_model(&df).expect("fit should succeed");
        let r2 = model.r_squared();
        assert!((0.0..=1.0).contains(&r2), "R² = {r2}");
        assert!(model.result().adj_r_squared <= r2 + 1e-10);
    }
}

#[test]
fn test_refits_are_identical() {
    let df = common::generate_linear_frame(50, 2, 5.0, 0.5, 123);
    let first = fit_model(&df).unwrap();
    let second = fit_model(&df).unwrap();

    assert_eq!(first.r_squared(), second.r_squared());
    assert_eq!(first.params(), second.params());
    assert_eq!(first.summary().to_string(), second.summary().to_string());
}

#[test]
fn test_residuals_sum_to_zero_with_intercept() {
    let df = common::generate_linear_frame(50, 2, 5.0, 0.5, 123);
    let model = fit_model(&df).unwrap();

    let sum: f64 = model.residuals().iter().sum();
    assert!(sum.abs() < 1e-9, "residual sum = {sum}");

    let y = df.target();
    for i in 0..df.n_rows() {
        assert_relative_eq!(
            model.residuals()[i],
            y[i] - model.fitted_values()[i],
            epsilon = 1e-10
        );
    }
}

#[test]
fn test_collinear_terms_are_aliased() {
    let df = common::generate_collinear_frame(20);
    let model = fit_model(&df).expect("fit should succeed");

    assert!(model.result().has_aliased());
    let nan_terms = model
        .params()
        .iter()
        .filter(|(_, v)| v.is_nan())
        .count();
    assert_eq!(nan_terms, 1);
}

#[test]
fn test_inference_bounds() {
    let df = common::generate_linear_frame(100, 3, 1.0, 0.5, 42);
    let model = fit_model(&df).unwrap();
    let summary = model.summary();

    for row in summary.coefficients() {
        let p = row.p_value.expect("p-value");
        assert!((0.0..=1.0).contains(&p));
        let se = row.std_error.expect("std error");
        assert!(se > 0.0 && se.is_finite());
        let (lo, hi) = row.conf_interval.expect("interval");
        assert!(lo <= row.coef && row.coef <= hi);
    }

    let result = model.result();
    assert!(result.f_pvalue < 0.01);
    assert!(result.aic.is_finite() && result.bic.is_finite());
}

#[test]
fn test_explicit_formula_subset() {
    let df = common::generate_linear_frame(80, 3, 2.0, 0.1, 9);
    let model = fit_formula(&df, "y ~ x3 + x1").unwrap();

    let params = model.params();
    let names: Vec<&str> = params.iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["Intercept", "x3", "x1"]);
    assert_eq!(model.design().ncols(), 2);
}

#[test]
fn test_predict_frame_on_new_rows() {
    let x: Vec<f64> = (0..5).map(|i| i as f64).collect();
    let y: Vec<f64> = x.iter().map(|v| 2.0 + 3.0 * v).collect();
    let df = DataFrame::new(vec![("y", y), ("x", x)]).unwrap();
    let model = fit_model(&df).unwrap();

    let new = DataFrame::new(vec![("x", vec![10.0, 11.0, 12.0])]).unwrap();
    let predictions = model.predict_frame(&new).unwrap();
    for i in 0..3 {
        assert_relative_eq!(predictions[i], 2.0 + 3.0 * (i + 10) as f64, epsilon = 1e-9);
    }
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_frame_without_features() {
    let df = DataFrame::new(vec![("y", vec![1.0, 2.0, 3.0])]).unwrap();
    assert!(matches!(
        fit_model(&df),
        Err(WorkflowError::Formula(FormulaError::Frame(_)))
    ));
}

#[test]
fn test_invalid_column_name() {
    let df = DataFrame::new(vec![
        ("y", vec![1.0, 2.0, 3.0, 4.0]),
        ("bad name", vec![1.0, 3.0, 2.0, 5.0]),
    ])
    .unwrap();
    assert!(matches!(
        fit_model(&df),
        Err(WorkflowError::Formula(FormulaError::InvalidName(_)))
    ));
}

#[test]
fn test_unknown_formula_term() {
    let df = common::generate_linear_frame(20, 1, 0.0, 0.1, 1);
    assert!(matches!(
        fit_formula(&df, "y ~ x1 + missing"),
        Err(WorkflowError::Formula(FormulaError::Frame(_)))
    ));
}

#[test]
fn test_too_few_rows() {
    let df = DataFrame::new(vec![
        ("y", vec![1.0, 2.0]),
        ("a", vec![1.0, 0.0]),
        ("b", vec![0.5, 2.0]),
    ])
    .unwrap();
    let formula = Formula::from_frame(&df).unwrap();
    let err = FittedModel::fit(&df, &formula, RegressionOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        ModelError::Regression(RegressionError::InsufficientObservations { .. })
    ));
}
