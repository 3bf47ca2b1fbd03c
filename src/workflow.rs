//! Interactive analysis helpers.
//!
//! Each function runs one step of a regression analysis on a data frame
//! whose column 0 is the target, prints a short report to stdout and returns
//! the numbers (and plots) it computed. Call them in sequence:
//!
//! ```rust,ignore
//! let screen = screen_correlations(&df, 0.7)?;
//! let model = fit_model(&df)?;
//! check_linearity(&model)?;
//! check_normality(&model)?;
//! check_homoscedasticity(&model, &df)?;
//! check_independence(&df)?;
//! ```

use crate::core::{
    validate_threshold, DataFrame, Formula, FormulaError, FrameError, OptionsError,
    RegressionOptions,
};
use crate::diagnostics::{
    breusch_pagan, qq_points, rainbow_test, response_residuals, split_by_threshold, vif_scores,
    BreuschPagan, BreuschPaganOptions, CorrelationMatrix, CorrelationSplit, DiagnosticError,
    QqOptions, RainbowOptions, RainbowTest, VifScore,
};
use crate::model::{FittedModel, ModelError};
use crate::plot::{
    correlation_heatmap, pair_grid, qq_plot, residual_plot, PlotConfig, PlotError, Svg,
};
use std::fmt;
use thiserror::Error;

const HOMOSCEDASTICITY_NOTE: &str = "The null hypothesis is homoscedasticity, alternative \
hypothesis is heteroscedasticity. Thus returning a low p-value means that the current model \
violates the homoscedasticity assumption";

const VIF_NOTE: &str = "VIF needs to be smaller than 5.";

const SEPARATOR: &str = "------------------------------------";

/// Errors raised by the analysis helpers.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Formula(#[from] FormulaError),

    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Diagnostic(#[from] DiagnosticError),

    #[error(transparent)]
    Plot(#[from] PlotError),
}

/// Output of [`screen_correlations`].
#[derive(Debug, Clone)]
pub struct CorrelationScreen {
    /// Features correlated with the target above the threshold.
    pub positive: Vec<String>,
    /// Features correlated with the target below minus the threshold.
    pub negative: Vec<String>,
    pub split: CorrelationSplit,
    pub matrix: CorrelationMatrix,
    pub heatmap: Svg,
    /// Pair grid of the positive features; `None` when there are none.
    pub positive_pairs: Option<Svg>,
    /// Pair grid of the negative features; `None` when there are none.
    pub negative_pairs: Option<Svg>,
}

impl fmt::Display for CorrelationScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.split, f)
    }
}

/// Output of [`check_homoscedasticity`].
#[derive(Debug, Clone)]
pub struct HomoscedasticityCheck {
    pub test: BreuschPagan,
    /// Residuals against fitted values.
    pub plot: Svg,
}

impl fmt::Display for HomoscedasticityCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.test)?;
        writeln!(f)?;
        writeln!(f, "{HOMOSCEDASTICITY_NOTE}")
    }
}

/// VIF scores rendered as a two-column table.
#[derive(Debug, Clone, Copy)]
pub struct VifTable<'a>(pub &'a [VifScore]);

impl fmt::Display for VifTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>12}  {}", "VIF", "feature")?;
        for score in self.0 {
            writeln!(f, "{score}")?;
        }
        Ok(())
    }
}

/// Correlate the target with every feature and plot the strong ones.
///
/// Prints the features whose correlation with column 0 exceeds `threshold`
/// (positive) or falls below `-threshold` (negative), renders a heatmap of the
/// full correlation matrix and a pair grid for each non-empty group.
pub fn screen_correlations(
    df: &DataFrame,
    threshold: f64,
) -> Result<CorrelationScreen, WorkflowError> {
    screen_correlations_with(df, threshold, &PlotConfig::grid())
}

pub fn screen_correlations_with(
    df: &DataFrame,
    threshold: f64,
    config: &PlotConfig,
) -> Result<CorrelationScreen, WorkflowError> {
    validate_threshold(threshold)?;
    config.validate()?;
    df.require_columns(2)?;

    let matrix = CorrelationMatrix::compute(df);
    let split = split_by_threshold(&matrix, threshold)?;
    print!("{split}");

    let heatmap = correlation_heatmap(&matrix, config)?;

    let positive = split.positive_names();
    let negative = split.negative_names();
    let positive_pairs = subset_pairs(df, &positive, config)?;
    let negative_pairs = subset_pairs(df, &negative, config)?;

    tracing::debug!(
        threshold,
        positive = positive.len(),
        negative = negative.len(),
        "screened correlations"
    );

    Ok(CorrelationScreen {
        positive,
        negative,
        split,
        matrix,
        heatmap,
        positive_pairs,
        negative_pairs,
    })
}

fn subset_pairs(
    df: &DataFrame,
    names: &[String],
    config: &PlotConfig,
) -> Result<Option<Svg>, WorkflowError> {
    if names.is_empty() {
        return Ok(None);
    }
    let subset = df.select(names)?;
    Ok(Some(pair_grid(&subset, config)?))
}

/// Fit `target ~ f1 + ... + fn` by OLS and print its summary.
pub fn fit_model(df: &DataFrame) -> Result<FittedModel, WorkflowError> {
    fit_model_with(df, RegressionOptions::default())
}

pub fn fit_model_with(
    df: &DataFrame,
    options: RegressionOptions,
) -> Result<FittedModel, WorkflowError> {
    let formula = Formula::from_frame(df)?;
    fit_and_report(df, &formula, options)
}

/// Fit an explicit formula such as `"price ~ sqft + rooms"`.
pub fn fit_formula(df: &DataFrame, formula: &str) -> Result<FittedModel, WorkflowError> {
    fit_formula_with(df, formula, RegressionOptions::default())
}

pub fn fit_formula_with(
    df: &DataFrame,
    formula: &str,
    options: RegressionOptions,
) -> Result<FittedModel, WorkflowError> {
    let formula = Formula::parse(formula)?;
    fit_and_report(df, &formula, options)
}

fn fit_and_report(
    df: &DataFrame,
    formula: &Formula,
    options: RegressionOptions,
) -> Result<FittedModel, WorkflowError> {
    let model = FittedModel::fit(df, formula, options)?;
    print!("{}", model_report(&model));
    Ok(model)
}

fn model_report(model: &FittedModel) -> String {
    format!(
        "Rsquared: {}\nBETA values:\n{}{SEPARATOR}\n\n{}",
        model.r_squared(),
        model.params(),
        model.summary()
    )
}

/// Rainbow test for linearity on the central half of the rows.
pub fn check_linearity(model: &FittedModel) -> Result<RainbowTest, WorkflowError> {
    check_linearity_with(model, &RainbowOptions::default())
}

pub fn check_linearity_with(
    model: &FittedModel,
    options: &RainbowOptions,
) -> Result<RainbowTest, WorkflowError> {
    let key = match &options.order_by {
        Some(name) => Some(sort_key(model, name)?),
        None => None,
    };

    let test = rainbow_test(
        model.design(),
        model.response(),
        model.options(),
        options,
        key.as_deref(),
    )?;
    print!("{test}");
    Ok(test)
}

/// Values of a model variable, by name.
fn sort_key(model: &FittedModel, name: &str) -> Result<Vec<f64>, DiagnosticError> {
    let formula = model.formula();
    if formula.response() == name {
        return Ok(model.response().iter().copied().collect());
    }
    match formula.terms().iter().position(|t| t == name) {
        Some(j) => {
            let x = model.design();
            Ok((0..x.nrows()).map(|i| x[(i, j)]).collect())
        }
        None => Err(DiagnosticError::UnknownVariable(name.to_string())),
    }
}

/// Normal Q-Q plot of the model residuals.
pub fn check_normality(model: &FittedModel) -> Result<Svg, WorkflowError> {
    check_normality_with(model, &QqOptions::default(), &PlotConfig::default())
}

pub fn check_normality_with(
    model: &FittedModel,
    options: &QqOptions,
    config: &PlotConfig,
) -> Result<Svg, WorkflowError> {
    let residuals: Vec<f64> = model.residuals().iter().copied().collect();
    let points = qq_points(&residuals, options);
    Ok(qq_plot(&points, config)?)
}

/// Residual plot and Breusch-Pagan test against the frame's features.
///
/// `df` must be the frame the model was fit on: residuals are recomputed
/// from its column 0 and the model's fitted values.
pub fn check_homoscedasticity(
    model: &FittedModel,
    df: &DataFrame,
) -> Result<HomoscedasticityCheck, WorkflowError> {
    check_homoscedasticity_with(
        model,
        df,
        &BreuschPaganOptions::default(),
        &PlotConfig::default(),
    )
}

pub fn check_homoscedasticity_with(
    model: &FittedModel,
    df: &DataFrame,
    options: &BreuschPaganOptions,
    config: &PlotConfig,
) -> Result<HomoscedasticityCheck, WorkflowError> {
    if df.n_rows() != model.n_observations() {
        return Err(DiagnosticError::DimensionMismatch {
            expected: model.n_observations(),
            got: df.n_rows(),
        }
        .into());
    }
    df.require_columns(2)?;

    let fitted: Vec<f64> = model.fitted_values().iter().copied().collect();
    let model_residuals: Vec<f64> = model.residuals().iter().copied().collect();
    let plot = residual_plot(&fitted, &model_residuals, config)?;

    let residuals = response_residuals(df.target(), model.fitted_values())?;
    let test = breusch_pagan(&residuals, &df.feature_matrix(), options)?;

    let check = HomoscedasticityCheck { test, plot };
    print!("{check}");
    Ok(check)
}

/// Variance inflation factor of every feature column.
pub fn check_independence(df: &DataFrame) -> Result<Vec<VifScore>, WorkflowError> {
    df.require_columns(2)?;

    let scores = vif_scores(df.feature_names(), &df.feature_matrix())?;
    print!("{}", VifTable(&scores));
    println!();
    println!("{VIF_NOTE}");
    Ok(scores)
}
