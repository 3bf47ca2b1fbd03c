//! Tabular summary of a fitted model.

use super::fitted::{FittedModel, INTERCEPT};
use crate::core::ParameterInference;
use crate::diagnostics::{durbin_watson, jarque_bera, JarqueBera};
use std::fmt;

const WIDTH: usize = 78;

/// Fit statistics, coefficient table and residual diagnostics of a
/// [`FittedModel`], rendered by `Display`.
#[derive(Debug, Clone)]
pub struct Summary<'a> {
    model: &'a FittedModel,
    durbin_watson: f64,
    jarque_bera: Option<JarqueBera>,
}

/// One row of the coefficient table.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientRow {
    pub name: String,
    pub coef: f64,
    pub std_error: Option<f64>,
    pub t_statistic: Option<f64>,
    pub p_value: Option<f64>,
    pub conf_interval: Option<(f64, f64)>,
}

impl<'a> Summary<'a> {
    pub(crate) fn new(model: &'a FittedModel) -> Self {
        let residuals = model.residuals();
        let values: Vec<f64> = residuals.iter().copied().collect();
        Self {
            model,
            durbin_watson: durbin_watson(residuals),
            // Fewer than three residuals: the row is printed as NaN.
            jarque_bera: jarque_bera(&values).ok(),
        }
    }

    pub fn durbin_watson(&self) -> f64 {
        self.durbin_watson
    }

    pub fn jarque_bera(&self) -> Option<&JarqueBera> {
        self.jarque_bera.as_ref()
    }

    /// Coefficient rows, intercept first.
    pub fn coefficients(&self) -> Vec<CoefficientRow> {
        let result = self.model.result();
        let inference = result.inference.as_ref();

        let row = |name: &str, coef: f64, stats: Option<&ParameterInference>| CoefficientRow {
            name: name.to_string(),
            coef,
            std_error: stats.map(|s| s.std_error),
            t_statistic: stats.map(|s| s.t_statistic),
            p_value: stats.map(|s| s.p_value),
            conf_interval: stats.map(|s| s.conf_interval),
        };

        let intercept = result.intercept.map(|b0| {
            row(INTERCEPT, b0, inference.and_then(|inf| inf.intercept.as_ref()))
        });
        let terms = self.model.formula().terms().iter().enumerate().map(|(j, term)| {
            row(
                term.as_str(),
                result.coefficients[j],
                inference.and_then(|inf| inf.coefficients.get(j)),
            )
        });

        intercept.into_iter().chain(terms).collect()
    }
}

fn pair(
    f: &mut fmt::Formatter<'_>,
    left: (&str, String),
    right: Option<(&str, String)>,
) -> fmt::Result {
    write!(f, "{:<20}{:>18}   ", left.0, left.1)?;
    match right {
        Some((label, value)) => writeln!(f, "{:<22}{:>15}", label, value),
        None => writeln!(f),
    }
}

fn num(v: f64, precision: usize) -> String {
    if v.is_finite() && v != 0.0 && (v.abs() < 1e-3 || v.abs() >= 1e6) {
        format!("{v:.precision$e}")
    } else {
        format!("{v:.precision$}")
    }
}

fn cell(v: Option<f64>) -> String {
    v.map_or_else(|| "nan".to_string(), |v| num(v, 4))
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.model.result();
        let rule = "=".repeat(WIDTH);
        let thin = "-".repeat(WIDTH);

        writeln!(f, "{:^WIDTH$}", "OLS Regression Results")?;
        writeln!(f, "{rule}")?;
        pair(
            f,
            ("Dep. Variable:", self.model.formula().response().to_string()),
            Some(("R-squared:", format!("{:.3}", result.r_squared))),
        )?;
        pair(
            f,
            ("Model:", "OLS".to_string()),
            Some(("Adj. R-squared:", format!("{:.3}", result.adj_r_squared))),
        )?;
        pair(
            f,
            ("No. Observations:", result.n_observations.to_string()),
            Some(("F-statistic:", num(result.f_statistic, 4))),
        )?;
        pair(
            f,
            ("Df Residuals:", result.residual_df().to_string()),
            Some(("Prob (F-statistic):", num(result.f_pvalue, 3))),
        )?;
        pair(
            f,
            ("Df Model:", result.model_df().to_string()),
            Some(("Log-Likelihood:", format!("{:.2}", result.log_likelihood))),
        )?;
        pair(
            f,
            ("Formula:", self.model.formula().to_string()),
            Some(("AIC:", format!("{:.2}", result.aic))),
        )?;
        pair(
            f,
            ("", String::new()),
            Some(("BIC:", format!("{:.2}", result.bic))),
        )?;
        writeln!(f, "{rule}")?;

        let alpha = 1.0 - result.confidence_level;
        let lo_label = format!("[{:.3}", alpha / 2.0);
        let hi_label = format!("{:.3}]", 1.0 - alpha / 2.0);
        writeln!(
            f,
            "{:<16}{:>10} {:>10} {:>10} {:>9} {:>9} {:>9}",
            "", "coef", "std err", "t", "P>|t|", lo_label, hi_label
        )?;
        writeln!(f, "{thin}")?;

        for row in self.coefficients() {
            let (lo, hi) = match row.conf_interval {
                Some((lo, hi)) => (Some(lo), Some(hi)),
                None => (None, None),
            };
            writeln!(
                f,
                "{:<16}{:>10} {:>10} {:>10} {:>9} {:>9} {:>9}",
                row.name,
                num(row.coef, 4),
                cell(row.std_error),
                cell(row.t_statistic),
                row.p_value.map_or_else(|| "nan".to_string(), |p| format!("{p:.3}")),
                cell(lo),
                cell(hi),
            )?;
        }
        writeln!(f, "{rule}")?;

        let (jb, jb_p, skew, kurt) = match &self.jarque_bera {
            Some(jb) => (jb.statistic, jb.p_value, jb.skewness, jb.kurtosis),
            None => (f64::NAN, f64::NAN, f64::NAN, f64::NAN),
        };
        pair(
            f,
            ("Durbin-Watson:", format!("{:.3}", self.durbin_watson)),
            Some(("Jarque-Bera (JB):", format!("{jb:.3}"))),
        )?;
        pair(
            f,
            ("Prob(JB):", num(jb_p, 3)),
            Some(("Skew:", format!("{skew:.3}"))),
        )?;
        pair(f, ("Kurtosis:", format!("{kurt:.3}")), None)?;
        writeln!(f, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{DataFrame, Formula, RegressionOptions};
    use crate::model::FittedModel;

    fn model() -> FittedModel {
        let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| 1.0 + 0.5 * v + ((i * 13) % 7) as f64 / 7.0)
            .collect();
        let df = DataFrame::new(vec![("sales", y), ("tv", x)]).unwrap();
        let formula = Formula::from_frame(&df).unwrap();
        FittedModel::fit(&df, &formula, RegressionOptions::default()).unwrap()
    }

    #[test]
    fn test_summary_sections() {
        let model = model();
        let text = model.summary().to_string();

        assert!(text.contains("OLS Regression Results"));
        assert!(text.contains("Dep. Variable:"));
        assert!(text.contains("sales"));
        assert!(text.contains("No. Observations:"));
        assert!(text.contains("[0.025"));
        assert!(text.contains("0.975]"));
        assert!(text.contains("Durbin-Watson:"));
        assert!(text.contains("Jarque-Bera (JB):"));
        assert!(text.lines().any(|l| l.starts_with("Intercept")));
        assert!(text.lines().any(|l| l.starts_with("tv ")));
    }

    #[test]
    fn test_summary_coefficient_rows() {
        let model = model();
        let summary = model.summary();
        let rows = summary.coefficients();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Intercept");
        assert_eq!(rows[1].name, "tv");
        let (lo, hi) = rows[1].conf_interval.unwrap();
        assert!(lo < rows[1].coef && rows[1].coef < hi);
        let p = rows[1].p_value.unwrap();
        assert!((0.0..=1.0).contains(&p));
        assert!(summary.durbin_watson() > 0.0 && summary.durbin_watson() < 4.0);
    }

    #[test]
    fn test_extreme_cells_stay_separated() {
        let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| 1.0 + 0.5 * v + 1e-7 * ((i * 13) % 7) as f64)
            .collect();
        let df = DataFrame::new(vec![("y", y), ("x", x)]).unwrap();
        let formula = Formula::from_frame(&df).unwrap();
        let model = FittedModel::fit(&df, &formula, RegressionOptions::default()).unwrap();
        let text = model.summary().to_string();

        for name in ["Intercept", "x"] {
            let line = text
                .lines()
                .find(|l| l.split_whitespace().next() == Some(name))
                .unwrap();
            let cells: Vec<&str> = line.split_whitespace().skip(1).collect();
            assert_eq!(cells.len(), 6, "{line}");
            for cell in cells {
                assert!(cell.parse::<f64>().is_ok(), "{line}");
            }
        }
    }
}
