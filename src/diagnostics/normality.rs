//! Normality of residuals: Q-Q coordinates and the Jarque-Bera test.

use super::DiagnosticError;
use crate::utils::sample_moments;
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

/// Reference line drawn on a Q-Q plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QqLine {
    /// Points only.
    #[default]
    None,
    /// Line through the first and third quartiles.
    Quartiles,
}

/// Options for Q-Q coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QqOptions {
    pub line: QqLine,
}

/// Coordinates of a normal Q-Q plot.
#[derive(Debug, Clone, PartialEq)]
pub struct QqPoints {
    /// Standard-normal quantiles at plotting positions `i / (n + 1)`.
    pub theoretical: Vec<f64>,
    /// Sorted sample values.
    pub sample: Vec<f64>,
    /// `(slope, intercept)` of the requested reference line.
    pub line: Option<(f64, f64)>,
}

/// Q-Q coordinates of `values` against the standard normal distribution.
pub fn qq_points(values: &[f64], options: &QqOptions) -> QqPoints {
    let mut sample: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sample.sort_by(f64::total_cmp);

    let n = sample.len();
    let theoretical = match Normal::new(0.0, 1.0) {
        Ok(normal) => (1..=n)
            .map(|i| normal.inverse_cdf(i as f64 / (n + 1) as f64))
            .collect(),
        Err(_) => vec![f64::NAN; n],
    };

    let line = match options.line {
        QqLine::None => None,
        QqLine::Quartiles => quartile_line(&sample),
    };

    QqPoints {
        theoretical,
        sample,
        line,
    }
}

/// Line through `(z_0.25, q_0.25)` and `(z_0.75, q_0.75)`.
fn quartile_line(sorted: &[f64]) -> Option<(f64, f64)> {
    if sorted.len() < 2 {
        return None;
    }
    let normal = Normal::new(0.0, 1.0).ok()?;
    let (z1, z3) = (normal.inverse_cdf(0.25), normal.inverse_cdf(0.75));
    let (q1, q3) = (quantile(sorted, 0.25), quantile(sorted, 0.75));

    let slope = (q3 - q1) / (z3 - z1);
    Some((slope, q1 - slope * z1))
}

/// Linearly interpolated quantile of sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Result of the Jarque-Bera test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JarqueBera {
    pub statistic: f64,
    pub p_value: f64,
    pub skewness: f64,
    /// Kurtosis (3.0 for normal data).
    pub kurtosis: f64,
}

/// Jarque-Bera test: `JB = n/6 * (S² + (K - 3)²/4)` against χ²(2).
pub fn jarque_bera(values: &[f64]) -> Result<JarqueBera, DiagnosticError> {
    let clean: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    let n = clean.len();

    if n < 3 {
        return Err(DiagnosticError::InsufficientObservations { needed: 3, got: n });
    }

    let m = sample_moments(&clean);
    if m.skewness.is_nan() {
        // Zero variance: no departure from normality is measurable.
        return Ok(JarqueBera {
            statistic: 0.0,
            p_value: 1.0,
            skewness: f64::NAN,
            kurtosis: f64::NAN,
        });
    }

    let excess = m.kurtosis - 3.0;
    let statistic = n as f64 / 6.0 * (m.skewness.powi(2) + excess.powi(2) / 4.0);
    let p_value = ChiSquared::new(2.0).map_or(f64::NAN, |d| d.sf(statistic));

    Ok(JarqueBera {
        statistic,
        p_value,
        skewness: m.skewness,
        kurtosis: m.kurtosis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_qq_points_are_sorted_and_symmetric() {
        let qq = qq_points(&[3.0, -1.0, 0.5, 2.0, -2.5], &QqOptions::default());

        assert_eq!(qq.sample, vec![-2.5, -1.0, 0.5, 2.0, 3.0]);
        assert_eq!(qq.theoretical.len(), 5);
        // Plotting positions 1/6..5/6 are symmetric about 0.5
        assert_relative_eq!(qq.theoretical[2], 0.0, epsilon = 1e-12);
        assert_relative_eq!(qq.theoretical[0], -qq.theoretical[4], epsilon = 1e-12);
        assert!(qq.line.is_none());
    }

    #[test]
    fn test_quartile_line_for_scaled_normal_quantiles() {
        // Data that are exactly 2 * z + 1 lie on a line of slope 2, intercept 1.
        let normal = Normal::new(0.0, 1.0).unwrap();
        let data: Vec<f64> = (1..=199)
            .map(|i| 2.0 * normal.inverse_cdf(i as f64 / 200.0) + 1.0)
            .collect();

        let qq = qq_points(
            &data,
            &QqOptions {
                line: QqLine::Quartiles,
            },
        );
        let (slope, intercept) = qq.line.unwrap();
        assert_relative_eq!(slope, 2.0, epsilon = 0.05);
        assert_relative_eq!(intercept, 1.0, epsilon = 1e-2);
    }

    #[test]
    fn test_jarque_bera_symmetric_sample() {
        let jb = jarque_bera(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_relative_eq!(jb.skewness, 0.0, epsilon = 1e-12);
        // JB = 5/6 * (1.7 - 3)^2 / 4
        assert_relative_eq!(jb.statistic, 5.0 / 6.0 * 1.69 / 4.0, epsilon = 1e-12);
        assert!(jb.p_value > 0.5 && jb.p_value <= 1.0);
    }

    #[test]
    fn test_jarque_bera_needs_three_values() {
        assert!(matches!(
            jarque_bera(&[1.0, 2.0]),
            Err(DiagnosticError::InsufficientObservations { needed: 3, got: 2 })
        ));
    }
}
