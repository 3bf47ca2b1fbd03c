//! Pearson correlation matrix and target-correlation screening.

use crate::core::{validate_threshold, DataFrame, OptionsError};
use faer::Mat;
use std::fmt;

/// Pearson correlation of two equally long slices.
///
/// Rows where either value is NaN are skipped. Returns NaN when fewer than
/// two complete rows remain or either side has zero variance.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(&x, &y)| (x, y))
        .collect();

    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }

    let mean_a = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_b = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;

    let (mut sab, mut saa, mut sbb) = (0.0, 0.0, 0.0);
    for &(x, y) in &pairs {
        let da = x - mean_a;
        let db = y - mean_b;
        sab += da * db;
        saa += da * da;
        sbb += db * db;
    }

    if saa <= 0.0 || sbb <= 0.0 {
        return f64::NAN;
    }

    (sab / (saa.sqrt() * sbb.sqrt())).clamp(-1.0, 1.0)
}

/// Square matrix of pairwise Pearson correlations between frame columns.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    names: Vec<String>,
    values: Mat<f64>,
}

impl CorrelationMatrix {
    /// Correlate every pair of columns of `df`.
    pub fn compute(df: &DataFrame) -> Self {
        let p = df.n_columns();
        let mut values = Mat::zeros(p, p);

        for i in 0..p {
            let ci = df.column_at(i).unwrap_or_default();
            for j in 0..=i {
                let r = if i == j {
                    // A column with zero variance is not even self-correlated.
                    if pearson(ci, ci).is_nan() {
                        f64::NAN
                    } else {
                        1.0
                    }
                } else {
                    pearson(ci, df.column_at(j).unwrap_or_default())
                };
                values[(i, j)] = r;
                values[(j, i)] = r;
            }
        }

        Self {
            names: df.names().to_vec(),
            values,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn size(&self) -> usize {
        self.names.len()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    /// Correlations between column 0 and each feature column, in order.
    pub fn target_correlations(&self) -> Vec<FeatureCorrelation> {
        (1..self.size())
            .map(|j| FeatureCorrelation {
                feature: self.names[j].clone(),
                correlation: self.values[(0, j)],
            })
            .collect()
    }
}

/// One feature's correlation with the target.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCorrelation {
    pub feature: String,
    pub correlation: f64,
}

/// Features whose correlation with the target exceeds a threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationSplit {
    pub target: String,
    pub threshold: f64,
    /// Correlation strictly above `threshold`, in column order.
    pub positive: Vec<FeatureCorrelation>,
    /// Correlation strictly below `-threshold`, in column order.
    pub negative: Vec<FeatureCorrelation>,
}

impl CorrelationSplit {
    pub fn positive_names(&self) -> Vec<String> {
        self.positive.iter().map(|f| f.feature.clone()).collect()
    }

    pub fn negative_names(&self) -> Vec<String> {
        self.negative.iter().map(|f| f.feature.clone()).collect()
    }
}

/// Partition the features of `matrix` by their correlation with column 0.
///
/// NaN correlations (constant columns) land in neither list.
pub fn split_by_threshold(
    matrix: &CorrelationMatrix,
    threshold: f64,
) -> Result<CorrelationSplit, OptionsError> {
    validate_threshold(threshold)?;

    let mut positive = Vec::new();
    let mut negative = Vec::new();

    for fc in matrix.target_correlations() {
        if fc.correlation.is_nan() {
            tracing::warn!(feature = %fc.feature, "correlation with target is undefined");
        } else if fc.correlation > threshold {
            positive.push(fc);
        } else if fc.correlation < -threshold {
            negative.push(fc);
        }
    }

    Ok(CorrelationSplit {
        target: matrix.names.first().cloned().unwrap_or_default(),
        threshold,
        positive,
        negative,
    })
}

impl fmt::Display for CorrelationSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "POSITIVE CORRELATIONS:")?;
        for fc in &self.positive {
            writeln!(f, "      {}   {}   {}", self.target, fc.feature, fc.correlation)?;
        }
        writeln!(f, "NEGATIVE CORRELATIONS:")?;
        for fc in &self.negative {
            writeln!(f, "      {}   {}   {}", self.target, fc.feature, fc.correlation)?;
        }
        Ok(())
    }
}
