//! Sample moments.

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population central moments of a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub mean: f64,
    /// Second central moment (biased variance).
    pub m2: f64,
    pub skewness: f64,
    /// Kurtosis (not excess; 3.0 for a normal sample).
    pub kurtosis: f64,
}

/// Mean, biased variance, skewness and kurtosis of `values`.
///
/// Skewness and kurtosis are NaN when the sample has zero variance.
pub fn sample_moments(values: &[f64]) -> Moments {
    let n = values.len() as f64;
    let mean = mean(values);

    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for &v in values {
        let d = v - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    m2 /= n;
    m3 /= n;
    m4 /= n;

    let (skewness, kurtosis) = if m2 > 0.0 {
        (m3 / m2.powf(1.5), m4 / (m2 * m2))
    } else {
        (f64::NAN, f64::NAN)
    };

    Moments {
        mean,
        m2,
        skewness,
        kurtosis,
    }
}
