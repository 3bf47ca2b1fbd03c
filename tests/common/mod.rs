//! Common test utilities and data generators.
//!
//! Every generator returns a frame whose column 0 is the target `y`.

#![allow(dead_code)]

use lm_diagnostics::DataFrame;

/// Deterministic values in [-1, 1) for reproducibility.
pub fn uniform(n: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((state >> 33) as f64) / (u32::MAX as f64) * 2.0 - 1.0
        })
        .collect()
}

/// `y = intercept + Σ (j + 1) * x_j + noise`, features named `x1..xp`.
pub fn generate_linear_frame(
    n_samples: usize,
    n_features: usize,
    intercept: f64,
    noise_std: f64,
    seed: u64,
) -> DataFrame {
    let features: Vec<Vec<f64>> = (0..n_features)
        .map(|j| uniform(n_samples, seed + j as u64 + 1))
        .collect();
    let noise = uniform(n_samples, seed);

    let y: Vec<f64> = (0..n_samples)
        .map(|i| {
            let signal: f64 = features
                .iter()
                .enumerate()
                .map(|(j, col)| (j + 1) as f64 * col[i])
                .sum();
            intercept + signal + noise_std * noise[i]
        })
        .collect();

    let mut columns = vec![("y".to_string(), y)];
    for (j, col) in features.into_iter().enumerate() {
        columns.push((format!("x{}", j + 1), col));
    }
    DataFrame::new(columns).unwrap()
}

/// `x2 = 2 * x1` exactly; `x3` independent.
pub fn generate_collinear_frame(n_samples: usize) -> DataFrame {
    let x1: Vec<f64> = (0..n_samples).map(|i| i as f64).collect();
    let x2: Vec<f64> = x1.iter().map(|v| 2.0 * v).collect();
    let x3 = uniform(n_samples, 99);
    let y: Vec<f64> = (0..n_samples)
        .map(|i| 1.0 + 2.0 * x1[i] + 3.0 * x3[i])
        .collect();

    DataFrame::new(vec![("y", y), ("x1", x1), ("x2", x2), ("x3", x3)]).unwrap()
}

/// `y = x²` plus small noise on an evenly spaced `x`.
pub fn generate_quadratic_frame(n_samples: usize) -> DataFrame {
    let x: Vec<f64> = (0..n_samples).map(|i| i as f64 / 10.0).collect();
    let noise = uniform(n_samples, 5);
    let y: Vec<f64> = x.iter().zip(&noise).map(|(v, e)| v * v + 0.05 * e).collect();

    DataFrame::new(vec![("y", y), ("x", x)]).unwrap()
}

/// Linear in `x` with noise whose spread grows with `x`.
pub fn generate_heteroscedastic_frame(n_samples: usize) -> DataFrame {
    let x: Vec<f64> = (0..n_samples).map(|i| 1.0 + i as f64).collect();
    let noise = uniform(n_samples, 17);
    let y: Vec<f64> = x
        .iter()
        .zip(&noise)
        .map(|(v, e)| 3.0 + 0.5 * v + 0.5 * v * e)
        .collect();

    DataFrame::new(vec![("y", y), ("x", x)]).unwrap()
}
