//! # Regression Diagnostics Workflow
//!
//! Screens features of a synthetic housing data set, fits a linear model and
//! checks its assumptions one after the other.
//!
//! Run with: `RUST_LOG=lm_diagnostics=debug cargo run --example diagnostics_workflow`

use lm_diagnostics::diagnostics::{QqLine, QqOptions, RainbowOptions};
use lm_diagnostics::plot::PlotConfig;
use lm_diagnostics::prelude::*;
use lm_diagnostics::workflow::{check_linearity_with, check_normality_with};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Deterministic pseudo-random values in [-1, 1).
fn noise(n: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((state >> 33) as f64) / (u32::MAX as f64) * 2.0 - 1.0
        })
        .collect()
}

fn housing(n: usize) -> Result<DataFrame, FrameError> {
    let e1 = noise(n, 7);
    let e2 = noise(n, 11);
    let e3 = noise(n, 13);

    let sqft: Vec<f64> = (0..n).map(|i| 800.0 + 25.0 * i as f64 + 150.0 * e1[i]).collect();
    let rooms: Vec<f64> = sqft.iter().zip(&e2).map(|(s, e)| (s / 400.0 + e).round()).collect();
    let age: Vec<f64> = e3.iter().map(|e| 30.0 + 25.0 * e).collect();
    let price: Vec<f64> = (0..n)
        .map(|i| 50_000.0 + 120.0 * sqft[i] + 4_000.0 * rooms[i] - 900.0 * age[i] + 15_000.0 * e2[i])
        .collect();

    DataFrame::new(vec![
        ("price", price),
        ("sqft", sqft),
        ("rooms", rooms),
        ("age", age),
    ])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lm_diagnostics=info".into()),
        )
        .init();

    let df = housing(120)?;

    println!("=== Correlation screening ===\n");
    let screen = screen_correlations(&df, 0.5)?;
    println!(
        "\nheatmap: {} bytes, positive pairs: {}, negative pairs: {}\n",
        screen.heatmap.as_str().len(),
        screen.positive_pairs.is_some(),
        screen.negative_pairs.is_some()
    );

    println!("=== Model ===\n");
    let model = fit_model(&df)?;

    println!("\n=== Linearity ===\n");
    check_linearity(&model)?;
    let by_size = RainbowOptions::builder().order_by("sqft").build()?;
    check_linearity_with(&model, &by_size)?;

    println!("\n=== Normality ===\n");
    let qq = check_normality_with(
        &model,
        &QqOptions {
            line: QqLine::Quartiles,
        },
        &PlotConfig::default(),
    )?;
    println!("Q-Q plot: {} bytes", qq.as_str().len());

    println!("\n=== Homoscedasticity ===\n");
    check_homoscedasticity(&model, &df)?;

    println!("\n=== Independence ===\n");
    let scores = check_independence(&df)?;
    for score in scores.iter().filter(|s| s.exceeds(5.0)) {
        println!("collinear: {}", score.feature);
    }

    Ok(())
}
