//! Single-panel scatter plots: Q-Q and residuals against fitted values.

use super::{padded_range, PlotConfig, PlotError, Svg};
use crate::diagnostics::QqPoints;
use plotters::prelude::*;

/// Optional line drawn over a scatter plot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ReferenceLine {
    #[default]
    None,
    /// `y = slope * x + intercept`.
    Line { slope: f64, intercept: f64 },
    /// `y = value`.
    Horizontal(f64),
}

/// Scatter `y` against `x`. Pairs with a non-finite coordinate are skipped.
pub fn scatter_plot(
    x: &[f64],
    y: &[f64],
    labels: (&str, &str, &str),
    line: ReferenceLine,
    config: &PlotConfig,
) -> Result<Svg, PlotError> {
    config.validate()?;
    if x.is_empty() || x.len() != y.len() {
        return Err(PlotError::EmptyData);
    }
    let (title, x_desc, y_desc) = labels;

    let (x0, x1) = padded_range(x);
    let (y0, y1) = padded_range(y);

    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (config.width, config.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(PlotError::render)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(PlotError::render)?;

        chart
            .configure_mesh()
            .x_desc(x_desc)
            .y_desc(y_desc)
            .draw()
            .map_err(PlotError::render)?;

        let size = config.point_size;
        chart
            .draw_series(
                x.iter()
                    .zip(y)
                    .filter(|(a, b)| a.is_finite() && b.is_finite())
                    .map(|(&a, &b)| Circle::new((a, b), size, BLUE.mix(0.7).filled())),
            )
            .map_err(PlotError::render)?;

        let segment = match line {
            ReferenceLine::None => None,
            ReferenceLine::Line { slope, intercept } => {
                Some([(x0, slope * x0 + intercept), (x1, slope * x1 + intercept)])
            }
            ReferenceLine::Horizontal(value) => Some([(x0, value), (x1, value)]),
        };
        if let Some(points) = segment {
            chart
                .draw_series(LineSeries::new(points, RED.stroke_width(2)))
                .map_err(PlotError::render)?;
        }

        root.present().map_err(PlotError::render)?;
    }

    tracing::trace!(points = x.len(), title, "rendered scatter plot");
    Ok(Svg(buf))
}

/// Normal Q-Q plot: sample quantiles against theoretical quantiles.
pub fn qq_plot(points: &QqPoints, config: &PlotConfig) -> Result<Svg, PlotError> {
    let line = match points.line {
        Some((slope, intercept)) => ReferenceLine::Line { slope, intercept },
        None => ReferenceLine::None,
    };
    scatter_plot(
        &points.theoretical,
        &points.sample,
        ("Normal Q-Q", "Theoretical Quantiles", "Sample Quantiles"),
        line,
        config,
    )
}

/// Residuals against fitted values, with a zero line.
pub fn residual_plot(
    fitted: &[f64],
    residuals: &[f64],
    config: &PlotConfig,
) -> Result<Svg, PlotError> {
    scatter_plot(
        fitted,
        residuals,
        ("Residuals vs Fitted", "Fitted values", "Residuals"),
        ReferenceLine::Horizontal(0.0),
        config,
    )
}
