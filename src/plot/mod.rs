//! SVG rendering of diagnostic plots.
//!
//! Every plot is drawn with `plotters` into an in-memory SVG document; nothing
//! is written to disk.

mod heatmap;
mod pairplot;
mod scatter;

use crate::core::OptionsError;
use std::fmt;
use thiserror::Error;

pub use heatmap::correlation_heatmap;
pub use pairplot::pair_grid;
pub use scatter::{qq_plot, residual_plot, scatter_plot, ReferenceLine};

/// Errors raised while rendering a plot.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("failed to render plot: {0}")]
    Render(String),

    #[error(transparent)]
    InvalidOptions(#[from] OptionsError),

    #[error("nothing to plot")]
    EmptyData,
}

impl PlotError {
    pub(crate) fn render<E: fmt::Display>(err: E) -> Self {
        PlotError::Render(err.to_string())
    }
}

/// A rendered SVG document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Svg(String);

impl Svg {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Svg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Svg> for String {
    fn from(svg: Svg) -> Self {
        svg.0
    }
}

/// Figure size and marker size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    /// Marker radius in pixels.
    pub point_size: u32,
}

impl Default for PlotConfig {
    /// A single 640 × 480 panel.
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            point_size: 3,
        }
    }
}

impl PlotConfig {
    /// A 900 × 900 figure for heatmaps and pair grids.
    pub fn grid() -> Self {
        Self {
            width: 900,
            height: 900,
            point_size: 2,
        }
    }

    pub fn builder() -> PlotConfigBuilder {
        PlotConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.width == 0 || self.height == 0 {
            return Err(OptionsError::InvalidPlotSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Builder for `PlotConfig`.
#[derive(Debug, Clone, Default)]
pub struct PlotConfigBuilder {
    config: PlotConfig,
}

impl PlotConfigBuilder {
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn point_size(mut self, size: u32) -> Self {
        self.config.point_size = size;
        self
    }

    pub fn build(self) -> Result<PlotConfig, OptionsError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// `[min, max]` of the finite values, widened by 5% (or by 1 when flat).
pub(crate) fn padded_range<'a>(values: impl IntoIterator<Item = &'a f64>) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if !lo.is_finite() {
        return (-1.0, 1.0);
    }
    let pad = if hi > lo { 0.05 * (hi - lo) } else { 1.0 };
    (lo - pad, hi + pad)
}
