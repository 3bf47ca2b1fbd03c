//! Pairwise scatter grid.

use super::{padded_range, PlotConfig, PlotError, Svg};
use crate::core::DataFrame;
use plotters::coord::Shift;
use plotters::prelude::*;

const BINS: usize = 10;

/// Bin edges and counts of `values` over `[lo, hi]`.
fn histogram(values: &[f64], lo: f64, hi: f64) -> Vec<(f64, f64, usize)> {
    let width = (hi - lo) / BINS as f64;
    let mut counts = [0usize; BINS];
    for &v in values.iter().filter(|v| v.is_finite()) {
        let bin = (((v - lo) / width).floor() as usize).min(BINS - 1);
        counts[bin] += 1;
    }
    counts
        .iter()
        .enumerate()
        .map(|(b, &c)| (lo + b as f64 * width, lo + (b + 1) as f64 * width, c))
        .collect()
}

/// A `k × k` grid over every column of `df`.
///
/// Panel `(i, j)` scatters column `j` (x) against column `i` (y); diagonal
/// panels hold a histogram of the column.
pub fn pair_grid(df: &DataFrame, config: &PlotConfig) -> Result<Svg, PlotError> {
    config.validate()?;
    let k = df.n_columns();
    if k == 0 || df.n_rows() == 0 {
        return Err(PlotError::EmptyData);
    }

    let columns: Vec<&[f64]> = (0..k).filter_map(|j| df.column_at(j)).collect();
    let ranges: Vec<(f64, f64)> = columns.iter().map(|c| padded_range(c.iter())).collect();
    let names = df.names();

    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (config.width, config.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(PlotError::render)?;

        for (idx, panel) in root.split_evenly((k, k)).iter().enumerate() {
            let (i, j) = (idx / k, idx % k);
            let x_desc = if i == k - 1 { names[j].as_str() } else { "" };
            let y_desc = if j == 0 { names[i].as_str() } else { "" };

            if i == j {
                draw_histogram(panel, columns[i], ranges[i], (x_desc, y_desc))?;
            } else {
                draw_scatter(
                    panel,
                    (columns[j], columns[i]),
                    (ranges[j], ranges[i]),
                    (x_desc, y_desc),
                    config.point_size,
                )?;
            }
        }

        root.present().map_err(PlotError::render)?;
    }

    tracing::trace!(columns = k, rows = df.n_rows(), "rendered pair grid");
    Ok(Svg(buf))
}

fn draw_scatter<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    (x, y): (&[f64], &[f64]),
    ((x0, x1), (y0, y1)): ((f64, f64), (f64, f64)),
    (x_desc, y_desc): (&str, &str),
    point_size: u32,
) -> Result<(), PlotError> {
    let mut chart = ChartBuilder::on(area)
        .margin(4)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(PlotError::render)?;

    chart
        .configure_mesh()
        .x_labels(3)
        .y_labels(3)
        .x_desc(x_desc)
        .y_desc(y_desc)
        .label_style(("sans-serif", 10))
        .draw()
        .map_err(PlotError::render)?;

    chart
        .draw_series(
            x.iter()
                .zip(y)
                .filter(|(a, b)| a.is_finite() && b.is_finite())
                .map(|(&a, &b)| Circle::new((a, b), point_size, BLUE.mix(0.6).filled())),
        )
        .map_err(PlotError::render)?;

    Ok(())
}

fn draw_histogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    values: &[f64],
    (lo, hi): (f64, f64),
    (x_desc, y_desc): (&str, &str),
) -> Result<(), PlotError> {
    let bins = histogram(values, lo, hi);
    let peak = bins.iter().map(|&(_, _, c)| c).max().unwrap_or(0).max(1);

    let mut chart = ChartBuilder::on(area)
        .margin(4)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(lo..hi, 0.0..peak as f64 * 1.1)
        .map_err(PlotError::render)?;

    chart
        .configure_mesh()
        .x_labels(3)
        .y_labels(3)
        .x_desc(x_desc)
        .y_desc(y_desc)
        .label_style(("sans-serif", 10))
        .draw()
        .map_err(PlotError::render)?;

    chart
        .draw_series(bins.iter().filter(|&&(_, _, c)| c > 0).map(|&(a, b, c)| {
            Rectangle::new([(a, 0.0), (b, c as f64)], BLUE.mix(0.5).filled())
        }))
        .map_err(PlotError::render)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts_every_value() {
        let values = [0.0, 0.5, 1.0, 9.99, 10.0, f64::NAN];
        let bins = histogram(&values, 0.0, 10.0);

        assert_eq!(bins.len(), BINS);
        assert_eq!(bins.iter().map(|b| b.2).sum::<usize>(), 5);
        assert_eq!(bins[0].2, 2);
        // The upper edge falls in the last bin.
        assert_eq!(bins[9].2, 2);
    }

    #[test]
    fn test_pair_grid_renders() {
        let df = DataFrame::new(vec![
            ("a", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            ("b", vec![2.0, 1.0, 4.0, 3.0, 6.0]),
        ])
        .unwrap();

        let svg = pair_grid(&df, &PlotConfig::grid()).unwrap();
        assert!(svg.as_str().contains("<svg"));
        assert!(svg.as_str().contains("circle"));
    }

    #[test]
    fn test_single_column_grid_is_one_histogram() {
        let df = DataFrame::new(vec![("a", vec![1.0, 1.0, 2.0])]).unwrap();
        let svg = pair_grid(&df, &PlotConfig::grid()).unwrap();
        assert!(svg.as_str().contains("<rect"));
    }
}
