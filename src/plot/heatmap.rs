//! Correlation heatmap.

use super::{PlotConfig, PlotError, Svg};
use crate::diagnostics::CorrelationMatrix;
use plotters::prelude::*;

const COLORBAR_WIDTH: u32 = 100;

/// Blue for -1, white for 0, red for +1. NaN is grey.
fn diverging(value: f64) -> RGBColor {
    if value.is_nan() {
        return RGBColor(200, 200, 200);
    }
    let t = value.clamp(-1.0, 1.0);
    let fade = |c: u8| (255.0 - (255.0 - c as f64) * t.abs()).round() as u8;
    if t >= 0.0 {
        RGBColor(fade(180), fade(20), fade(40))
    } else {
        RGBColor(fade(30), fade(70), fade(170))
    }
}

/// Heatmap of the strict lower triangle of `matrix`.
///
/// The upper triangle and the diagonal are masked, so each pair appears once.
/// Row 0 is drawn at the top.
pub fn correlation_heatmap(
    matrix: &CorrelationMatrix,
    config: &PlotConfig,
) -> Result<Svg, PlotError> {
    config.validate()?;
    let k = matrix.size();
    if k == 0 {
        return Err(PlotError::EmptyData);
    }
    let names = matrix.names();
    let top = k as i32 - 1;

    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (config.width, config.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(PlotError::render)?;

        let (main, bar) =
            root.split_horizontally(config.width.saturating_sub(COLORBAR_WIDTH));

        let mut chart = ChartBuilder::on(&main)
            .caption("Correlation matrix", ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(80)
            .y_label_area_size(100)
            .build_cartesian_2d(
                (0..k as i32).into_segmented(),
                (0..k as i32).into_segmented(),
            )
            .map_err(PlotError::render)?;

        let x_label = |v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(j) => names.get(*j as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        };
        let y_label = |v: &SegmentValue<i32>| match v {
            SegmentValue::CenterOf(y) if *y <= top => names
                .get((top - *y) as usize)
                .cloned()
                .unwrap_or_default(),
            _ => String::new(),
        };

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(k)
            .y_labels(k)
            .x_label_formatter(&x_label)
            .y_label_formatter(&y_label)
            .label_style(("sans-serif", 12))
            .draw()
            .map_err(PlotError::render)?;

        let cells = (1..k).flat_map(|i| (0..i).map(move |j| (i, j)));
        chart
            .draw_series(cells.map(|(i, j)| {
                let x = j as i32;
                let y = top - i as i32;
                Rectangle::new(
                    [
                        (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                        (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
                    ],
                    diverging(matrix.get(i, j)).filled(),
                )
            }))
            .map_err(PlotError::render)?;

        draw_colorbar(&bar)?;
        root.present().map_err(PlotError::render)?;
    }

    tracing::trace!(columns = k, "rendered correlation heatmap");
    Ok(Svg(buf))
}

fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
) -> Result<(), PlotError> {
    const STEPS: usize = 50;

    let mut chart = ChartBuilder::on(area)
        .margin_top(60)
        .margin_bottom(90)
        .margin_right(10)
        .y_label_area_size(40)
        .build_cartesian_2d(0.0..1.0, -1.0..1.0)
        .map_err(PlotError::render)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(5)
        .draw()
        .map_err(PlotError::render)?;

    let step = 2.0 / STEPS as f64;
    chart
        .draw_series((0..STEPS).map(|s| {
            let lo = -1.0 + s as f64 * step;
            Rectangle::new(
                [(0.0, lo), (1.0, lo + step)],
                diverging(lo + step / 2.0).filled(),
            )
        }))
        .map_err(PlotError::render)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataFrame;

    #[test]
    fn test_diverging_endpoints() {
        assert_eq!(diverging(0.0), RGBColor(255, 255, 255));
        assert_eq!(diverging(1.0), RGBColor(180, 20, 40));
        assert_eq!(diverging(-1.0), RGBColor(30, 70, 170));
        assert_eq!(diverging(f64::NAN), RGBColor(200, 200, 200));
    }

    #[test]
    fn test_heatmap_renders_lower_triangle() {
        let df = DataFrame::new(vec![
            ("y", vec![1.0, 2.0, 3.0, 4.0]),
            ("a", vec![2.0, 4.0, 6.0, 9.0]),
            ("b", vec![4.0, 3.0, 1.0, 2.0]),
        ])
        .unwrap();
        let matrix = CorrelationMatrix::compute(&df);

        let svg = correlation_heatmap(&matrix, &PlotConfig::grid()).unwrap();
        let text = svg.as_str();
        assert!(text.contains("<svg"));
        assert!(text.contains("Correlation matrix"));
        assert!(text.contains("<rect"));
    }
}
