//! Static Chart Renderer
//! Renders the dashboard charts to PNG files via plotters, for export.

use crate::stats::{RegressionFit, YearSeries};
use anyhow::{anyhow, Result};
use plotters::prelude::*;
use std::path::Path;

use super::plotter::MONTH_NAMES;

const EXPORT_SIZE: (u32, u32) = (1400, 900);

/// Same ordering as the interactive palette so exports match the screen.
const SERIES_COLORS: [RGBColor; 10] = [
    RGBColor(52, 152, 219),
    RGBColor(231, 76, 60),
    RGBColor(46, 204, 113),
    RGBColor(155, 89, 182),
    RGBColor(243, 156, 18),
    RGBColor(26, 188, 156),
    RGBColor(233, 30, 99),
    RGBColor(0, 188, 212),
    RGBColor(255, 87, 34),
    RGBColor(121, 85, 72),
];

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Export the per-year monthly-mean chart as a PNG file.
    pub fn render_monthly_chart(
        path: &Path,
        series: &[YearSeries],
        title: &str,
        y_label: &str,
    ) -> Result<()> {
        let values: Vec<f64> = series
            .iter()
            .flat_map(|ys| ys.points.iter().map(|p| p[1]))
            .collect();
        let (y_min, y_max) = Self::padded_range(&values)?;

        let root = BitMapBackend::new(path, EXPORT_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("fill: {e}"))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 36))
            .margin(24)
            .x_label_area_size(56)
            .y_label_area_size(80)
            .build_cartesian_2d(0.5f64..12.5f64, y_min..y_max)
            .map_err(|e| anyhow!("chart layout: {e}"))?;

        chart
            .configure_mesh()
            .x_labels(12)
            .x_label_formatter(&|v| {
                let idx = v.round() as i64;
                if (1..=12).contains(&idx) {
                    MONTH_NAMES[(idx - 1) as usize][..3].to_string()
                } else {
                    String::new()
                }
            })
            .x_desc("Month")
            .y_desc(y_label)
            .draw()
            .map_err(|e| anyhow!("mesh: {e}"))?;

        for (idx, year_series) in series.iter().enumerate() {
            let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
            let points: Vec<(f64, f64)> =
                year_series.points.iter().map(|p| (p[0], p[1])).collect();

            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
                .map_err(|e| anyhow!("series: {e}"))?
                .label(year_series.year.to_string())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
                });
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
                )
                .map_err(|e| anyhow!("markers: {e}"))?;
        }

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.85))
            .draw()
            .map_err(|e| anyhow!("legend: {e}"))?;
        root.present().map_err(|e| anyhow!("write PNG: {e}"))?;
        Ok(())
    }

    /// Export the chronological trend chart as a PNG file.
    pub fn render_trend_chart(
        path: &Path,
        series: &[YearSeries],
        title: &str,
        y_label: &str,
    ) -> Result<()> {
        let points: Vec<(f64, f64)> = series
            .iter()
            .flat_map(|ys| {
                let year = ys.year as f64;
                ys.points
                    .iter()
                    .map(move |p| (year + (p[0] - 1.0) / 12.0, p[1]))
            })
            .collect();
        let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
        let values: Vec<f64> = points.iter().map(|p| p.1).collect();
        let (x_min, x_max) = Self::padded_range(&xs)?;
        let (y_min, y_max) = Self::padded_range(&values)?;

        let root = BitMapBackend::new(path, EXPORT_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("fill: {e}"))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 36))
            .margin(24)
            .x_label_area_size(56)
            .y_label_area_size(80)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(|e| anyhow!("chart layout: {e}"))?;

        chart
            .configure_mesh()
            .x_label_formatter(&|v| format!("{:.1}", v))
            .x_desc("Year")
            .y_desc(y_label)
            .draw()
            .map_err(|e| anyhow!("mesh: {e}"))?;

        chart
            .draw_series(LineSeries::new(points, SERIES_COLORS[0].stroke_width(2)))
            .map_err(|e| anyhow!("series: {e}"))?;

        root.present().map_err(|e| anyhow!("write PNG: {e}"))?;
        Ok(())
    }

    /// Export an hourly-profile chart as a PNG file.
    pub fn render_hourly_chart(
        path: &Path,
        points: &[[f64; 2]],
        title: &str,
        y_label: &str,
    ) -> Result<()> {
        let values: Vec<f64> = points.iter().map(|p| p[1]).collect();
        let (y_min, y_max) = Self::padded_range(&values)?;

        let root = BitMapBackend::new(path, EXPORT_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("fill: {e}"))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 36))
            .margin(24)
            .x_label_area_size(56)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.5f64..23.5f64, y_min..y_max)
            .map_err(|e| anyhow!("chart layout: {e}"))?;

        chart
            .configure_mesh()
            .x_labels(24)
            .x_label_formatter(&|v| format!("{:02}", v.round() as i64))
            .x_desc("Hour")
            .y_desc(y_label)
            .draw()
            .map_err(|e| anyhow!("mesh: {e}"))?;

        let color = SERIES_COLORS[0];
        let line: Vec<(f64, f64)> = points.iter().map(|p| (p[0], p[1])).collect();
        chart
            .draw_series(LineSeries::new(line.clone(), color.stroke_width(2)))
            .map_err(|e| anyhow!("series: {e}"))?;
        chart
            .draw_series(
                line.iter()
                    .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
            )
            .map_err(|e| anyhow!("markers: {e}"))?;

        root.present().map_err(|e| anyhow!("write PNG: {e}"))?;
        Ok(())
    }

    /// Export a scatter-with-fit chart as a PNG file.
    pub fn render_scatter_chart(
        path: &Path,
        xs: &[f64],
        ys: &[f64],
        fit: &RegressionFit,
        title: &str,
        x_label: &str,
        y_label: &str,
    ) -> Result<()> {
        let (x_min, x_max) = Self::padded_range(xs)?;
        let (y_min, y_max) = Self::padded_range(ys)?;

        let root = BitMapBackend::new(path, EXPORT_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("fill: {e}"))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 36))
            .margin(24)
            .x_label_area_size(56)
            .y_label_area_size(80)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(|e| anyhow!("chart layout: {e}"))?;

        chart
            .configure_mesh()
            .x_desc(x_label)
            .y_desc(y_label)
            .draw()
            .map_err(|e| anyhow!("mesh: {e}"))?;

        let color = SERIES_COLORS[0].mix(0.4);
        chart
            .draw_series(
                xs.iter()
                    .zip(ys)
                    .map(|(&x, &y)| Circle::new((x, y), 2, color.filled())),
            )
            .map_err(|e| anyhow!("points: {e}"))?;

        if fit.slope.is_finite() {
            let fit_color = SERIES_COLORS[1];
            chart
                .draw_series(LineSeries::new(
                    vec![(x_min, fit.predict(x_min)), (x_max, fit.predict(x_max))],
                    fit_color.stroke_width(3),
                ))
                .map_err(|e| anyhow!("fit line: {e}"))?
                .label("Linear fit")
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 18, y)], fit_color.stroke_width(3))
                });
            chart
                .configure_series_labels()
                .border_style(BLACK)
                .background_style(WHITE.mix(0.85))
                .draw()
                .map_err(|e| anyhow!("legend: {e}"))?;
        }

        root.present().map_err(|e| anyhow!("write PNG: {e}"))?;
        Ok(())
    }

    /// Axis range with 8% padding on both sides.
    fn padded_range(values: &[f64]) -> Result<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in values {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
        if !min.is_finite() {
            return Err(anyhow!("nothing to plot"));
        }
        let pad = ((max - min) * 0.08).max(1e-9);
        Ok((min - pad, max + pad))
    }
}
