//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::stats::{ColumnSummary, RegressionFit, YearSeries};
use egui::{Color32, RichText};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

/// Color palette for per-year series
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(255, 87, 34),   // Deep Orange
    Color32::from_rgb(121, 85, 72),   // Brown
];

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const CHART_HEIGHT: f32 = 420.0;

/// Creates dashboard visualizations using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for a series by index.
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Per-year monthly-mean lines over a month axis.
    pub fn draw_monthly_chart(ui: &mut egui::Ui, series: &[YearSeries], y_label: &str) {
        Plot::new("monthly_chart")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Month")
            .y_axis_label(y_label)
            .include_x(0.5)
            .include_x(12.5)
            // One grid mark per month so every label shows
            .x_grid_spacer(|_input| {
                (1..=12)
                    .map(|m| egui_plot::GridMark {
                        value: m as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .x_axis_formatter(|mark, _range| {
                let idx = mark.value.round() as i64;
                if (1..=12).contains(&idx) {
                    MONTH_NAMES[(idx - 1) as usize][..3].to_string()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (idx, year_series) in series.iter().enumerate() {
                    let color = Self::series_color(idx);
                    let points = year_series.points.clone();

                    plot_ui.line(
                        Line::new(PlotPoints::from(points.clone()))
                            .color(color)
                            .width(2.0)
                            .name(year_series.year.to_string()),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from(points))
                            .radius(3.5)
                            .color(color)
                            .name(year_series.year.to_string()),
                    );
                }
            });
    }

    /// One chronological line across the whole span, x = year + month
    /// fraction.
    pub fn draw_trend_chart(ui: &mut egui::Ui, series: &[YearSeries], y_label: &str) {
        let points: Vec<[f64; 2]> = series
            .iter()
            .flat_map(|ys| {
                let year = ys.year as f64;
                ys.points
                    .iter()
                    .map(move |p| [year + (p[0] - 1.0) / 12.0, p[1]])
            })
            .collect();

        Plot::new("trend_chart")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label(y_label)
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from(points))
                        .color(Self::series_color(0))
                        .width(2.0)
                        .name(y_label),
                );
            });
    }

    /// Hourly-profile line with point markers.
    pub fn draw_hourly_chart(ui: &mut egui::Ui, points: &[[f64; 2]], y_label: &str) {
        Plot::new("hourly_chart")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Hour")
            .y_axis_label(y_label)
            .include_x(-0.5)
            .include_x(23.5)
            .x_axis_formatter(|mark, _range| {
                let hour = mark.value.round() as i64;
                if (0..24).contains(&hour) && (mark.value - hour as f64).abs() < 1e-6 {
                    format!("{hour:02}")
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                let color = Self::series_color(0);
                plot_ui.line(
                    Line::new(PlotPoints::from(points.to_vec()))
                        .color(color)
                        .width(2.0)
                        .name(y_label),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(points.to_vec()))
                        .radius(3.5)
                        .color(color),
                );
            });
    }

    /// Scatter of (x, y) with the fitted regression line overlaid.
    pub fn draw_scatter_chart(
        ui: &mut egui::Ui,
        xs: &[f64],
        ys: &[f64],
        fit: &RegressionFit,
        x_label: &str,
        y_label: &str,
    ) {
        let scatter: Vec<[f64; 2]> = xs.iter().zip(ys).map(|(&x, &y)| [x, y]).collect();

        Plot::new(format!("scatter_{y_label}"))
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(PlotPoints::from(scatter))
                        .radius(2.0)
                        .color(Self::series_color(0).gamma_multiply(0.5))
                        .name("Observations"),
                );

                if fit.slope.is_finite() {
                    let (x_min, x_max) = xs.iter().fold((f64::MAX, f64::MIN), |(lo, hi), &x| {
                        (lo.min(x), hi.max(x))
                    });
                    plot_ui.line(
                        Line::new(PlotPoints::from(vec![
                            [x_min, fit.predict(x_min)],
                            [x_max, fit.predict(x_max)],
                        ]))
                        .color(Self::series_color(1))
                        .width(2.5)
                        .name("Linear fit"),
                    );
                }
            });
    }

    /// Draw the per-column summary statistics table.
    pub fn draw_summary_table(ui: &mut egui::Ui, summaries: &[ColumnSummary]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id("summary_table"))
                    .striped(true)
                    .min_col_width(60.0)
                    .spacing([10.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Column").strong().size(12.0));
                        ui.label(RichText::new("N").strong().size(12.0));
                        ui.label(RichText::new("Mean").strong().size(12.0));
                        ui.label(RichText::new("Median").strong().size(12.0));
                        ui.label(RichText::new("Std").strong().size(12.0));
                        ui.label(RichText::new("Min").strong().size(12.0));
                        ui.label(RichText::new("Max").strong().size(12.0));
                        ui.end_row();

                        for summary in summaries {
                            ui.label(RichText::new(&summary.column).size(12.0));
                            ui.label(RichText::new(summary.count.to_string()).size(12.0));
                            ui.label(RichText::new(format!("{:.3}", summary.mean)).size(12.0));
                            ui.label(RichText::new(format!("{:.3}", summary.median)).size(12.0));
                            ui.label(RichText::new(format!("{:.3}", summary.std)).size(12.0));
                            ui.label(RichText::new(format!("{:.3}", summary.min)).size(12.0));
                            ui.label(RichText::new(format!("{:.3}", summary.max)).size(12.0));
                            ui.end_row();
                        }
                    });
            });
    }

    /// Draw the first rows of the table as a preview grid.
    pub fn draw_sample_table(ui: &mut egui::Ui, header: &[String], rows: &[Vec<String>]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::ScrollArea::horizontal()
                    .id_salt("sample_table_scroll")
                    .show(ui, |ui| {
                        egui::Grid::new(ui.make_persistent_id("sample_table"))
                            .striped(true)
                            .min_col_width(46.0)
                            .spacing([10.0, 3.0])
                            .show(ui, |ui| {
                                for name in header {
                                    ui.label(RichText::new(name).strong().size(11.0));
                                }
                                ui.end_row();

                                for row in rows {
                                    for cell in row {
                                        ui.label(RichText::new(cell).size(11.0));
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });
    }
}
