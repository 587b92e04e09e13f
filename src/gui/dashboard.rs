//! Dashboard View Widget
//! Central panel rendering the currently selected analysis view.

use crate::charts::ChartPlotter;
use crate::stats::{ColumnSummary, RegressionFit, YearSeries};
use egui::{Color32, RichText, ScrollArea};

/// Everything the central panel needs to draw one view, computed once per
/// interaction instead of per frame.
pub enum ViewModel {
    Overview {
        row_count: usize,
        station: String,
        year_span: (i32, i32),
        summaries: Vec<ColumnSummary>,
        header: Vec<String>,
        sample_rows: Vec<Vec<String>>,
    },
    MonthlyTemperature {
        summary: ColumnSummary,
        series: Vec<YearSeries>,
        trends: bool,
    },
    HourlyCo {
        summary: ColumnSummary,
        points: Vec<[f64; 2]>,
    },
    PollutantScatter {
        pollutant: String,
        summary: ColumnSummary,
        correlation: f64,
        xs: Vec<f64>,
        ys: Vec<f64>,
        fit: RegressionFit,
    },
}

/// Central scrollable dashboard area.
#[derive(Default)]
pub struct DashboardView {
    pub model: Option<ViewModel>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.model = None;
    }

    /// Draw the current view model.
    pub fn show(&self, ui: &mut egui::Ui) {
        let Some(model) = &self.model else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match model {
                ViewModel::Overview {
                    row_count,
                    station,
                    year_span,
                    summaries,
                    header,
                    sample_rows,
                } => {
                    Self::section_title(ui, "Dataset Overview");
                    ui.label(
                        RichText::new(format!(
                            "Hourly air-quality readings measured at the {station} station."
                        ))
                        .size(13.0),
                    );
                    ui.add_space(10.0);

                    ui.horizontal(|ui| {
                        Self::metric_card(ui, "Total Rows", row_count.to_string());
                        Self::metric_card(ui, "Station", station.clone());
                        Self::metric_card(
                            ui,
                            "Collection Years",
                            format!("{} - {}", year_span.0, year_span.1),
                        );
                    });

                    ui.add_space(15.0);
                    Self::section_title(ui, "Measurement Summary");
                    ChartPlotter::draw_summary_table(ui, summaries);

                    ui.add_space(15.0);
                    Self::section_title(ui, "Data Sample");
                    ChartPlotter::draw_sample_table(ui, header, sample_rows);
                }
                ViewModel::MonthlyTemperature {
                    summary,
                    series,
                    trends,
                } => {
                    Self::section_title(ui, "Average Temperature Visualization");
                    ui.horizontal(|ui| {
                        Self::metric_card(ui, "Total Readings", summary.count.to_string());
                        Self::metric_card(ui, "Mean (°C)", format!("{:.2}", summary.mean));
                        Self::metric_card(ui, "Min (°C)", format!("{:.1}", summary.min));
                        Self::metric_card(ui, "Max (°C)", format!("{:.1}", summary.max));
                    });
                    ui.add_space(10.0);

                    if *trends {
                        ChartPlotter::draw_trend_chart(ui, series, "Temperature (°C)");
                    } else {
                        ChartPlotter::draw_monthly_chart(ui, series, "Temperature (°C)");
                    }
                }
                ViewModel::HourlyCo { summary, points } => {
                    Self::section_title(ui, "CO by Hour of Day");
                    ui.horizontal(|ui| {
                        Self::metric_card(ui, "Total Readings", summary.count.to_string());
                        Self::metric_card(ui, "Mean (μg/m³)", format!("{:.1}", summary.mean));
                        Self::metric_card(ui, "Min (μg/m³)", format!("{:.1}", summary.min));
                        Self::metric_card(ui, "Max (μg/m³)", format!("{:.1}", summary.max));
                    });
                    ui.add_space(10.0);

                    ChartPlotter::draw_hourly_chart(ui, points, "CO (μg/m³)");
                }
                ViewModel::PollutantScatter {
                    pollutant,
                    summary,
                    correlation,
                    xs,
                    ys,
                    fit,
                } => {
                    Self::section_title(ui, &format!("Correlation of CO and {pollutant}"));
                    ui.horizontal(|ui| {
                        Self::metric_card(ui, "Total Readings", summary.count.to_string());
                        Self::metric_card(
                            ui,
                            &format!("Mean {pollutant} (μg/m³)"),
                            format!("{:.1}", summary.mean),
                        );
                        Self::metric_card(ui, "Correlation", format!("{correlation:.4}"));
                        let p_text = if fit.p_value.is_nan() {
                            "-".to_string()
                        } else {
                            format!("{:.4}", fit.p_value)
                        };
                        Self::metric_card(ui, "Slope P-value", p_text);
                    });
                    ui.add_space(10.0);

                    ChartPlotter::draw_scatter_chart(
                        ui,
                        xs,
                        ys,
                        fit,
                        "CO (μg/m³)",
                        &format!("{pollutant} (μg/m³)"),
                    );
                }
            });
    }

    fn section_title(ui: &mut egui::Ui, text: &str) {
        ui.label(RichText::new(text).size(17.0).strong());
        ui.add_space(6.0);
    }

    /// A small framed metric, label above value.
    fn metric_card(ui: &mut egui::Ui, label: &str, value: String) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(6.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new(label).size(11.0).color(Color32::GRAY));
                    ui.label(RichText::new(value).size(16.0).strong());
                });
            });
        ui.add_space(8.0);
    }
}
