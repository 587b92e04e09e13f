//! AirSight Main Application
//! Main window with control panel and dashboard view.

use crate::charts::StaticChartRenderer;
use crate::data::{DataCleaner, DataLoader, MEASURE_COLUMNS};
use crate::gui::{ControlPanel, ControlPanelAction, DashboardView, ViewModel};
use crate::stats::StatsCalculator;
use egui::SidePanel;
use polars::prelude::*;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

use super::control_panel::{CoChart, TempChart, UserSettings, ViewKind};

/// Key for the persisted UI settings blob.
const SETTINGS_KEY: &str = "airsight_settings";

/// Load-and-clean result from background thread
enum LoadResult {
    Progress(f32, String),
    Complete { df: DataFrame, row_count: usize },
    Error(String),
}

/// Main application window.
pub struct AirSightApp {
    loader: DataLoader,
    control_panel: ControlPanel,
    dashboard: DashboardView,

    // Async CSV loading + cleaning
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl AirSightApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings: UserSettings = cc
            .storage
            .and_then(|storage| storage.get_string(SETTINGS_KEY))
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default();

        let mut control_panel = ControlPanel::new();
        control_panel.settings = settings;

        Self {
            loader: DataLoader::new(),
            control_panel,
            dashboard: DashboardView::new(),
            load_rx: None,
            is_loading: false,
        }
    }

    /// Handle CSV file selection: load and clean on a background thread
    /// so the UI stays responsive.
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return; // Already loading
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.dashboard.clear();
            self.control_panel.export_enabled = false;
            self.control_panel.settings.csv_path = Some(path.clone());
            self.control_panel.set_progress(5.0, "Loading CSV file...");
            self.is_loading = true;

            let (tx, rx) = channel();
            self.load_rx = Some(rx);

            let path_str = path.to_string_lossy().to_string();

            thread::spawn(move || {
                let _ = tx.send(LoadResult::Progress(20.0, "Reading CSV file...".to_string()));

                let mut loader = DataLoader::new();
                let result = loader
                    .load_csv(&path_str)
                    .map(|df| df.clone())
                    .map_err(anyhow::Error::from)
                    .and_then(|mut df| {
                        let _ =
                            tx.send(LoadResult::Progress(60.0, "Cleaning data...".to_string()));
                        DataCleaner::clean(&mut df)?;
                        Ok(df)
                    });

                match result {
                    Ok(df) => {
                        let _ = tx.send(LoadResult::Complete {
                            row_count: df.height(),
                            df,
                        });
                    }
                    Err(e) => {
                        let _ = tx.send(LoadResult::Error(e.to_string()));
                    }
                }
            });
        }
    }

    /// Check for load-and-clean results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    LoadResult::Complete { df, row_count } => {
                        log::info!("loaded and cleaned {row_count} rows");
                        self.loader.set_dataframe(df);
                        self.control_panel
                            .set_progress(100.0, &format!("Loaded {row_count} rows"));
                        self.is_loading = false;
                        should_keep_receiver = false;
                        self.refresh_view();
                    }
                    LoadResult::Error(error) => {
                        log::warn!("load failed: {error}");
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {error}"));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Recompute the dashboard view model for the current selection.
    /// Any failure clears the view and surfaces the message; a partial
    /// chart is never shown.
    fn refresh_view(&mut self) {
        let settings = self.control_panel.settings.clone();
        match Self::build_view_model(&self.loader, &settings) {
            Ok(Some(model)) => {
                self.control_panel.export_enabled =
                    !matches!(model, ViewModel::Overview { .. });
                self.dashboard.model = Some(model);
            }
            Ok(None) => {
                self.control_panel.export_enabled = false;
                self.dashboard.clear();
            }
            Err(e) => {
                log::warn!("view computation failed: {e}");
                self.control_panel.export_enabled = false;
                self.dashboard.clear();
                self.control_panel.set_progress(0.0, &format!("Error: {e}"));
            }
        }
    }

    /// Compute the selected view over the cleaned table.
    fn build_view_model(
        loader: &DataLoader,
        settings: &UserSettings,
    ) -> anyhow::Result<Option<ViewModel>> {
        let Some(df) = loader.get_dataframe() else {
            return Ok(None);
        };

        let model = match settings.view {
            ViewKind::Overview => {
                let years = StatsCalculator::column_values(df, "year");
                let year_span = if years.is_empty() {
                    (0, 0)
                } else {
                    let (lo, hi) = years
                        .iter()
                        .fold((f64::MAX, f64::MIN), |(lo, hi), &y| (lo.min(y), hi.max(y)));
                    (lo as i32, hi as i32)
                };

                let station = loader
                    .get_unique_values("station")
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| "-".to_string());

                let summaries = StatsCalculator::summarize_columns_parallel(df, &MEASURE_COLUMNS);

                let head = df.head(Some(10));
                let header: Vec<String> = head
                    .get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
                let mut sample_rows = Vec::with_capacity(head.height());
                for i in 0..head.height() {
                    let mut row = Vec::with_capacity(header.len());
                    for column in head.get_columns() {
                        let text = column
                            .get(i)
                            .map(|v| v.to_string())
                            .unwrap_or_default();
                        row.push(text.trim_matches('"').to_string());
                    }
                    sample_rows.push(row);
                }

                ViewModel::Overview {
                    row_count: df.height(),
                    station,
                    year_span,
                    summaries,
                    header,
                    sample_rows,
                }
            }
            ViewKind::Temperature => {
                let values = StatsCalculator::column_values(df, "TEMP");
                let mut summary = StatsCalculator::compute_summary(&values);
                summary.column = "TEMP".to_string();
                let series = StatsCalculator::monthly_means(df, "TEMP")?;

                ViewModel::MonthlyTemperature {
                    summary,
                    series,
                    trends: settings.temp_chart == TempChart::Trends,
                }
            }
            ViewKind::CoPollutant => match settings.co_chart {
                CoChart::HourlyProfile => {
                    let values = StatsCalculator::column_values(df, "CO");
                    let mut summary = StatsCalculator::compute_summary(&values);
                    summary.column = "CO".to_string();
                    let points = StatsCalculator::hourly_means(df, "CO")?;

                    ViewModel::HourlyCo { summary, points }
                }
                CoChart::VsPm25 | CoChart::VsPm10 => {
                    let pollutant = if settings.co_chart == CoChart::VsPm25 {
                        "PM2.5"
                    } else {
                        "PM10"
                    };
                    let (xs, ys) = StatsCalculator::paired_values(df, "CO", pollutant);
                    let fit = StatsCalculator::linear_fit(&xs, &ys);
                    let correlation = StatsCalculator::pearson(&xs, &ys);
                    let mut summary = StatsCalculator::compute_summary(&ys);
                    summary.column = pollutant.to_string();

                    ViewModel::PollutantScatter {
                        pollutant: pollutant.to_string(),
                        summary,
                        correlation,
                        xs,
                        ys,
                        fit,
                    }
                }
            },
        };

        Ok(Some(model))
    }

    /// Export the currently displayed chart as a PNG file.
    fn handle_export_png(&mut self) {
        let Some(model) = &self.dashboard.model else {
            self.control_panel.set_progress(0.0, "No chart to export");
            return;
        };
        if matches!(model, ViewModel::Overview { .. }) {
            self.control_panel
                .set_progress(0.0, "Overview has no chart to export");
            return;
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("airsight_chart.png")
            .save_file()
        else {
            return; // User cancelled
        };

        self.control_panel.set_progress(50.0, "Rendering chart...");

        let result = match model {
            ViewModel::Overview { .. } => unreachable!(),
            ViewModel::MonthlyTemperature { series, trends, .. } => {
                if *trends {
                    StaticChartRenderer::render_trend_chart(
                        &path,
                        series,
                        "Temperature Trends",
                        "Temperature (°C)",
                    )
                } else {
                    StaticChartRenderer::render_monthly_chart(
                        &path,
                        series,
                        "Average Temperature per Month",
                        "Temperature (°C)",
                    )
                }
            }
            ViewModel::HourlyCo { points, .. } => StaticChartRenderer::render_hourly_chart(
                &path,
                points,
                "CO by Hour of Day",
                "CO (μg/m³)",
            ),
            ViewModel::PollutantScatter {
                pollutant, xs, ys, fit, ..
            } => StaticChartRenderer::render_scatter_chart(
                &path,
                xs,
                ys,
                fit,
                &format!("CO and {pollutant} relationship"),
                "CO (μg/m³)",
                &format!("{pollutant} (μg/m³)"),
            ),
        };

        match result {
            Ok(()) => {
                log::info!("chart exported to {}", path.display());
                self.control_panel.set_progress(100.0, "Chart exported");
            }
            Err(e) => {
                self.control_panel
                    .set_progress(0.0, &format!("Error: {e}"));
            }
        }
    }
}

impl eframe::App for AirSightApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::SelectionChanged => self.refresh_view(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard.show(ui);
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Ok(json) = serde_json::to_string(&self.control_panel.settings) {
            storage.set_string(SETTINGS_KEY, json);
        }
    }
}
