//! Control Panel Widget
//! Left side panel with data source, view selection and export controls.

use egui::{Color32, ComboBox, RichText};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level dashboard view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewKind {
    #[default]
    Overview,
    Temperature,
    CoPollutant,
}

impl ViewKind {
    pub const ALL: [ViewKind; 3] = [
        ViewKind::Overview,
        ViewKind::Temperature,
        ViewKind::CoPollutant,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ViewKind::Overview => "Overview",
            ViewKind::Temperature => "Temperature Analysis",
            ViewKind::CoPollutant => "CO Pollutant",
        }
    }
}

/// Sub-chart of the temperature view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TempChart {
    #[default]
    ByMonth,
    Trends,
}

impl TempChart {
    pub const ALL: [TempChart; 2] = [TempChart::ByMonth, TempChart::Trends];

    pub fn label(self) -> &'static str {
        match self {
            TempChart::ByMonth => "Average Temperature by Month",
            TempChart::Trends => "Temperature Trends",
        }
    }
}

/// Sub-chart of the CO pollutant view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoChart {
    #[default]
    HourlyProfile,
    VsPm25,
    VsPm10,
}

impl CoChart {
    pub const ALL: [CoChart; 3] = [CoChart::HourlyProfile, CoChart::VsPm25, CoChart::VsPm10];

    pub fn label(self) -> &'static str {
        match self {
            CoChart::HourlyProfile => "CO Hourly Profile",
            CoChart::VsPm25 => "CO & PM2.5",
            CoChart::VsPm10 => "CO & PM10",
        }
    }
}

/// User settings, persisted across sessions through eframe storage.
#[derive(Default, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(skip)]
    pub csv_path: Option<PathBuf>,
    pub view: ViewKind,
    pub temp_chart: TempChart,
    pub co_chart: CoChart,
}

/// Left side control panel with file selection and view controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub progress: f32,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            progress: 0.0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌤 AirSight")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Air Quality Dashboard")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== View Selection Section =====
        ui.label(RichText::new("📊 View").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 110.0;
        let combo_width = 180.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Analysis:"));
            ComboBox::from_id_salt("view_kind")
                .width(combo_width)
                .selected_text(self.settings.view.label())
                .show_ui(ui, |ui| {
                    for view in ViewKind::ALL {
                        if ui
                            .selectable_label(self.settings.view == view, view.label())
                            .clicked()
                            && self.settings.view != view
                        {
                            self.settings.view = view;
                            action = ControlPanelAction::SelectionChanged;
                        }
                    }
                });
        });

        ui.add_space(5.0);

        // View-specific chart selector
        match self.settings.view {
            ViewKind::Overview => {}
            ViewKind::Temperature => {
                ui.horizontal(|ui| {
                    ui.add_sized([label_width, 20.0], egui::Label::new("Visualization:"));
                    ComboBox::from_id_salt("temp_chart")
                        .width(combo_width)
                        .selected_text(self.settings.temp_chart.label())
                        .show_ui(ui, |ui| {
                            for chart in TempChart::ALL {
                                if ui
                                    .selectable_label(
                                        self.settings.temp_chart == chart,
                                        chart.label(),
                                    )
                                    .clicked()
                                    && self.settings.temp_chart != chart
                                {
                                    self.settings.temp_chart = chart;
                                    action = ControlPanelAction::SelectionChanged;
                                }
                            }
                        });
                });
            }
            ViewKind::CoPollutant => {
                ui.horizontal(|ui| {
                    ui.add_sized([label_width, 20.0], egui::Label::new("Pollutant:"));
                    ComboBox::from_id_salt("co_chart")
                        .width(combo_width)
                        .selected_text(self.settings.co_chart.label())
                        .show_ui(ui, |ui| {
                            for chart in CoChart::ALL {
                                if ui
                                    .selectable_label(self.settings.co_chart == chart, chart.label())
                                    .clicked()
                                    && self.settings.co_chart != chart
                                {
                                    self.settings.co_chart = chart;
                                    action = ControlPanelAction::SelectionChanged;
                                }
                            }
                        });
                });
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(160.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("⏳ Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    SelectionChanged,
    ExportPng,
}
