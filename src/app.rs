use std::path::PathBuf;

use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::data::model::Pollutant;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AirQualityApp {
    pub state: AppState,
}

impl AirQualityApp {
    /// Create the app, loading `initial` right away if given.
    pub fn new(initial: Option<PathBuf>) -> Self {
        let mut app = Self::default();
        if let Some(path) = initial {
            app.state.load_path(&path);
        }
        app
    }
}

impl eframe::App for AirQualityApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: report ----
        egui::CentralPanel::default().show(ctx, |ui| {
            report(ui, &self.state);
        });
    }
}

fn report(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view air-quality data  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Air Quality Analysis Dashboard");
            ui.label(format!(
                "Yearly PM2.5 and PM10 concentration for {} station(s), {}–{}.",
                state.filters.stations.len(),
                state.filters.years.0,
                state.filters.years.1
            ));
            ui.separator();

            if state.summary.is_empty() {
                ui.label(RichText::new("No data for the current selection.").italics());
                return;
            }

            ui.columns(2, |cols| {
                plot::yearly_average_plot(&mut cols[0], state, Pollutant::Pm25);
                plot::yearly_average_plot(&mut cols[1], state, Pollutant::Pm10);
            });
            ui.add_space(8.0);

            ui.columns(2, |cols| {
                plot::pct_change_plot(&mut cols[0], state, Pollutant::Pm25);
                plot::pct_change_plot(&mut cols[1], state, Pollutant::Pm10);
            });
            ui.add_space(8.0);

            ui.heading("Most Significant Decrease in PM2.5 and PM10");
            ui.columns(2, |cols| {
                table::decrease_table(&mut cols[0], state, Pollutant::Pm25);
                table::decrease_table(&mut cols[1], state, Pollutant::Pm10);
            });
            ui.add_space(8.0);

            table::trend_table(ui, state);

            ui.separator();
            ui.label(
                RichText::new(format!(
                    "Historical measurements ({} records loaded); not real-time monitoring.",
                    dataset.len()
                ))
                .small()
                .weak(),
            );
        });
}
