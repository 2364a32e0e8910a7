use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Pollutant;
use crate::data::trend::PctChange;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

fn format_mean(mean: Option<f64>) -> String {
    mean.map(|m| format!("{m:.2}")).unwrap_or_else(|| "—".to_string())
}

// ---------------------------------------------------------------------------
// Most significant decrease per station
// ---------------------------------------------------------------------------

pub fn decrease_table(ui: &mut Ui, state: &AppState, pollutant: Pollutant) {
    ui.strong(format!("Year with the most significant decrease in {pollutant}"));

    let records = state.summary.decreases(pollutant);
    if records.is_empty() {
        ui.label("Not enough years in the selection to compare.");
        return;
    }

    ui.push_id(("decrease_table", pollutant), |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(120.0))
            .column(Column::auto().at_least(60.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Station");
                });
                header.col(|ui| {
                    ui.strong("Year");
                });
                header.col(|ui| {
                    ui.strong(format!("{pollutant} change"));
                });
            })
            .body(|mut body| {
                for rec in records {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.colored_label(state.color_map.color_for(&rec.station), &rec.station);
                        });
                        row.col(|ui| {
                            ui.label(rec.year.to_string());
                        });
                        row.col(|ui| {
                            ui.label(PctChange::Defined(rec.change).to_string());
                        });
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Full trend table
// ---------------------------------------------------------------------------

pub fn trend_table(ui: &mut Ui, state: &AppState) {
    egui::CollapsingHeader::new("Yearly averages and changes")
        .default_open(false)
        .show(ui, |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .column(Column::auto().at_least(120.0))
                .columns(Column::auto().at_least(80.0), 5)
                .header(20.0, |mut header| {
                    for title in ["Station", "Year", "PM2.5", "PM2.5 change", "PM10", "PM10 change"] {
                        header.col(|ui| {
                            ui.strong(title);
                        });
                    }
                })
                .body(|body| {
                    let rows = &state.summary.trends;
                    body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                        let r = &rows[row.index()];
                        row.col(|ui| {
                            ui.label(&r.station);
                        });
                        row.col(|ui| {
                            ui.label(r.year.to_string());
                        });
                        row.col(|ui| {
                            ui.label(format_mean(r.mean_pm2_5));
                        });
                        row.col(|ui| {
                            ui.label(r.change_pm2_5.to_string());
                        });
                        row.col(|ui| {
                            ui.label(format_mean(r.mean_pm10));
                        });
                        row.col(|ui| {
                            ui.label(r.change_pm10.to_string());
                        });
                    });
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mean() {
        assert_eq!(format_mean(Some(12.345)), "12.35");
        assert_eq!(format_mean(None), "—");
    }
}
