use std::collections::BTreeMap;

use eframe::egui::{Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points, Polygon};

use crate::data::model::Pollutant;
use crate::state::AppState;

const PLOT_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Yearly average concentration (one line per station)
// ---------------------------------------------------------------------------

pub fn yearly_average_plot(ui: &mut Ui, state: &AppState, pollutant: Pollutant) {
    ui.strong(format!("Yearly Average {pollutant} Concentration"));

    // station → [(year, mean, ci95)], years already ascending.
    let mut series: BTreeMap<&str, Vec<(f64, f64, f64)>> = BTreeMap::new();
    for avg in &state.summary.yearly {
        if let Some(mean) = avg.mean(pollutant) {
            series.entry(avg.station.as_str()).or_default().push((
                f64::from(avg.year),
                mean,
                avg.ci95(pollutant).unwrap_or(0.0),
            ));
        }
    }

    Plot::new(("yearly_average", pollutant))
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label(format!("{pollutant} (µg/m³)"))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (station, stats) in series {
                let color = state.color_map.color_for(station);
                if stats.len() > 1 {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(confidence_band(&stats)))
                            .fill_color(color.gamma_multiply(0.2))
                            .stroke(Stroke::NONE),
                    );
                }
                let points: Vec<[f64; 2]> = stats.iter().map(|&(x, y, _)| [x, y]).collect();
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(station)
                        .color(color)
                        .width(2.0),
                );
                // Markers keep single-year stations visible.
                plot_ui.points(Points::new(points).radius(3.0).color(color));
            }
        });
}

/// Outline of the mean ± ci band: lower edge left to right, upper edge back.
fn confidence_band(stats: &[(f64, f64, f64)]) -> Vec<[f64; 2]> {
    stats
        .iter()
        .map(|&(x, y, ci)| [x, y - ci])
        .chain(stats.iter().rev().map(|&(x, y, ci)| [x, y + ci]))
        .collect()
}

// ---------------------------------------------------------------------------
// Year-over-year change (grouped bars per station)
// ---------------------------------------------------------------------------

pub fn pct_change_plot(ui: &mut Ui, state: &AppState, pollutant: Pollutant) {
    ui.strong(format!("Year-over-Year Change in {pollutant}"));

    let mut bars: BTreeMap<&str, Vec<(i32, f64)>> = BTreeMap::new();
    for row in &state.summary.trends {
        if let Some(change) = row.change(pollutant).value() {
            bars.entry(row.station.as_str())
                .or_default()
                .push((row.year, change * 100.0));
        }
    }

    // Side by side within each year.
    let group_width = 0.8;
    let bar_width = group_width / state.filters.stations.len().max(1) as f64;

    Plot::new(("pct_change", pollutant))
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Change (%)")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (slot, (station, changes)) in bars.into_iter().enumerate() {
                let offset = -group_width / 2.0 + bar_width * (slot as f64 + 0.5);
                let chart_bars = changes
                    .into_iter()
                    .map(|(year, pct)| {
                        Bar::new(f64::from(year) + offset, pct)
                            .width(bar_width)
                            .name(format!("{station} {year}"))
                    })
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(chart_bars)
                        .name(station)
                        .color(state.color_map.color_for(station)),
                );
            }
        });
}
