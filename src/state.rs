use std::path::Path;

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::data::filter::{init_filter_state, FilterState};
use crate::data::loader::load_file;
use crate::data::model::AirQualityDataset;
use crate::data::pipeline::{summarize, DashboardSummary};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<AirQualityDataset>,

    /// Current station / year selection.
    pub filters: FilterState,

    /// Pipeline output for `filters`, recomputed on every change.
    pub summary: DashboardSummary,

    /// Per-station colours shared by all charts.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset, select everything and summarise.
    pub fn set_dataset(&mut self, dataset: AirQualityDataset) {
        self.filters = init_filter_state(&dataset);
        self.color_map = ColorMap::new(&dataset.stations);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Load a file, keeping the current dataset if it fails.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records for stations {:?}, years {:?}",
                    dataset.len(),
                    dataset.stations,
                    dataset.year_bounds
                );
                if dataset.is_empty() {
                    log::warn!("{} contains no records", path.display());
                }
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Re-run the pipeline for the current selection.
    pub fn refilter(&mut self) {
        self.summary = match &self.dataset {
            Some(ds) => summarize(ds, &self.filters),
            None => DashboardSummary::default(),
        };
    }

    /// Toggle a single station in the selection.
    pub fn toggle_station(&mut self, station: &str) {
        if !self.filters.stations.remove(station) {
            self.filters.stations.insert(station.to_string());
        }
        self.refilter();
    }

    /// Select every station of the dataset.
    pub fn select_all(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters.stations = ds.stations.clone();
            self.refilter();
        }
    }

    /// Deselect all stations.
    pub fn select_none(&mut self) {
        self.filters.stations.clear();
        self.refilter();
    }

    /// Set the year range, clamped to the dataset's observed years with
    /// `lo <= hi`. Returns whether the selection changed.
    pub fn set_year_range(&mut self, lo: i32, hi: i32) -> bool {
        let Some((min, max)) = self.dataset.as_ref().and_then(|ds| ds.year_bounds) else {
            return false;
        };
        let lo = lo.clamp(min, max);
        let hi = hi.clamp(lo, max);
        if self.filters.years == (lo, hi) {
            return false;
        }
        self.filters.years = (lo, hi);
        self.refilter();
        true
    }

    /// Write the current summary as pretty JSON.
    pub fn export_summary(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &self.summary)
            .context("writing summary JSON")?;
        log::info!("Exported summary to {}", path.display());
        Ok(())
    }
}
