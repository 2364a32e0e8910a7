use std::collections::BTreeSet;

use super::model::{AirQualityDataset, Record};

// ---------------------------------------------------------------------------
// Filter predicate: selected stations and an inclusive year range
// ---------------------------------------------------------------------------

/// Current selection. An empty station set selects nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub stations: BTreeSet<String>,
    /// Inclusive `(lo, hi)`.
    pub years: (i32, i32),
}

impl FilterState {
    /// Whether a single record passes both predicates.
    pub fn matches(&self, record: &Record) -> bool {
        let (lo, hi) = self.years;
        self.stations.contains(&record.station) && lo <= record.year && record.year <= hi
    }
}

/// Initialise a [`FilterState`] with every station and the full year range selected.
pub fn init_filter_state(dataset: &AirQualityDataset) -> FilterState {
    FilterState {
        stations: dataset.stations.clone(),
        years: dataset.year_bounds.unwrap_or_default(),
    }
}

/// Return the records passing the filter, in dataset order.
///
/// No clamping happens here: a range with `lo > hi` simply matches nothing.
pub fn filtered_records<'a>(dataset: &'a AirQualityDataset, filter: &FilterState) -> Vec<&'a Record> {
    dataset
        .records
        .iter()
        .filter(|r| filter.matches(r))
        .collect()
}
