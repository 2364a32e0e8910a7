use serde::Serialize;

use super::aggregate::{yearly_averages, YearlyAverage};
use super::filter::{filtered_records, FilterState};
use super::model::{AirQualityDataset, Pollutant};
use super::trend::{most_significant_decreases, trend_rows, MinDecreaseRecord, TrendRow};

/// Everything the dashboard renders for one filter selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Number of records in the filtered view.
    pub view_len: usize,
    pub yearly: Vec<YearlyAverage>,
    pub trends: Vec<TrendRow>,
    pub pm2_5_decreases: Vec<MinDecreaseRecord>,
    pub pm10_decreases: Vec<MinDecreaseRecord>,
}

impl DashboardSummary {
    pub fn decreases(&self, pollutant: Pollutant) -> &[MinDecreaseRecord] {
        match pollutant {
            Pollutant::Pm25 => &self.pm2_5_decreases,
            Pollutant::Pm10 => &self.pm10_decreases,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.view_len == 0
    }
}

/// Run filter → aggregate → trend for one selection.
pub fn summarize(dataset: &AirQualityDataset, filter: &FilterState) -> DashboardSummary {
    let view = filtered_records(dataset, filter);
    let yearly = yearly_averages(&view);
    let trends = trend_rows(&yearly);

    log::debug!(
        "summarized {} of {} records into {} yearly averages",
        view.len(),
        dataset.len(),
        yearly.len()
    );

    DashboardSummary {
        view_len: view.len(),
        pm2_5_decreases: most_significant_decreases(&trends, Pollutant::Pm25),
        pm10_decreases: most_significant_decreases(&trends, Pollutant::Pm10),
        yearly,
        trends,
    }
}
