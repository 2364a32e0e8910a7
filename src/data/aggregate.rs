use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{Pollutant, Record};

/// Mean concentrations of one (year, station) partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyAverage {
    pub year: i32,
    pub station: String,
    /// `None` when every PM2.5 value in the partition is missing.
    pub mean_pm2_5: Option<f64>,
    pub mean_pm10: Option<f64>,
    /// Half-width of the normal-approximation 95 % confidence interval of
    /// the mean; `None` with fewer than two values.
    pub ci95_pm2_5: Option<f64>,
    pub ci95_pm10: Option<f64>,
}

impl YearlyAverage {
    pub fn mean(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm25 => self.mean_pm2_5,
            Pollutant::Pm10 => self.mean_pm10,
        }
    }

    pub fn ci95(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm25 => self.ci95_pm2_5,
            Pollutant::Pm10 => self.ci95_pm10,
        }
    }
}

const Z_95: f64 = 1.96;

/// Running sum/count that skips missing values, plus Welford terms for the
/// spread.
#[derive(Debug, Default, Clone, Copy)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
    running_mean: f64,
    m2: f64,
}

impl MeanAccumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
            let delta = v - self.running_mean;
            self.running_mean += delta / self.count as f64;
            self.m2 += delta * (v - self.running_mean);
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    fn ci95(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        let n = self.count as f64;
        let std_dev = (self.m2 / (n - 1.0)).max(0.0).sqrt();
        Some(Z_95 * std_dev / n.sqrt())
    }
}

/// Group the view by `(year, station)` and average each pollutant.
///
/// Output is sorted by year, then station. Only pairs present in the view
/// appear; missing measurements are left out of both sum and count.
pub fn yearly_averages(view: &[&Record]) -> Vec<YearlyAverage> {
    let mut groups: BTreeMap<(i32, &str), [MeanAccumulator; 2]> = BTreeMap::new();

    for record in view {
        let accumulators = groups
            .entry((record.year, record.station.as_str()))
            .or_default();
        for (acc, pollutant) in accumulators.iter_mut().zip(Pollutant::ALL) {
            acc.push(record.value(pollutant));
        }
    }

    groups
        .into_iter()
        .map(|((year, station), [pm2_5, pm10])| YearlyAverage {
            year,
            station: station.to_string(),
            mean_pm2_5: pm2_5.mean(),
            mean_pm10: pm10.mean(),
            ci95_pm2_5: pm2_5.ci95(),
            ci95_pm10: pm10.ci95(),
        })
        .collect()
}
