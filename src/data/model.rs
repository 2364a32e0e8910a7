use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Pollutant – which concentration column a computation looks at
// ---------------------------------------------------------------------------

/// The particulate-matter measures tracked per observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Pollutant {
    #[serde(rename = "PM2.5")]
    Pm25,
    #[serde(rename = "PM10")]
    Pm10,
}

impl Pollutant {
    pub const ALL: [Pollutant; 2] = [Pollutant::Pm25, Pollutant::Pm10];

    /// Column name used in the source files.
    pub fn label(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the merged table
// ---------------------------------------------------------------------------

/// A single observation. `None` marks a missing measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub station: String,
    pub year: i32,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
}

impl Record {
    pub fn value(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm25 => self.pm2_5,
            Pollutant::Pm10 => self.pm10,
        }
    }
}

// ---------------------------------------------------------------------------
// AirQualityDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with its station / year domain pre-computed.
#[derive(Debug, Clone, Default)]
pub struct AirQualityDataset {
    /// All observations, in file order.
    pub records: Vec<Record>,
    /// Sorted distinct station identifiers.
    pub stations: BTreeSet<String>,
    /// Observed `(min, max)` year; `None` for an empty dataset.
    pub year_bounds: Option<(i32, i32)>,
}

impl AirQualityDataset {
    /// Build the domain indices from the loaded records.
    ///
    /// Station names are trimmed so every input format yields the same set.
    pub fn from_records(mut records: Vec<Record>) -> Self {
        for r in &mut records {
            let trimmed = r.station.trim();
            if trimmed.len() != r.station.len() {
                r.station = trimmed.to_string();
            }
        }
        let stations: BTreeSet<String> = records.iter().map(|r| r.station.clone()).collect();
        let year_bounds = records.iter().fold(None, |acc: Option<(i32, i32)>, r| {
            Some(match acc {
                Some((lo, hi)) => (lo.min(r.year), hi.max(r.year)),
                None => (r.year, r.year),
            })
        });

        AirQualityDataset {
            records,
            stations,
            year_bounds,
        }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Normalise a raw measurement: NaN and infinities count as missing.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(station: &str, year: i32) -> Record {
        Record {
            station: station.to_string(),
            year,
            pm2_5: Some(1.0),
            pm10: None,
        }
    }

    #[test]
    fn test_domain_from_records() {
        let ds = AirQualityDataset::from_records(vec![
            record("Guanyuan", 2015),
            record("Dongsi", 2013),
            record("Guanyuan", 2017),
        ]);
        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.stations.iter().cloned().collect::<Vec<_>>(),
            vec!["Dongsi".to_string(), "Guanyuan".to_string()]
        );
        assert_eq!(ds.year_bounds, Some((2013, 2017)));
    }

    #[test]
    fn test_station_names_are_trimmed() {
        let ds = AirQualityDataset::from_records(vec![
            record(" Dongsi", 2013),
            record("Dongsi\t", 2014),
            record("Guanyuan", 2014),
        ]);
        assert_eq!(ds.stations.len(), 2);
        assert!(ds.records.iter().all(|r| r.station == r.station.trim()));
        assert_eq!(ds.records[0].station, "Dongsi");
    }

    #[test]
    fn test_empty_dataset_has_no_bounds() {
        let ds = AirQualityDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.stations.is_empty());
        assert_eq!(ds.year_bounds, None);
    }

    #[test]
    fn test_value_accessor() {
        let r = record("A", 2013);
        assert_eq!(r.value(Pollutant::Pm25), Some(1.0));
        assert_eq!(r.value(Pollutant::Pm10), None);
    }

    #[test]
    fn test_finite() {
        assert_eq!(finite(3.5), Some(3.5));
        assert_eq!(finite(f64::NAN), None);
        assert_eq!(finite(f64::INFINITY), None);
    }
}
