use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::aggregate::YearlyAverage;
use super::model::Pollutant;

// ---------------------------------------------------------------------------
// PctChange – one year-over-year change, with its undefined cases spelled out
// ---------------------------------------------------------------------------

/// Fractional change against the previous year of the same station.
///
/// Only [`PctChange::Defined`] takes part in minimum selection, so a zero
/// base can never surface as an infinity and a missing mean never as NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PctChange {
    /// First year of the station's sequence.
    NoPriorYear,
    /// Previous mean is zero, or one of the two means is missing.
    Undefined,
    /// `(current - previous) / previous`; `-0.75` is a 75 % decrease.
    Defined(f64),
}

impl PctChange {
    pub fn between(previous: Option<f64>, current: Option<f64>) -> Self {
        match (previous, current) {
            (Some(prev), Some(cur)) if prev != 0.0 => {
                let change = (cur - prev) / prev;
                if change.is_finite() {
                    PctChange::Defined(change)
                } else {
                    PctChange::Undefined
                }
            }
            _ => PctChange::Undefined,
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            PctChange::Defined(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for PctChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PctChange::Defined(v) => write!(f, "{:+.2}%", v * 100.0),
            PctChange::NoPriorYear | PctChange::Undefined => f.write_str("—"),
        }
    }
}

// ---------------------------------------------------------------------------
// Trend rows
// ---------------------------------------------------------------------------

/// A yearly average together with its change from the station's previous year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRow {
    pub station: String,
    pub year: i32,
    pub mean_pm2_5: Option<f64>,
    pub mean_pm10: Option<f64>,
    pub change_pm2_5: PctChange,
    pub change_pm10: PctChange,
}

impl TrendRow {
    pub fn change(&self, pollutant: Pollutant) -> PctChange {
        match pollutant {
            Pollutant::Pm25 => self.change_pm2_5,
            Pollutant::Pm10 => self.change_pm10,
        }
    }
}

/// Order averages by `(station, year)` and compute consecutive changes.
///
/// "Previous" is the previous year present for that station, gaps included.
pub fn trend_rows(averages: &[YearlyAverage]) -> Vec<TrendRow> {
    let mut by_station: BTreeMap<&str, Vec<&YearlyAverage>> = BTreeMap::new();
    for avg in averages {
        by_station.entry(avg.station.as_str()).or_default().push(avg);
    }

    let mut rows = Vec::with_capacity(averages.len());
    for (station, mut series) in by_station {
        // Stable, so duplicate years keep their input order.
        series.sort_by_key(|a| a.year);

        let mut previous: Option<&YearlyAverage> = None;
        for avg in series {
            let change = |p: Pollutant| match previous {
                Some(prev) => PctChange::between(prev.mean(p), avg.mean(p)),
                None => PctChange::NoPriorYear,
            };
            rows.push(TrendRow {
                station: station.to_string(),
                year: avg.year,
                mean_pm2_5: avg.mean_pm2_5,
                mean_pm10: avg.mean_pm10,
                change_pm2_5: change(Pollutant::Pm25),
                change_pm10: change(Pollutant::Pm10),
            });
            previous = Some(avg);
        }
    }
    rows
}

// ---------------------------------------------------------------------------
// Most significant decrease
// ---------------------------------------------------------------------------

/// The year with the smallest defined change for one station and pollutant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinDecreaseRecord {
    pub station: String,
    pub pollutant: Pollutant,
    pub year: i32,
    pub change: f64,
}

/// Per station, pick the row with the minimum defined change for `pollutant`.
///
/// Expects rows ordered by `(station, year)` as produced by [`trend_rows`].
/// Ties go to the earliest year. Stations without any defined change are
/// left out.
pub fn most_significant_decreases(rows: &[TrendRow], pollutant: Pollutant) -> Vec<MinDecreaseRecord> {
    let mut best: BTreeMap<&str, (i32, f64)> = BTreeMap::new();

    for row in rows {
        let Some(change) = row.change(pollutant).value() else {
            continue;
        };
        best.entry(row.station.as_str())
            .and_modify(|(year, min)| {
                if change < *min {
                    *year = row.year;
                    *min = change;
                }
            })
            .or_insert((row.year, change));
    }

    best.into_iter()
        .map(|(station, (year, change))| MinDecreaseRecord {
            station: station.to_string(),
            pollutant,
            year,
            change,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avg(station: &str, year: i32, pm2_5: Option<f64>, pm10: Option<f64>) -> YearlyAverage {
        YearlyAverage {
            year,
            station: station.to_string(),
            mean_pm2_5: pm2_5,
            mean_pm10: pm10,
            ci95_pm2_5: None,
            ci95_pm10: None,
        }
    }

    #[test]
    fn test_single_station_scenario() {
        let averages = vec![
            avg("A", 2013, Some(10.0), Some(1.0)),
            avg("A", 2014, Some(20.0), Some(1.0)),
            avg("A", 2015, Some(5.0), Some(1.0)),
        ];
        let rows = trend_rows(&averages);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].change_pm2_5, PctChange::NoPriorYear);
        assert_eq!(rows[1].change_pm2_5, PctChange::Defined(1.0));
        assert_eq!(rows[2].change_pm2_5, PctChange::Defined(-0.75));

        let mins = most_significant_decreases(&rows, Pollutant::Pm25);
        assert_eq!(
            mins,
            vec![MinDecreaseRecord {
                station: "A".into(),
                pollutant: Pollutant::Pm25,
                year: 2015,
                change: -0.75,
            }]
        );
    }

    #[test]
    fn test_rows_are_per_station_sequences() {
        // Aggregator order: year, then station.
        let averages = vec![
            avg("A", 2013, Some(10.0), None),
            avg("B", 2013, Some(100.0), None),
            avg("A", 2014, Some(5.0), None),
            avg("B", 2014, Some(50.0), None),
            avg("B", 2016, Some(100.0), None),
        ];
        let rows = trend_rows(&averages);
        let keys: Vec<(&str, i32)> = rows.iter().map(|r| (r.station.as_str(), r.year)).collect();
        assert_eq!(
            keys,
            vec![("A", 2013), ("A", 2014), ("B", 2013), ("B", 2014), ("B", 2016)]
        );
        assert_eq!(rows[2].change_pm2_5, PctChange::NoPriorYear);
        assert_eq!(rows[3].change_pm2_5, PctChange::Defined(-0.5));
        // Skipped year compares against the last present one.
        assert_eq!(rows[4].change_pm2_5, PctChange::Defined(1.0));
    }

    #[test]
    fn test_single_year_station_is_excluded() {
        let averages = vec![
            avg("A", 2013, Some(10.0), Some(10.0)),
            avg("B", 2013, Some(10.0), Some(10.0)),
            avg("B", 2014, Some(8.0), Some(12.0)),
        ];
        let rows = trend_rows(&averages);
        assert!(rows
            .iter()
            .filter(|r| r.station == "A")
            .all(|r| r.change_pm2_5.value().is_none() && r.change_pm10.value().is_none()));

        for pollutant in Pollutant::ALL {
            let mins = most_significant_decreases(&rows, pollutant);
            assert_eq!(mins.len(), 1);
            assert_eq!(mins[0].station, "B");
        }
    }

    #[test]
    fn test_tie_picks_earliest_year() {
        let averages = vec![
            avg("A", 2013, Some(100.0), None),
            avg("A", 2014, Some(50.0), None),
            avg("A", 2015, Some(100.0), None),
            avg("A", 2016, Some(50.0), None),
        ];
        let rows = trend_rows(&averages);
        let mins = most_significant_decreases(&rows, Pollutant::Pm25);
        assert_eq!(mins[0].year, 2014);
        assert_eq!(mins[0].change, -0.5);
    }

    #[test]
    fn test_minimum_may_be_an_increase() {
        let averages = vec![
            avg("A", 2013, Some(10.0), None),
            avg("A", 2014, Some(20.0), None),
            avg("A", 2015, Some(25.0), None),
        ];
        let mins = most_significant_decreases(&trend_rows(&averages), Pollutant::Pm25);
        assert_eq!(mins[0].year, 2015);
        assert_eq!(mins[0].change, 0.25);
    }

    #[test]
    fn test_zero_base_is_undefined() {
        let averages = vec![
            avg("A", 2013, Some(0.0), Some(10.0)),
            avg("A", 2014, Some(5.0), Some(9.0)),
        ];
        let rows = trend_rows(&averages);
        assert_eq!(rows[1].change_pm2_5, PctChange::Undefined);
        assert_eq!(rows[1].change_pm10, PctChange::Defined(-0.1));

        assert!(most_significant_decreases(&rows, Pollutant::Pm25).is_empty());
        assert_eq!(most_significant_decreases(&rows, Pollutant::Pm10).len(), 1);
    }

    #[test]
    fn test_zero_base_never_wins_minimum() {
        let averages = vec![
            avg("A", 2013, Some(10.0), None),
            avg("A", 2014, Some(0.0), None),
            avg("A", 2015, Some(5.0), None),
            avg("A", 2016, Some(4.0), None),
        ];
        let rows = trend_rows(&averages);
        assert_eq!(rows[1].change_pm2_5, PctChange::Defined(-1.0));
        assert_eq!(rows[2].change_pm2_5, PctChange::Undefined);
        let mins = most_significant_decreases(&rows, Pollutant::Pm25);
        assert_eq!(mins[0].year, 2014);
    }

    #[test]
    fn test_missing_mean_is_undefined() {
        assert_eq!(PctChange::between(None, Some(1.0)), PctChange::Undefined);
        assert_eq!(PctChange::between(Some(1.0), None), PctChange::Undefined);
        assert_eq!(PctChange::between(Some(2.0), Some(2.0)), PctChange::Defined(0.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(PctChange::Defined(-0.75).to_string(), "-75.00%");
        assert_eq!(PctChange::NoPriorYear.to_string(), "—");
    }

    #[test]
    fn test_empty_input() {
        assert!(trend_rows(&[]).is_empty());
        assert!(most_significant_decreases(&[], Pollutant::Pm10).is_empty());
    }
}
