use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{finite, AirQualityDataset, Record};

const STATION: &str = "station";
const YEAR: &str = "year";
const PM2_5: [&str; 2] = ["PM2.5", "PM2_5"];
const PM10: [&str; 1] = ["PM10"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an air-quality dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `station`, `year`, `PM2.5`, `PM10` (extra columns ignored)
/// * `.json`    – `[{ "station": "...", "year": 2013, "PM2.5": 4.0, "PM10": null }, ...]`
/// * `.parquet` – same columns, measurement columns may be nullable
///
/// The whole file must parse; a bad row fails the load.
pub fn load_file(path: &Path) -> Result<AirQualityDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    Ok(AirQualityDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Cell parsing shared by the text formats
// ---------------------------------------------------------------------------

/// Parse a measurement cell. Empty, `NA` and `NaN` cells are missing values.
fn parse_measurement(s: &str, row: usize, column: &str) -> Result<Option<f64>, LoadError> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("na") || s.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    s.parse::<f64>()
        .map(finite)
        .map_err(|_| LoadError::InvalidNumber {
            row,
            column: column.to_string(),
            value: s.to_string(),
        })
}

/// Parse a year cell, accepting integral floats such as `2013.0`.
fn parse_year(s: &str, row: usize) -> Result<i32, LoadError> {
    let s = s.trim();
    if let Ok(year) = s.parse::<i32>() {
        return Ok(year);
    }
    let invalid = || LoadError::InvalidYear {
        row,
        value: s.to_string(),
    };
    let f = s.parse::<f64>().map_err(|_| invalid())?;
    integral_year(f).ok_or_else(invalid)
}

/// Years written as floats (pandas does this once a merge adds NaN) must be whole.
fn integral_year(f: f64) -> Option<i32> {
    (f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64).then_some(f as i32)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<Record>> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    records_from_csv(reader)
}

/// CSV layout: header row with column names, one observation per row.
/// Column lookup is by name; every other column is ignored.
fn records_from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<Record>> {
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let position = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.contains(&h.trim()))
            .ok_or_else(|| LoadError::MissingColumn(names[0].to_string()))
    };

    let station_idx = position(&[STATION])?;
    let year_idx = position(&[YEAR])?;
    let pm2_5_idx = position(&PM2_5)?;
    let pm10_idx = position(&PM10)?;

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        records.push(Record {
            station: cell(station_idx).trim().to_string(),
            year: parse_year(cell(year_idx), row_no)?,
            pm2_5: parse_measurement(cell(pm2_5_idx), row_no, PM2_5[0])?,
            pm10: parse_measurement(cell(pm10_idx), row_no, PM10[0])?,
        });
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// One element of a records-oriented JSON export.
#[derive(Debug, Deserialize)]
struct JsonRecord {
    station: String,
    year: f64,
    #[serde(rename = "PM2.5", alias = "PM2_5", default)]
    pm2_5: Option<f64>,
    #[serde(rename = "PM10", default)]
    pm10: Option<f64>,
}

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "station": "Dongsi", "year": 2013, "PM2.5": 9.0, "PM10": 9.0 },
///   { "station": "Dongsi", "year": 2013, "PM2.5": null, "PM10": 4.0 }
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    records_from_json(&text)
}

fn records_from_json(text: &str) -> Result<Vec<Record>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().ok_or(LoadError::NotAnArray)?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let rec = JsonRecord::deserialize(row).with_context(|| format!("Row {i}"))?;
            let year = integral_year(rec.year).ok_or_else(|| LoadError::InvalidYear {
                row: i,
                value: rec.year.to_string(),
            })?;
            Ok(Record {
                station: rec.station,
                year,
                pm2_5: rec.pm2_5.and_then(finite),
                pm10: rec.pm10.and_then(finite),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of observations.
///
/// Expected schema:
/// - `station`: Utf8 or LargeUtf8, non-null
/// - `year`: Int32 or Int64
/// - `PM2.5`, `PM10`: Float64, Float32, Int32 or Int64, nullable
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = records.len();
        records.extend(records_from_batch(&batch, offset)?);
    }

    Ok(records)
}

/// Convert one record batch; `offset` is the row number of its first row.
fn records_from_batch(batch: &RecordBatch, offset: usize) -> Result<Vec<Record>> {
    let schema = batch.schema();

    let stations = station_column(batch.column(column_index(&schema, &[STATION])?), offset)?;
    let years = year_column(batch.column(column_index(&schema, &[YEAR])?), offset)?;
    let pm2_5 = measurement_column(batch.column(column_index(&schema, &PM2_5)?), PM2_5[0])?;
    let pm10 = measurement_column(batch.column(column_index(&schema, &PM10)?), PM10[0])?;

    Ok(stations
        .into_iter()
        .zip(years)
        .zip(pm2_5.into_iter().zip(pm10))
        .map(|((station, year), (pm2_5, pm10))| Record {
            station,
            year,
            pm2_5,
            pm10,
        })
        .collect())
}

// -- Parquet / Arrow helpers --

fn column_index(schema: &Schema, names: &[&str]) -> Result<usize, LoadError> {
    names
        .iter()
        .find_map(|name| schema.index_of(name).ok())
        .ok_or_else(|| LoadError::MissingColumn(names[0].to_string()))
}

fn unsupported(column: &str, col: &ArrayRef) -> LoadError {
    LoadError::UnsupportedColumnType {
        column: column.to_string(),
        data_type: col.data_type().to_string(),
    }
}

fn station_column(col: &ArrayRef, offset: usize) -> Result<Vec<String>, LoadError> {
    let values: Vec<Option<&str>> = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().iter().collect(),
        DataType::LargeUtf8 => col.as_string::<i64>().iter().collect(),
        _ => return Err(unsupported(STATION, col)),
    };
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            v.map(str::to_string)
                .ok_or(LoadError::NullStation { row: offset + i })
        })
        .collect()
}

fn year_column(col: &ArrayRef, offset: usize) -> Result<Vec<i32>, LoadError> {
    let years: Vec<Option<i64>> = match col.data_type() {
        DataType::Int32 => col
            .as_primitive::<Int32Type>()
            .iter()
            .map(|v| v.map(i64::from))
            .collect(),
        DataType::Int64 => col.as_primitive::<Int64Type>().iter().collect(),
        _ => return Err(unsupported(YEAR, col)),
    };
    years
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            v.and_then(|y| i32::try_from(y).ok())
                .ok_or_else(|| LoadError::InvalidYear {
                    row: offset + i,
                    value: v.map(|y| y.to_string()).unwrap_or_else(|| "null".into()),
                })
        })
        .collect()
}

/// Nulls and non-finite values become missing measurements.
fn measurement_column(col: &ArrayRef, name: &str) -> Result<Vec<Option<f64>>, LoadError> {
    let values: Vec<Option<f64>> = match col.data_type() {
        DataType::Float64 => col.as_primitive::<Float64Type>().iter().collect(),
        DataType::Float32 => col
            .as_primitive::<Float32Type>()
            .iter()
            .map(|v| v.map(f64::from))
            .collect(),
        DataType::Int64 => col
            .as_primitive::<Int64Type>()
            .iter()
            .map(|v| v.map(|i| i as f64))
            .collect(),
        DataType::Int32 => col
            .as_primitive::<Int32Type>()
            .iter()
            .map(|v| v.map(f64::from))
            .collect(),
        _ => return Err(unsupported(name, col)),
    };
    Ok(values.into_iter().map(|v| v.and_then(finite)).collect())
}
