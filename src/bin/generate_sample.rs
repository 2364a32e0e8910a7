use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const CSV_PATH: &str = "sample_air_quality.csv";
const PARQUET_PATH: &str = "sample_air_quality.parquet";

/// Share of measurements written as missing.
const MISSING_RATE: f64 = 0.02;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// A concentration sample, or `None` for a gap in the record.
    fn measurement(&mut self, mean: f64, std_dev: f64) -> Option<f64> {
        if self.next_f64() < MISSING_RATE {
            return None;
        }
        let v = self.gauss(mean, std_dev).max(2.0);
        Some((v * 10.0).round() / 10.0)
    }
}

/// One generated row.
struct Observation {
    year: i64,
    month: i64,
    day: i64,
    station: &'static str,
    pm2_5: Option<f64>,
    pm10: Option<f64>,
}

/// Winter-heavy seasonal factor, 1.0 on average.
fn seasonal(month: i64) -> f64 {
    1.0 + 0.4 * (2.0 * std::f64::consts::PI * (month as f64 - 1.0) / 12.0).cos()
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    // station, yearly PM2.5 base levels 2013..=2017, PM10/PM2.5 ratio
    let stations: [(&str, [f64; 5], f64); 2] = [
        ("Dongsi", [95.0, 88.0, 82.0, 74.0, 68.0], 1.25),
        ("Guanyuan", [90.0, 86.0, 76.0, 73.0, 70.0], 1.3),
    ];

    let mut rows = Vec::new();
    for (station, levels, ratio) in &stations {
        for (year, level) in (2013..=2017).zip(levels) {
            for month in 1..=12 {
                for day in 1..=28 {
                    let mean = level * seasonal(month);
                    rows.push(Observation {
                        year,
                        month,
                        day,
                        station: *station,
                        pm2_5: rng.measurement(mean, mean * 0.35),
                        pm10: rng.measurement(mean * ratio, mean * 0.4),
                    });
                }
            }
        }
    }

    write_csv(&rows)?;
    write_parquet(&rows)?;

    println!(
        "Wrote {} observations for {} stations to {CSV_PATH} and {PARQUET_PATH}",
        rows.len(),
        stations.len()
    );
    Ok(())
}

fn write_csv(rows: &[Observation]) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("creating CSV file")?;
    writer.write_record(["No", "year", "month", "day", "PM2.5", "PM10", "station"])?;

    let fmt = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_else(|| "NA".to_string());
    for (i, row) in rows.iter().enumerate() {
        writer.write_record([
            (i + 1).to_string(),
            row.year.to_string(),
            row.month.to_string(),
            row.day.to_string(),
            fmt(row.pm2_5),
            fmt(row.pm10),
            row.station.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(rows: &[Observation]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("year", DataType::Int64, false),
        Field::new("month", DataType::Int64, false),
        Field::new("day", DataType::Int64, false),
        Field::new("PM2.5", DataType::Float64, true),
        Field::new("PM10", DataType::Float64, true),
        Field::new("station", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.month))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.day))),
            Arc::new(rows.iter().map(|r| r.pm2_5).collect::<Float64Array>()),
            Arc::new(rows.iter().map(|r| r.pm10).collect::<Float64Array>()),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.station))),
        ],
    )
    .context("building record batch")?;

    let preview = batch.slice(0, batch.num_rows().min(5));
    arrow::util::pretty::print_batches(&[preview]).context("printing preview")?;

    let file = std::fs::File::create(PARQUET_PATH).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
