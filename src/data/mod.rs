/// Data layer: core types, loading, and the summary pipeline.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → AirQualityDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  stations + inclusive year range → filtered view
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  (year, station) → mean PM2.5 / PM10
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  trend    │  year-over-year change, most significant decrease
///   └──────────┘
/// ```
///
/// [`pipeline::summarize`] runs the last three stages in one pure call.

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod trend;
