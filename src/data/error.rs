use thiserror::Error;

/// Schema and value failures raised while reading an input file.
///
/// Rows are numbered from 0, excluding the CSV header.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: '{value}' is not a valid year")]
    InvalidYear { row: usize, value: String },

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: station is null")]
    NullStation { row: usize },

    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: String },

    #[error("expected top-level JSON array")]
    NotAnArray,
}
