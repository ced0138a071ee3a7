use thiserror::Error;

/// Error type returned by the dataset loader.
///
/// Only whole-source problems end up here. A row with a bad date or a blank
/// county is dropped and reported through [`crate::data::model::RowWarning`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// A column the engine cannot work without is absent from the header row.
    #[error("required column '{0}' missing")]
    MissingColumn(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    /// The source has no header row at all.
    #[error("source is empty (no header row found)")]
    Empty,

    /// The source parsed but does not have a tabular shape.
    #[error("malformed source: {0}")]
    Malformed(String),
}

/// Error type returned when writing the filtered rows out.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Error type for reading `dashboard.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}
