use thiserror::Error;

/// Errors that abort report generation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForecastError {
    #[error("Invalid date format: {0:?}")]
    InvalidDateFormat(String),
    #[error("Invalid range: {0}")]
    InvalidRangeSpec(String),
}

pub type Result<T> = std::result::Result<T, ForecastError>;

/// Error type for loading snapshots and configuration from disk.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Forecast(#[from] ForecastError),
    #[error("Configuration error: {0}")]
    Config(String),
}
