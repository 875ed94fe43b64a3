use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Feed has {lines} line(s); expected two header lines and at least one data line")]
    EmptyFeed { lines: usize },

    #[error("Column '{column}' is not present in the feed header")]
    MissingColumn { column: String },

    #[error("No data available for column: {column}")]
    NoData { column: String },

    #[error("Feed fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Chart rendering error: {0}")]
    Chart(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Failures retrieving the raw feed text for a station.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Station {station_id} returned HTTP {status}")]
    Status {
        station_id: String,
        status: reqwest::StatusCode,
    },

    #[error("Could not read feed file: {0}")]
    Io(#[from] std::io::Error),
}

/// Reason a single data line was dropped while parsing a feed.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineError {
    #[error("only {found} field(s), need more than 5")]
    InsufficientFields { found: usize },

    #[error("invalid timestamp '{value}'")]
    InvalidTimestamp { value: String },

    #[error("{found} field(s), header requires {expected}")]
    TooFewFields { found: usize, expected: usize },

    #[error("invalid value '{value}' for column {column}")]
    InvalidValue { column: String, value: String },
}

impl LineError {
    /// Ragged lines are expected at the tail of real feeds and are not worth a warning.
    pub fn is_ragged(&self) -> bool {
        matches!(self, LineError::InsufficientFields { .. })
    }
}
