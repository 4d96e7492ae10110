use std::io;
use thiserror::Error;

/// Error type for loading and exporting datasets.
///
/// Analysis functions never return this: they are total and signal
/// absence through `Option` or empty results.
#[derive(Error, Debug)]
pub enum LensError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV parsing or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Empty file or no data rows.
    #[error("No data found in the CSV input")]
    EmptyData,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Remote fetch failed.
    #[cfg(feature = "http")]
    #[error(transparent)]
    Http(#[from] crate::http::HttpError),
}

/// Result type alias for loading and exporting.
pub type Result<T> = std::result::Result<T, LensError>;
