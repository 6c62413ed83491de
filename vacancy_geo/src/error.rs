//! Error types for the geocoding pipeline.

use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur while cleaning, geocoding or measuring vacancies.
///
/// Per-record problems (`MalformedCoordinateString`, `InvalidCoordinate`) are
/// recovered by the pipeline: the offending record is dropped and counted.
/// Everything else aborts the run.
#[derive(Error, Debug)]
pub enum GeoError {
    /// `location_coordinates` did not split into two numeric components
    #[error("Malformed coordinate string '{0}': expected \"<lat>,<lon>\"")]
    MalformedCoordinateString(String),

    /// Latitude or longitude outside the valid range
    #[error("Invalid coordinate ({latitude}, {longitude}): latitude must be within [-90, 90] and longitude within [-180, 180]")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// A column the pipeline depends on is absent
    #[error("Missing required column: {0}")]
    MissingRequiredColumn(String),

    /// A gazetteer row could not be turned into a reference city
    #[error("Invalid gazetteer entry at row {row}: {reason}")]
    InvalidGazetteerEntry { row: usize, reason: String },

    /// Configuration file could not be read, parsed or validated
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input file with an extension other than `.csv` or `.json`
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// DataFrame construction, CSV reading/writing or a frame operation failed
    #[error("DataFrame error: {0}")]
    DataFrame(#[from] polars::prelude::PolarsError),

    /// JSON parsing or serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeoError {
    /// Whether the pipeline recovers from this error by dropping a single record.
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            GeoError::MalformedCoordinateString(_) | GeoError::InvalidCoordinate { .. }
        )
    }
}
