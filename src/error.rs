use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrateError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Missing required CSV header: {0}")]
    MissingHeader(String),

    #[error("Missing required value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("Invalid institution name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Failed to parse configuration file {path:?}: {source}")]
    ConfigParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to parse cache file {path:?}: {source}")]
    CacheParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize geocode cache: {0}")]
    CacheEncodeError(serde_json::Error),

    #[error("API request error: {0}")]
    ApiRequestError(reqwest::Error),

    #[error("API returned an error status: {status} for query: {query}")]
    ApiStatusError {
        status: reqwest::StatusCode,
        query: String,
    },

    #[error("Failed to decode API JSON response: {0}")]
    ApiJsonDecodeError(reqwest::Error),

    #[error("Invalid coordinate {value:?} in API response for query: {query}")]
    InvalidCoordinate { value: String, query: String },

    #[error("Unexpected boundary GeoJSON structure: {0}")]
    BoundaryFormatError(String),
}

pub type Result<T> = std::result::Result<T, CrateError>;
