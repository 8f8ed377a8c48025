//! Error type shared by every backend module.

use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Search engine unavailable: {message}")]
    EngineUnavailable { message: String },
    #[error("Unexpected search engine response: {message}")]
    InvalidEngineResponse { message: String },
    #[error("Malformed occurrence record {record:?}: {message}")]
    MalformedOccurrenceRecord { record: String, message: String },
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },
    #[error("Report failed: {message}")]
    ReportingFailure { message: String },
    #[error("Failed to read config file at {path:?}.")]
    ReadConfig { path: PathBuf, source: std::io::Error },
    #[error("Failed to parse config file at {path:?}.")]
    ParseConfig { path: PathBuf, source: toml::de::Error },
    #[error("{message}")]
    Validation { message: String },
}

impl Error {
    pub fn empty_query() -> Self {
        Error::InvalidQuery { message: "no search text was given.".to_string() }
    }
}
