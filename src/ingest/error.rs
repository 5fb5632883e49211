use thiserror::Error;

use crate::geo::CoordinateError;

#[derive(Debug, Error, PartialEq)]
pub enum TimestampError {
    #[error("malformed timestamp {0:?}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("data directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("coordinate error: {0}")]
    Coordinate(#[from] CoordinateError),
}
