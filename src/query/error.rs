use thiserror::Error;

use crate::ingest::TimestampError;

#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("unresolved query instant: {0}")]
    Unresolved(#[from] TimestampError),
}
