use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("malformed coordinate {input:?}: {reason}")]
    Malformed { input: String, reason: String },
}

impl CoordinateError {
    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        CoordinateError::Malformed {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
