use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Rejected input; the message is shown to clients verbatim.
    #[error("{0}")]
    Validation(String),
    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ModelError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}
