use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupted frame: {0}")]
    CorruptedFrame(String),
    #[error("connection closed before a reply arrived")]
    Disconnected,
    #[error("{0}")]
    Remote(String),
}
