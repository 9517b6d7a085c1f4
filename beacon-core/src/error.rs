use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unrecognised signaling message shape")]
    UnknownShape,
}
