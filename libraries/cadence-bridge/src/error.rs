//! Error types for the widget bridge

use thiserror::Error;

/// Bridge errors
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Filesystem failure on the bridge files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A bridge file held something that was not the expected JSON
    #[error("Malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
