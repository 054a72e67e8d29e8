//! Error types for the playback engine

use thiserror::Error;

/// Playback errors
///
/// None of these are fatal: the worst case is playback halting in
/// `Idle`/`Stopped` with the error available for display.
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    /// File missing, or every backend mirror was exhausted
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// The output primitive rejected the resolved stream
    #[error("Decode failure: {0}")]
    DecodeFailure(String),

    /// Operation does not make sense in the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Queue is empty
    #[error("Queue is empty")]
    QueueEmpty,
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
