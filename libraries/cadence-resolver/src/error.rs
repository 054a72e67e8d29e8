//! Error types for source resolution

use thiserror::Error;

/// Resolution errors
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Local file missing from storage
    #[error("Track not found: {0}")]
    NotFound(String),

    /// Every configured mirror was tried and none produced a manifest
    #[error("All mirrors exhausted for track: {0}")]
    ResolutionFailed(String),

    /// HTTP transport failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A mirror answered, but the body was not a usable manifest
    #[error("Malformed manifest: {0}")]
    MalformedManifest(String),

    /// The manifest parsed but carried no variant we can play
    #[error("No playable variant in manifest")]
    NoPlayableVariant,

    /// A mirror base URL failed validation at construction time
    #[error("Invalid mirror URL: {0}")]
    InvalidMirror(String),
}

/// Result type for resolution operations
pub type Result<T> = std::result::Result<T, ResolveError>;
