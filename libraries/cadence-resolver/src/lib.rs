//! Cadence - Source Resolution
//!
//! Turns track references into playable handles for the playback engine's
//! composition root:
//!
//! - Local tracks: filesystem existence check, synchronous
//! - Remote tracks: ordered walk of backend mirrors until one returns a
//!   parseable stream manifest; the highest-bitrate supported variant wins
//! - Successful remote resolutions are cached with a TTL shorter than the
//!   backend's stream-link expiry
//!
//! Resolution is side-effect free apart from the cache, so the composition
//! root can run it on any tokio task and marshal the result back to the
//! engine through `PlaybackEngine::complete_load`.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_resolver::{ResolverConfig, SourceResolver};
//!
//! # async fn example(track: cadence_playback::Track) -> cadence_resolver::Result<()> {
//! let resolver = SourceResolver::new(ResolverConfig::with_mirrors([
//!     "https://m1.example.com",
//!     "https://m2.example.com",
//! ]))?;
//!
//! let handle = resolver.resolve(&track).await?;
//! # let _ = handle;
//! # Ok(())
//! # }
//! ```

mod cache;
mod error;
mod resolver;
mod types;

// Public exports
pub use error::{ResolveError, Result};
pub use resolver::{ResolverConfig, SourceResolver};
pub use types::{PlayableHandle, StreamManifest, StreamVariant};
