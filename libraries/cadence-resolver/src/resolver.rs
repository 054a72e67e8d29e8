//! Source resolver
//!
//! Turns a track reference into something the output layer can open: local
//! tracks resolve synchronously against the filesystem, remote tracks walk a
//! fixed ordered list of backend mirrors until one produces a parseable
//! stream manifest. Resolution has no side effects beyond its own cache.

use crate::cache::HandleCache;
use crate::error::{ResolveError, Result};
use crate::types::{PlayableHandle, StreamManifest};
use cadence_playback::{Track, TrackSource};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

/// Resolver configuration
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Backend mirror base URLs, tried in this order
    pub mirrors: Vec<String>,

    /// Handle cache lifetime. Keep shorter than the backend's stream-link
    /// expiry (default: 30 min)
    pub cache_ttl: Duration,

    /// Per-request timeout (default: 10s)
    pub request_timeout: Duration,

    /// Connection timeout (default: 5s)
    pub connect_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            mirrors: Vec::new(),
            cache_ttl: Duration::from_secs(30 * 60),
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl ResolverConfig {
    /// Configuration with the given mirror list and default timeouts
    pub fn with_mirrors<I, S>(mirrors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mirrors: mirrors.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Resolves track references to playable handles
///
/// Shared by reference across the composition root's resolution tasks; the
/// internal cache is behind a lock, everything else is immutable.
pub struct SourceResolver {
    http: Client,
    mirrors: Vec<Url>,
    cache: Mutex<HandleCache>,
}

impl SourceResolver {
    /// Create a resolver, validating the mirror URLs up front
    pub fn new(config: ResolverConfig) -> Result<Self> {
        let mut mirrors = Vec::with_capacity(config.mirrors.len());
        for raw in &config.mirrors {
            let normalized = if raw.ends_with('/') {
                raw.clone()
            } else {
                format!("{}/", raw)
            };
            let url = Url::parse(&normalized)
                .map_err(|e| ResolveError::InvalidMirror(format!("{}: {}", raw, e)))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ResolveError::InvalidMirror(format!(
                    "{}: scheme must be http or https",
                    raw
                )));
            }
            mirrors.push(url);
        }

        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("Cadence/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ResolveError::Request)?;

        Ok(Self {
            http,
            mirrors,
            cache: Mutex::new(HandleCache::new(config.cache_ttl)),
        })
    }

    /// Resolve a track to a playable handle
    ///
    /// Local tracks resolve immediately against the filesystem. Remote tracks
    /// hit the cache first, then walk the mirror list in order; a non-success
    /// status, a timeout and a malformed body all mean "try the next mirror".
    pub async fn resolve(&self, track: &Track) -> Result<PlayableHandle> {
        match &track.source {
            TrackSource::Local(path) => {
                if path.is_file() {
                    Ok(PlayableHandle::Local(path.clone()))
                } else {
                    Err(ResolveError::NotFound(path.display().to_string()))
                }
            }
            TrackSource::Remote(key) => self.resolve_remote(&track.id, key).await,
        }
    }

    /// Drop the cached handle for a track, forcing re-resolution on next use
    pub async fn invalidate(&self, track_id: &str) {
        self.cache.lock().await.invalidate(track_id);
    }

    /// Drop every cached handle
    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    async fn resolve_remote(&self, track_id: &str, key: &str) -> Result<PlayableHandle> {
        if let Some(handle) = self.cache.lock().await.get(track_id) {
            debug!(track_id, "Cache hit, skipping mirror walk");
            return Ok(handle);
        }

        for mirror in &self.mirrors {
            match self.fetch_manifest(mirror, key).await {
                Ok(manifest) => {
                    // First parseable manifest wins; an unplayable one is a
                    // hard failure, not a reason to keep walking
                    let variant = manifest
                        .best_variant()
                        .ok_or(ResolveError::NoPlayableVariant)?;

                    let handle = PlayableHandle::Stream {
                        url: variant.url.clone(),
                        bitrate_kbps: variant.bitrate_kbps,
                        codec: variant.codec.clone(),
                    };

                    info!(
                        track_id,
                        mirror = %mirror,
                        bitrate_kbps = variant.bitrate_kbps,
                        codec = %variant.codec,
                        "Resolved stream"
                    );

                    self.cache
                        .lock()
                        .await
                        .insert(track_id.to_string(), handle.clone());
                    return Ok(handle);
                }
                Err(e) => {
                    warn!(track_id, mirror = %mirror, error = %e, "Mirror failed, trying next");
                }
            }
        }

        Err(ResolveError::ResolutionFailed(track_id.to_string()))
    }

    async fn fetch_manifest(&self, mirror: &Url, key: &str) -> Result<StreamManifest> {
        let url = mirror
            .join(&format!("api/stream/{}", key))
            .map_err(|e| ResolveError::InvalidMirror(e.to_string()))?;

        debug!(url = %url, "Requesting manifest");

        let response = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()
            .map_err(ResolveError::Request)?;

        response
            .json::<StreamManifest>()
            .await
            .map_err(|e| ResolveError::MalformedManifest(e.to_string()))
    }
}
