//! Widget command channel
//!
//! The reverse direction of the bridge: the widget writes a single-command
//! JSON token, the engine's composition root polls `take`. Tokens carry the
//! issue timestamp; one outside the freshness window is consumed and dropped,
//! so a command written while the player was closed does not fire hours later
//! on the next launch.

use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Transport command the widget can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetAction {
    /// Toggle play/pause
    Toggle,
    /// Skip to the next track
    Next,
    /// Go back (restart or previous, per the engine's 3-second rule)
    Previous,
}

/// The on-disk command token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetCommand {
    /// Requested action
    pub action: WidgetAction,

    /// When the widget issued it (UTC)
    pub issued_at: DateTime<Utc>,
}

/// Reader/writer for the shared command file
pub struct CommandFile {
    path: PathBuf,
    freshness: Duration,
}

impl CommandFile {
    /// Create a handle with the default 5 second freshness window
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            freshness: Duration::seconds(5),
        }
    }

    /// Create a handle with a custom freshness window
    pub fn with_freshness(path: impl Into<PathBuf>, freshness: Duration) -> Self {
        Self {
            path: path.into(),
            freshness,
        }
    }

    /// The command file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Widget side: write a command token stamped with the current time
    ///
    /// A newer command overwrites an unconsumed older one; the channel holds
    /// at most one token.
    pub fn submit(&self, action: WidgetAction) -> Result<()> {
        self.submit_at(action, Utc::now())
    }

    fn submit_at(&self, action: WidgetAction, issued_at: DateTime<Utc>) -> Result<()> {
        let token = WidgetCommand { action, issued_at };
        let payload = serde_json::to_vec(&token)?;

        let mut tmp = self.path.clone();
        tmp.set_extension("tmp");
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Engine side: consume the pending token, if any
    ///
    /// The file is removed regardless of outcome. Returns the action only
    /// when the token is inside the freshness window.
    pub fn take(&self) -> Result<Option<WidgetAction>> {
        self.take_at(Utc::now())
    }

    fn take_at(&self, now: DateTime<Utc>) -> Result<Option<WidgetAction>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        fs::remove_file(&self.path)?;

        let token: WidgetCommand = serde_json::from_slice(&bytes)?;

        let age = now.signed_duration_since(token.issued_at);
        if age > self.freshness {
            warn!(action = ?token.action, age_ms = age.num_milliseconds(), "Dropping stale widget command");
            return Ok(None);
        }

        debug!(action = ?token.action, "Widget command consumed");
        Ok(Some(token.action))
    }
}
