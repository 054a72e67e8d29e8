//! Now-playing snapshot file
//!
//! The widget process cannot talk to the engine directly; it polls a
//! well-known JSON file instead. Writes go through a temp file in the same
//! directory followed by a rename, so the widget never observes a torn write.

use crate::error::Result;
use cadence_playback::NowPlaying;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writer/reader for the shared now-playing file
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Create a handle for the snapshot file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically replace the snapshot
    pub fn write(&self, snapshot: &NowPlaying) -> Result<()> {
        let payload = serde_json::to_vec_pretty(snapshot)?;

        let mut tmp = self.path.clone();
        tmp.set_extension("tmp");

        fs::write(&tmp, payload)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), "Snapshot written");
        Ok(())
    }

    /// Remove the snapshot ("nothing playing"); missing file is fine
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read the current snapshot; `None` when nothing is playing
    pub fn read(&self) -> Result<Option<NowPlaying>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}
