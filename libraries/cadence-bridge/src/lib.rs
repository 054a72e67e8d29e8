//! Cadence - Widget File Bridge
//!
//! The desktop widget runs in a separate process with no IPC channel to the
//! engine; this crate is the file-backed bridge between them:
//!
//! - [`SnapshotFile`]: the engine side atomically publishes the current
//!   [`NowPlaying`](cadence_playback::NowPlaying) snapshot as JSON; the
//!   widget polls it on its render cadence.
//! - [`CommandFile`]: the widget writes a timestamped command token
//!   (toggle / next / previous); the engine's composition root consumes it
//!   with [`CommandFile::take`], which drops tokens older than the freshness
//!   window instead of firing them late.
//!
//! Both files are written temp-then-rename, so neither side ever reads a
//! torn write.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_bridge::{CommandFile, SnapshotFile, WidgetAction};
//!
//! # fn example(snapshot: cadence_playback::NowPlaying) -> cadence_bridge::Result<()> {
//! let snapshots = SnapshotFile::new("/run/cadence/now_playing.json");
//! let commands = CommandFile::new("/run/cadence/command.json");
//!
//! // Engine side, on each published change:
//! snapshots.write(&snapshot)?;
//!
//! // Engine side, on each poll tick:
//! if let Some(action) = commands.take()? {
//!     match action {
//!         WidgetAction::Toggle => { /* engine.toggle() */ }
//!         WidgetAction::Next => { /* engine.advance() */ }
//!         WidgetAction::Previous => { /* engine.retreat() */ }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod command;
mod error;
mod snapshot;

// Public exports
pub use command::{CommandFile, WidgetAction, WidgetCommand};
pub use error::{BridgeError, Result};
pub use snapshot::SnapshotFile;
