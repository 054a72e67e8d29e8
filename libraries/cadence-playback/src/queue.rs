//! Ordered play queue with cursor, shuffle and repeat
//!
//! Exactly one ordering is active at a time: the insertion ordering, or a
//! shuffled permutation of the same track set. The inactive ordering is
//! retained so disabling shuffle restores the prior sequence. The cursor
//! always tracks the same logical track across mutations; it is recomputed by
//! track id rather than assumed stable across index shifts.
//!
//! All index-based operations are no-ops on out-of-range indices: stale
//! UI-issued indices must never crash the engine.

use crate::shuffle::{shuffle_pinned, shuffle_tracks};
use crate::types::{RepeatMode, Track};

/// Result of advancing the cursor
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// Repeat-one: the same track plays again from the start
    Restarted,

    /// Cursor moved to this track
    Moved(Track),

    /// Queue end reached with no wrap; cursor cleared
    Exhausted,
}

/// Result of removing an entry
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveOutcome {
    /// The currently playing entry was removed. `next` is the repaired
    /// current track, or `None` when playback should halt.
    RemovedCurrent { next: Option<Track> },

    /// A non-current entry was removed; cursor already repaired
    Removed,

    /// Index was out of range; nothing changed
    OutOfRange,
}

/// The play queue
#[derive(Debug, Clone)]
pub struct Queue {
    /// Insertion ordering
    original: Vec<Track>,

    /// Active shuffled permutation, when shuffle is on
    shuffled: Option<Vec<Track>>,

    /// Index of the current entry in the active ordering
    cursor: Option<usize>,

    /// Repeat policy
    repeat: RepeatMode,
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl Queue {
    /// Create a new empty queue
    pub fn new() -> Self {
        Self {
            original: Vec::new(),
            shuffled: None,
            cursor: None,
            repeat: RepeatMode::Off,
        }
    }

    /// Tracks in the active ordering
    pub fn tracks(&self) -> &[Track] {
        self.shuffled.as_deref().unwrap_or(&self.original)
    }

    fn tracks_mut(&mut self) -> &mut Vec<Track> {
        self.shuffled.as_mut().unwrap_or(&mut self.original)
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.original.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    /// Whether the shuffled ordering is active
    pub fn is_shuffled(&self) -> bool {
        self.shuffled.is_some()
    }

    /// The current entry, if any
    pub fn current(&self) -> Option<&Track> {
        self.cursor.and_then(|c| self.tracks().get(c))
    }

    /// Cursor position in the active ordering
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Current repeat mode
    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    /// Set the repeat mode
    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    /// Replace the queue for an explicit "play now" request
    ///
    /// The queue becomes `context` (or the singleton `[track]`), the cursor
    /// points at `track`, and if shuffle is active a fresh permutation is
    /// drawn with the requested track pinned first.
    pub fn play_now(&mut self, track: Track, context: Option<Vec<Track>>) {
        let mut tracks = context.unwrap_or_else(|| vec![track.clone()]);
        if !tracks.iter().any(|t| t.id == track.id) {
            tracks.insert(0, track.clone());
        }

        let shuffle_on = self.shuffled.is_some();
        self.original = tracks;

        if shuffle_on {
            self.shuffled = Some(shuffle_pinned(&self.original, &track.id));
            self.cursor = Some(0);
        } else {
            self.cursor = self.original.iter().position(|t| t.id == track.id);
        }
    }

    /// Append a track to the end of the active ordering
    pub fn enqueue(&mut self, track: Track) {
        if let Some(ref mut shuffled) = self.shuffled {
            shuffled.push(track.clone());
        }
        self.original.push(track);
    }

    /// Remove the entry at `index` in the active ordering
    pub fn remove_at(&mut self, index: usize) -> RemoveOutcome {
        if index >= self.tracks().len() {
            return RemoveOutcome::OutOfRange;
        }

        let removed_id = self.tracks()[index].id.clone();
        let was_current = self.cursor == Some(index);

        if let Some(ref mut shuffled) = self.shuffled {
            shuffled.remove(index);
            // Remove exactly one counterpart: the id may legitimately appear
            // twice (play_now entry plus a later enqueue of the same track)
            if let Some(pos) = self.original.iter().position(|t| t.id == removed_id) {
                self.original.remove(pos);
            }
        } else {
            self.original.remove(index);
        }

        match self.cursor {
            Some(c) if was_current => {
                let len = self.tracks().len();
                if len == 0 {
                    self.cursor = None;
                    return RemoveOutcome::RemovedCurrent { next: None };
                }

                // Continue on the entry that followed the removed one,
                // wrapping only under repeat-all.
                let next_index = if c < len {
                    c
                } else if self.repeat == RepeatMode::All {
                    0
                } else {
                    self.cursor = None;
                    return RemoveOutcome::RemovedCurrent { next: None };
                };

                self.cursor = Some(next_index);
                RemoveOutcome::RemovedCurrent {
                    next: Some(self.tracks()[next_index].clone()),
                }
            }
            Some(c) if index < c => {
                self.cursor = Some(c - 1);
                RemoveOutcome::Removed
            }
            _ => RemoveOutcome::Removed,
        }
    }

    /// Move an entry from `from` to `to` in the active ordering
    ///
    /// No-op on out-of-range indices. The cursor keeps following the same
    /// logical track.
    pub fn move_track(&mut self, from: usize, to: usize) {
        let len = self.tracks().len();
        if from >= len || to >= len || from == to {
            return;
        }

        let current_id = self.current().map(|t| t.id.clone());

        let tracks = self.tracks_mut();
        let track = tracks.remove(from);
        tracks.insert(to, track);

        if let Some(id) = current_id {
            self.cursor = self.tracks().iter().position(|t| t.id == id);
        }
    }

    /// Move the entry at `index` to directly after the current one
    pub fn move_to_play_next(&mut self, index: usize) {
        let len = self.tracks().len();
        if index >= len {
            return;
        }

        let Some(cursor) = self.cursor else {
            // Nothing playing: "next" means the front of the queue
            self.move_track(index, 0);
            return;
        };

        if index == cursor {
            return;
        }

        // Removal shifts the cursor down when the moved entry precedes it
        let target = if index > cursor { cursor + 1 } else { cursor };
        let current_id = self.current().map(|t| t.id.clone());

        let tracks = self.tracks_mut();
        let track = tracks.remove(index);
        tracks.insert(target, track);

        if let Some(id) = current_id {
            self.cursor = self.tracks().iter().position(|t| t.id == id);
        }
    }

    /// Position the cursor at the head of the queue
    ///
    /// Used by `play` from `Idle`/`Stopped` when no entry is current.
    pub fn start(&mut self) -> Option<Track> {
        if self.cursor.is_none() && !self.is_empty() {
            self.cursor = Some(0);
        }
        self.current().cloned()
    }

    /// Advance the cursor per the repeat policy
    pub fn advance(&mut self) -> AdvanceOutcome {
        if self.repeat == RepeatMode::One && self.current().is_some() {
            return AdvanceOutcome::Restarted;
        }
        self.advance_forward()
    }

    /// Advance forward unconditionally, ignoring repeat-one
    ///
    /// Error recovery path: a failing track must not restart itself.
    pub fn advance_forward(&mut self) -> AdvanceOutcome {
        if self.is_empty() {
            self.cursor = None;
            return AdvanceOutcome::Exhausted;
        }

        let next_index = match self.cursor {
            None => Some(0),
            Some(c) if c + 1 < self.tracks().len() => Some(c + 1),
            Some(_) if self.repeat == RepeatMode::All => Some(0),
            Some(_) => None,
        };

        match next_index {
            Some(i) => {
                self.cursor = Some(i);
                AdvanceOutcome::Moved(self.tracks()[i].clone())
            }
            None => {
                self.cursor = None;
                AdvanceOutcome::Exhausted
            }
        }
    }

    /// Move the cursor back one entry, wrapping only under repeat-all
    ///
    /// Returns the new current track, or `None` when there is no previous
    /// entry to move to.
    pub fn step_back(&mut self) -> Option<Track> {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                self.current().cloned()
            }
            Some(_) if self.repeat == RepeatMode::All && !self.is_empty() => {
                self.cursor = Some(self.tracks().len() - 1);
                self.current().cloned()
            }
            _ => None,
        }
    }

    /// The track that would play after the current one, without advancing
    pub fn peek_next(&self) -> Option<&Track> {
        let c = self.cursor?;

        if self.repeat == RepeatMode::One {
            return self.tracks().get(c);
        }

        if c + 1 < self.tracks().len() {
            self.tracks().get(c + 1)
        } else if self.repeat == RepeatMode::All {
            self.tracks().first()
        } else {
            None
        }
    }

    /// Toggle between the insertion ordering and a fresh shuffled permutation
    ///
    /// Never changes which track is current: enabling shuffle pins the
    /// current track first in the new permutation; disabling relocates the
    /// cursor to the same track in the restored insertion ordering.
    pub fn toggle_shuffle(&mut self) {
        if self.shuffled.is_some() {
            let current_id = self.current().map(|t| t.id.clone());
            self.shuffled = None;
            self.cursor =
                current_id.and_then(|id| self.original.iter().position(|t| t.id == id));
        } else if let Some(current) = self.current() {
            let id = current.id.clone();
            self.shuffled = Some(shuffle_pinned(&self.original, &id));
            self.cursor = Some(0);
        } else {
            let mut permutation = self.original.clone();
            shuffle_tracks(&mut permutation);
            self.shuffled = Some(permutation);
        }
    }

    /// Clear the cursor without touching the track set
    pub(crate) fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    /// Point the cursor at the entry with `track_id` in the active ordering
    ///
    /// Used at crossfade handoff: the queue may have been reordered while the
    /// overlap ran, so the promoted track is located by identity rather than
    /// by stepping the cursor.
    pub(crate) fn relocate_cursor(&mut self, track_id: &str) {
        self.cursor = self.tracks().iter().position(|t| t.id == track_id);
    }
}
