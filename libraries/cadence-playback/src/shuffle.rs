//! Shuffle helpers for queue reordering
//!
//! Fisher-Yates permutations, including the pinned variant used when shuffle
//! is toggled mid-playback: the audible track is placed first and only the
//! remainder is randomized, so toggling never changes what is heard.

use crate::types::Track;
use rand::seq::SliceRandom;
use rand::thread_rng;

/// Shuffle tracks in place (Fisher-Yates)
pub fn shuffle_tracks(tracks: &mut [Track]) {
    let mut rng = thread_rng();
    tracks.shuffle(&mut rng);
}

/// Produce a shuffled copy of `tracks` with the track identified by
/// `pinned_id` moved to the front
///
/// If no track matches `pinned_id` the result is a plain shuffle.
pub fn shuffle_pinned(tracks: &[Track], pinned_id: &str) -> Vec<Track> {
    let mut shuffled: Vec<Track> = tracks.to_vec();
    shuffle_tracks(&mut shuffled);

    if let Some(pos) = shuffled.iter().position(|t| t.id == pinned_id) {
        let pinned = shuffled.remove(pos);
        shuffled.insert(0, pinned);
    }

    shuffled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrackSource;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::time::Duration;

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("Track {}", id),
            artist: "Test Artist".to_string(),
            duration: Duration::from_secs(180),
            source: TrackSource::Local(PathBuf::from(format!("/music/{}.mp3", id))),
        }
    }

    #[test]
    fn shuffle_preserves_all_tracks() {
        let mut tracks: Vec<Track> = (0..10).map(|i| track(&i.to_string())).collect();
        shuffle_tracks(&mut tracks);

        let ids: HashSet<String> = tracks.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn pinned_track_comes_first() {
        let tracks: Vec<Track> = (0..20).map(|i| track(&i.to_string())).collect();

        // Run a few times: the pin must hold regardless of the permutation
        for _ in 0..10 {
            let shuffled = shuffle_pinned(&tracks, "7");
            assert_eq!(shuffled[0].id, "7");
            assert_eq!(shuffled.len(), tracks.len());
        }
    }

    #[test]
    fn pinned_with_unknown_id_is_plain_shuffle() {
        let tracks: Vec<Track> = (0..5).map(|i| track(&i.to_string())).collect();
        let shuffled = shuffle_pinned(&tracks, "nope");

        let ids: HashSet<String> = shuffled.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids.len(), 5);
    }
}
