//! Duplicate-free playlist
//!
//! Order is insertion order and only changes through explicit add/remove.

use std::collections::HashSet;

use cadenza_core::{Track, TrackId};

/// Ordered tracks available to the player, at most one entry per id
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `track` unless its id is already present.
    ///
    /// Returns the position of the track either way.
    pub fn push_unique(&mut self, track: Track) -> usize {
        if let Some(index) = self.position(track.id) {
            return index;
        }
        self.tracks.push(track);
        self.tracks.len() - 1
    }

    /// Replace every entry, keeping the first occurrence of each id
    pub fn replace(&mut self, tracks: Vec<Track>) {
        let mut seen = HashSet::with_capacity(tracks.len());
        self.tracks = tracks
            .into_iter()
            .filter(|track| seen.insert(track.id))
            .collect();
    }

    /// Remove the entry with `id`, returning its former position
    pub fn remove(&mut self, id: TrackId) -> Option<usize> {
        let index = self.position(id)?;
        self.tracks.remove(index);
        Some(index)
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    pub fn position(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Set the favorite flag on the entry with `id`.
    ///
    /// Returns `true` if the entry existed and its flag changed.
    pub fn set_favorite(&mut self, id: TrackId, favorite: bool) -> bool {
        let mut changed = false;
        for track in self.tracks.iter_mut().filter(|t| t.id == id) {
            changed |= track.favorite != favorite;
            track.favorite = favorite;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: u64) -> Track {
        Track::new(TrackId::new(id), format!("Track {}", id), "Artist")
    }

    fn ids(playlist: &Playlist) -> Vec<u64> {
        playlist.tracks().iter().map(|t| t.id.get()).collect()
    }

    #[test]
    fn push_unique_skips_existing_ids() {
        let mut playlist = Playlist::new();
        assert_eq!(playlist.push_unique(track(1)), 0);
        assert_eq!(playlist.push_unique(track(2)), 1);
        assert_eq!(playlist.push_unique(track(1)), 0);

        assert_eq!(ids(&playlist), vec![1, 2]);
    }

    #[test]
    fn replace_keeps_first_occurrence() {
        let mut playlist = Playlist::new();
        playlist.push_unique(track(9));

        playlist.replace(vec![track(3), track(1), track(3), track(2), track(1)]);

        assert_eq!(ids(&playlist), vec![3, 1, 2]);
    }

    #[test]
    fn remove_reports_position() {
        let mut playlist = Playlist::new();
        for id in 1..=3 {
            playlist.push_unique(track(id));
        }

        assert_eq!(playlist.remove(TrackId::new(2)), Some(1));
        assert_eq!(playlist.remove(TrackId::new(2)), None);
        assert_eq!(ids(&playlist), vec![1, 3]);
    }

    #[test]
    fn set_favorite_reports_change() {
        let mut playlist = Playlist::new();
        playlist.push_unique(track(1));

        assert!(playlist.set_favorite(TrackId::new(1), true));
        assert!(!playlist.set_favorite(TrackId::new(1), true));
        assert!(!playlist.set_favorite(TrackId::new(5), true));
        assert!(playlist.get(0).unwrap().favorite);
    }
}
