//! Core types for playback management

use cadenza_core::{PlayMode, Track};
use serde::{Deserialize, Serialize};

/// Read-only snapshot of the engine's playback state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Current track merged with its resolved play info
    pub current_track: Option<Track>,

    /// Playlist position of the current track
    pub current_index: Option<usize>,

    pub is_playing: bool,

    /// Position in seconds
    pub current_time: f64,

    /// Duration in seconds (0 when unknown)
    pub duration: f64,

    /// Volume level (0.0-1.0)
    pub volume: f32,

    pub is_muted: bool,

    pub play_mode: PlayMode,

    pub play_url: Option<String>,

    /// A play URL resolution is in flight
    pub loading: bool,

    pub playlist_len: usize,

    /// Position as a percentage (0-100)
    pub progress: f64,

    pub has_prev: bool,

    pub has_next: bool,
}

impl PlaybackState {
    /// Id of the current track, if any
    pub fn current_track_id(&self) -> Option<cadenza_core::TrackId> {
        self.current_track.as_ref().map(|t| t.id)
    }

    pub fn is_playlist_empty(&self) -> bool {
        self.playlist_len == 0
    }
}

/// Configuration for the playback engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Buffered events per subscriber before slow ones start lagging
    /// (default: 64)
    pub event_capacity: usize,

    /// Seed for random play mode; `None` seeds from the OS
    pub random_seed: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            event_capacity: 64,
            random_seed: None,
        }
    }
}

/// Percentage of `current_time` within `duration` (0 when duration is 0)
pub(crate) fn progress_percent(current_time: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        0.0
    } else {
        current_time / duration * 100.0
    }
}
