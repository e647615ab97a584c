//! Playback Events
//!
//! Event-based communication for UI synchronization. Every state mutation
//! emits at least one event; subscribers that fall behind miss events and
//! re-read state through the engine's accessors.

use cadenza_core::{PlayMode, TrackId};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Play/pause state changed
    StateChanged {
        is_playing: bool,
    },

    /// The current track changed (`None` after stop)
    TrackChanged {
        track_id: Option<TrackId>,
        index: Option<usize>,
    },

    /// Play URL resolution started or finished
    LoadingChanged {
        loading: bool,
    },

    /// Position or duration changed (seconds)
    PositionChanged {
        current_time: f64,
        duration: f64,
    },

    /// Volume or mute changed
    VolumeChanged {
        /// Volume level (0.0-1.0)
        volume: f32,
        is_muted: bool,
    },

    /// Play mode changed
    PlayModeChanged {
        mode: PlayMode,
    },

    /// Playlist contents changed
    PlaylistChanged {
        /// New playlist length
        length: usize,
    },

    /// Favorite flag changed on the current track or a playlist entry
    FavoriteChanged {
        track_id: TrackId,
        favorite: bool,
    },

    /// Play URL resolution failed for the latest selection
    PlayFailed {
        track_id: TrackId,
        message: String,
    },
}
