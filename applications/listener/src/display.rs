//! Terminal formatting for tracks and playback state

use cadenza_core::{PaginationSnapshot, Track};
use cadenza_playback::PlaybackState;

/// Format whole seconds as `m:ss`
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// One line per track: id, title, artist, length and a favorite marker
pub fn track_line(track: &Track) -> String {
    let favorite = if track.favorite { " *" } else { "" };
    let artist = if track.artist.is_empty() {
        "Unknown artist"
    } else {
        track.artist.as_str()
    };
    format!(
        "{:>6}  {} - {} ({}){}",
        track.id.get(),
        track.title,
        artist,
        format_duration(u64::from(track.duration)),
        favorite
    )
}

pub fn pagination_line(pagination: &PaginationSnapshot) -> String {
    format!(
        "page {}/{} ({} tracks)",
        pagination.page,
        pagination.total_pages.max(1),
        pagination.total
    )
}

/// Summary of the engine state after a playback command
pub fn playback_summary(state: &PlaybackState) -> String {
    let Some(track) = &state.current_track else {
        return format!(
            "stopped  [{}  volume {:.0}%]",
            state.play_mode.label(),
            state.volume * 100.0
        );
    };

    let status = if state.is_playing { "playing" } else { "paused" };
    let position = match state.current_index {
        Some(index) => format!("{}/{}", index + 1, state.playlist_len),
        None => format!("-/{}", state.playlist_len),
    };
    let volume = if state.is_muted {
        "muted".to_string()
    } else {
        format!("volume {:.0}%", state.volume * 100.0)
    };

    format!(
        "{status} {position}: {} - {} [{} / {}  {}  {}]\n  {}",
        track.title,
        track.artist,
        format_duration(state.current_time as u64),
        format_duration(state.duration as u64),
        state.play_mode.label(),
        volume,
        state.play_url.as_deref().unwrap_or("(no url)")
    )
}
