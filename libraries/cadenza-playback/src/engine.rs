//! Playback engine - core orchestration
//!
//! Coordinates playlist, play mode, volume and play URL resolution. State
//! lives behind one mutex that is never held across an `.await`; the only
//! suspension point is the catalog call inside [`PlaybackEngine::play`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cadenza_core::{
    CatalogClient, FavoriteSync, PersistentSettings, PlayInfo, PlayMode, RequestTracker, Track,
    TrackId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::navigation;
use crate::playlist::Playlist;
use crate::types::{progress_percent, PlaybackConfig, PlaybackState};
use crate::volume::Volume;

/// Mutable engine state, only touched under the engine's lock
struct EngineState {
    playlist: Playlist,
    current: Option<Track>,
    current_index: Option<usize>,
    is_playing: bool,
    current_time: f64,
    duration: f64,
    volume: Volume,
    play_mode: PlayMode,
    play_url: Option<String>,
    requests: RequestTracker,
    /// Favorite flags applied while a play url was still resolving
    pending_favorites: HashMap<TrackId, bool>,
    rng: StdRng,
    /// Events produced under the lock, broadcast once it is released
    pending_events: Vec<PlaybackEvent>,
}

impl EngineState {
    fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }

    fn current_id(&self) -> Option<TrackId> {
        self.current.as_ref().map(|t| t.id)
    }

    fn set_playing(&mut self, playing: bool) {
        if self.is_playing != playing {
            self.is_playing = playing;
            self.emit(PlaybackEvent::StateChanged {
                is_playing: playing,
            });
        }
    }

    fn emit_position(&mut self) {
        self.emit(PlaybackEvent::PositionChanged {
            current_time: self.current_time,
            duration: self.duration,
        });
    }

    fn emit_track(&mut self) {
        self.emit(PlaybackEvent::TrackChanged {
            track_id: self.current_id(),
            index: self.current_index,
        });
    }

    fn emit_playlist(&mut self) {
        self.emit(PlaybackEvent::PlaylistChanged {
            length: self.playlist.len(),
        });
    }

    fn emit_volume(&mut self) {
        self.emit(PlaybackEvent::VolumeChanged {
            volume: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    fn has_prev(&self) -> bool {
        navigation::has_prev(self.play_mode, self.current_index, self.playlist.len())
    }

    fn has_next(&self) -> bool {
        navigation::has_next(self.play_mode, self.current_index, self.playlist.len())
    }

    fn prev_track(&mut self) -> Option<Track> {
        let index = navigation::prev_target(
            self.play_mode,
            self.current_index,
            self.playlist.len(),
            &mut self.rng,
        )?;
        self.playlist.get(index).cloned()
    }

    fn next_track(&mut self) -> Option<Track> {
        let index = navigation::next_target(
            self.play_mode,
            self.current_index,
            self.playlist.len(),
            &mut self.rng,
        )?;
        self.playlist.get(index).cloned()
    }

    fn seek_to(&mut self, time: f64) {
        if time.is_nan() {
            return;
        }
        self.current_time = time.clamp(0.0, self.duration);
        self.emit_position();
    }

    /// Install a freshly resolved track as the current one.
    fn commit_play(&mut self, mut track: Track, info: &PlayInfo) {
        if let Some(favorite) = self.pending_favorites.remove(&track.id) {
            track.favorite = favorite;
        }
        let mut current = track.clone();
        current.merge_play_info(info);

        let duration = info
            .duration
            .filter(|d| *d > 0)
            .unwrap_or(track.duration);

        let before = self.playlist.len();
        let index = self.playlist.push_unique(track);
        if self.playlist.len() != before {
            self.emit_playlist();
        }

        self.current = Some(current);
        self.current_index = Some(index);
        self.play_url = Some(info.play_url.clone());
        self.duration = f64::from(duration);
        self.current_time = 0.0;
        self.emit_track();
        self.emit_position();
        self.set_playing(true);
    }

    /// Clear every playback field and supersede in-flight resolutions.
    fn reset_playback(&mut self) {
        let had_track = self.current.is_some() || self.current_index.is_some();
        let was_loading = self.requests.is_loading();

        self.requests.invalidate();
        self.pending_favorites.clear();
        self.set_playing(false);
        self.current = None;
        self.current_index = None;
        self.play_url = None;
        self.current_time = 0.0;
        self.duration = 0.0;

        if was_loading {
            self.emit(PlaybackEvent::LoadingChanged { loading: false });
        }
        if had_track {
            self.emit_track();
        }
        self.emit_position();
    }

    fn snapshot(&self) -> PlaybackState {
        PlaybackState {
            current_track: self.current.clone(),
            current_index: self.current_index,
            is_playing: self.is_playing,
            current_time: self.current_time,
            duration: self.duration,
            volume: self.volume.level(),
            is_muted: self.volume.is_muted(),
            play_mode: self.play_mode,
            play_url: self.play_url.clone(),
            loading: self.requests.is_loading(),
            playlist_len: self.playlist.len(),
            progress: progress_percent(self.current_time, self.duration),
            has_prev: self.has_prev(),
            has_next: self.has_next(),
        }
    }
}

/// Playlist and playback state machine for the listener
///
/// All methods take `&self`; share the engine behind an `Arc`. Overlapping
/// [`play`](Self::play) calls are ordered by request token: only the most
/// recent selection may install itself as the current track.
pub struct PlaybackEngine {
    catalog: Arc<dyn CatalogClient>,
    settings: Arc<dyn PersistentSettings>,
    state: Mutex<EngineState>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl PlaybackEngine {
    /// Create an engine with volume and play mode restored from `settings`
    pub fn new(catalog: Arc<dyn CatalogClient>, settings: Arc<dyn PersistentSettings>) -> Self {
        Self::with_config(catalog, settings, PlaybackConfig::default())
    }

    pub fn with_config(
        catalog: Arc<dyn CatalogClient>,
        settings: Arc<dyn PersistentSettings>,
        config: PlaybackConfig,
    ) -> Self {
        let volume = Volume::new(settings.volume());
        let play_mode = settings.play_mode();
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        debug!(
            volume = volume.level(),
            mode = %play_mode,
            "Created playback engine"
        );

        Self {
            catalog,
            settings,
            state: Mutex::new(EngineState {
                playlist: Playlist::new(),
                current: None,
                current_index: None,
                is_playing: false,
                current_time: 0.0,
                duration: 0.0,
                volume,
                play_mode,
                play_url: None,
                requests: RequestTracker::new(),
                pending_favorites: HashMap::new(),
                rng,
                pending_events: Vec::new(),
            }),
            events,
        }
    }

    /// Subscribe to state change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Release the lock, then broadcast what was produced under it
    fn publish(&self, mut state: MutexGuard<'_, EngineState>) {
        let events = std::mem::take(&mut state.pending_events);
        drop(state);
        for event in events {
            // No subscribers is fine
            let _ = self.events.send(event);
        }
    }

    // ===== Playback Control =====

    /// Resolve a play URL for `track` and make it the current track.
    ///
    /// On failure the previous playback state is left untouched apart from
    /// the loading flag. A resolution superseded by a later `play` (or by
    /// `stop`) is discarded; its caller still sees the outcome.
    pub async fn play(&self, track: Track) -> Result<()> {
        if !track.id.is_valid() {
            return Err(PlaybackError::MissingTrackId);
        }
        let id = track.id;

        let token = {
            let mut state = self.lock();
            let token = state.requests.begin();
            state.emit(PlaybackEvent::LoadingChanged { loading: true });
            self.publish(state);
            token
        };
        debug!(track_id = %id, token = token.get(), "Resolving play url");

        let resolved = self.catalog.play_url(id).await;

        let mut state = self.lock();
        let latest = state.requests.finish(token);
        if latest {
            state.emit(PlaybackEvent::LoadingChanged { loading: false });
        }

        let outcome = match resolved {
            Ok(info) if latest => {
                info!(track_id = %id, title = %track.title, "Playing track");
                state.commit_play(track, &info);
                Ok(())
            }
            Ok(_) => {
                debug!(track_id = %id, token = token.get(), "Discarding superseded play url");
                Ok(())
            }
            Err(e) => {
                if latest {
                    warn!(track_id = %id, error = %e, "Failed to resolve play url");
                    state.emit(PlaybackEvent::PlayFailed {
                        track_id: id,
                        message: e.to_string(),
                    });
                } else {
                    debug!(track_id = %id, error = %e, "Superseded play url request failed");
                }
                Err(e.into())
            }
        };
        if latest {
            state.pending_favorites.clear();
        }
        self.publish(state);
        outcome
    }

    /// Pause playback
    pub fn pause(&self) {
        let mut state = self.lock();
        state.set_playing(false);
        self.publish(state);
    }

    /// Resume playback; no-op without a current track
    pub fn resume(&self) {
        let mut state = self.lock();
        if state.current.is_some() && state.current_index.is_some() {
            state.set_playing(true);
        }
        self.publish(state);
    }

    pub fn toggle_play(&self) {
        let playing = self.lock().is_playing;
        if playing {
            self.pause();
        } else {
            self.resume();
        }
    }

    /// Play the previous track according to the play mode
    pub async fn play_prev(&self) -> Result<()> {
        let target = self.lock().prev_track();
        match target {
            Some(track) => self.play(track).await,
            None => Ok(()),
        }
    }

    /// Play the next track according to the play mode
    pub async fn play_next(&self) -> Result<()> {
        let target = self.lock().next_track();
        match target {
            Some(track) => self.play(track).await,
            None => Ok(()),
        }
    }

    /// Handle the end of the current track.
    ///
    /// Loop mode restarts the same track in place; other modes advance.
    pub async fn on_ended(&self) -> Result<()> {
        let replayed = {
            let mut state = self.lock();
            let replay = state.play_mode == PlayMode::Loop;
            if replay && state.current.is_some() && state.current_index.is_some() {
                state.current_time = 0.0;
                state.emit_position();
                state.set_playing(true);
            }
            self.publish(state);
            replay
        };

        if replayed {
            Ok(())
        } else {
            self.play_next().await
        }
    }

    /// Stop playback and forget the current track (the playlist is kept)
    pub fn stop(&self) {
        let mut state = self.lock();
        state.reset_playback();
        self.publish(state);
        debug!("Playback stopped");
    }

    /// Play the playlist entry at `index`; no-op when out of range
    pub async fn play_by_index(&self, index: usize) -> Result<()> {
        let target = self.lock().playlist.get(index).cloned();
        match target {
            Some(track) => self.play(track).await,
            None => Ok(()),
        }
    }

    // ===== Position =====

    /// Seek to `time` seconds, clamped into `[0, duration]`
    pub fn seek(&self, time: f64) {
        let mut state = self.lock();
        state.seek_to(time);
        self.publish(state);
    }

    /// Seek to a percentage (0-100) of the duration
    pub fn seek_by_percent(&self, percent: f64) {
        let mut state = self.lock();
        let time = percent / 100.0 * state.duration;
        state.seek_to(time);
        self.publish(state);
    }

    /// Record the position reported by the audio output.
    ///
    /// Stored as reported; non-finite values are dropped.
    pub fn update_current_time(&self, time: f64) {
        if !time.is_finite() {
            return;
        }
        let mut state = self.lock();
        state.current_time = time;
        state.emit_position();
        self.publish(state);
    }

    // ===== Volume & Mode =====

    /// Set volume (clamped into `[0, 1]`); any audible level clears mute
    pub fn set_volume(&self, volume: f32) {
        let persist = {
            let mut state = self.lock();
            let was_muted = state.volume.is_muted();
            let changed = state.volume.set_level(volume);
            if changed || was_muted != state.volume.is_muted() {
                state.emit_volume();
            }
            let level = state.volume.level();
            self.publish(state);
            changed.then_some(level)
        };

        if let Some(level) = persist {
            if let Err(e) = self.settings.set_volume(level) {
                warn!(volume = level, error = %e, "Failed to persist volume");
            }
        }
    }

    /// Flip mute without touching the stored volume
    pub fn toggle_mute(&self) {
        let mut state = self.lock();
        state.volume.toggle_mute();
        state.emit_volume();
        self.publish(state);
    }

    /// Cycle Sequence → Loop → Random → Sequence
    pub fn toggle_play_mode(&self) -> PlayMode {
        let next = self.lock().play_mode.next();
        self.set_play_mode(next);
        next
    }

    /// Set the play mode directly
    pub fn set_play_mode(&self, mode: PlayMode) {
        {
            let mut state = self.lock();
            if state.play_mode == mode {
                return;
            }
            state.play_mode = mode;
            state.emit(PlaybackEvent::PlayModeChanged { mode });
            self.publish(state);
        }
        debug!(mode = %mode, "Play mode changed");

        if let Err(e) = self.settings.set_play_mode(mode) {
            warn!(mode = %mode, error = %e, "Failed to persist play mode");
        }
    }

    /// Set the play mode from its storage name.
    ///
    /// Unknown names are ignored. Returns `true` if the name was recognized.
    pub fn set_play_mode_str(&self, mode: &str) -> bool {
        match mode.parse::<PlayMode>() {
            Ok(mode) => {
                self.set_play_mode(mode);
                true
            }
            Err(e) => {
                debug!(error = %e, "Ignoring unknown play mode");
                false
            }
        }
    }

    // ===== Playlist =====

    /// Append `track` unless its id is already in the playlist.
    ///
    /// Returns `true` if the playlist grew.
    pub fn add_to_playlist(&self, track: Track) -> bool {
        if !track.id.is_valid() {
            debug!("Skipping track without id");
            return false;
        }
        let mut state = self.lock();
        let added = !state.playlist.contains(track.id);
        if added {
            state.playlist.push_unique(track);
            state.emit_playlist();
        }
        self.publish(state);
        added
    }

    /// Add many tracks.
    ///
    /// With `replace` the playlist becomes exactly `tracks` (first occurrence
    /// of each id wins). If the current track is not among them playback
    /// stops; otherwise the current index follows it.
    pub fn add_all_to_playlist(&self, tracks: Vec<Track>, replace: bool) {
        let mut state = self.lock();
        let valid = tracks.into_iter().filter(|t| t.id.is_valid());

        if replace {
            state.playlist.replace(valid.collect());
            match state.current_id() {
                Some(id) => match state.playlist.position(id) {
                    Some(index) => {
                        if state.current_index != Some(index) {
                            state.current_index = Some(index);
                            state.emit_track();
                        }
                    }
                    None => state.reset_playback(),
                },
                None => state.current_index = None,
            }
        } else {
            for track in valid {
                state.playlist.push_unique(track);
            }
        }

        state.emit_playlist();
        debug!(length = state.playlist.len(), replace, "Playlist updated");
        self.publish(state);
    }

    /// Remove the track with `id`.
    ///
    /// Removing the current track moves playback to the entry now at its
    /// position (or the new last entry), or stops when the playlist is empty.
    pub async fn remove_from_playlist(&self, id: TrackId) -> Result<()> {
        let replacement = {
            let mut state = self.lock();
            let Some(index) = state.playlist.remove(id) else {
                return Ok(());
            };
            state.emit_playlist();

            let mut replacement = None;
            if state.current_id() == Some(id) {
                if state.playlist.is_empty() {
                    state.reset_playback();
                } else {
                    let next = index.min(state.playlist.len() - 1);
                    replacement = state.playlist.get(next).cloned();
                    state.set_playing(false);
                    state.current_index = None;
                    state.emit_track();
                }
            } else if let Some(current) = state.current_index {
                if index < current {
                    state.current_index = Some(current - 1);
                    state.emit_track();
                }
            }
            self.publish(state);
            replacement
        };

        match replacement {
            Some(track) => self.play(track).await,
            None => Ok(()),
        }
    }

    /// Empty the playlist and stop
    pub fn clear_playlist(&self) {
        let mut state = self.lock();
        state.playlist.clear();
        state.emit_playlist();
        state.reset_playback();
        self.publish(state);
    }

    // ===== State Queries =====

    /// Snapshot of the whole playback state
    pub fn state(&self) -> PlaybackState {
        self.lock().snapshot()
    }

    pub fn playlist(&self) -> Vec<Track> {
        self.lock().playlist.tracks().to_vec()
    }

    /// Current track merged with its resolved play info
    pub fn current_track(&self) -> Option<Track> {
        self.lock().current.clone()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.lock().current_index
    }

    pub fn is_playing(&self) -> bool {
        self.lock().is_playing
    }

    pub fn current_time(&self) -> f64 {
        self.lock().current_time
    }

    pub fn duration(&self) -> f64 {
        self.lock().duration
    }

    /// Position as a percentage (0-100)
    pub fn progress(&self) -> f64 {
        let state = self.lock();
        progress_percent(state.current_time, state.duration)
    }

    pub fn volume(&self) -> f32 {
        self.lock().volume.level()
    }

    pub fn is_muted(&self) -> bool {
        self.lock().volume.is_muted()
    }

    /// Level the audio output should use: the volume, or 0.0 while muted
    pub fn output_gain(&self) -> f32 {
        self.lock().volume.gain()
    }

    pub fn play_mode(&self) -> PlayMode {
        self.lock().play_mode
    }

    pub fn play_url(&self) -> Option<String> {
        self.lock().play_url.clone()
    }

    /// A play URL resolution is in flight
    pub fn is_loading(&self) -> bool {
        self.lock().requests.is_loading()
    }

    pub fn has_prev(&self) -> bool {
        self.lock().has_prev()
    }

    pub fn has_next(&self) -> bool {
        self.lock().has_next()
    }

    pub fn is_playlist_empty(&self) -> bool {
        self.lock().playlist.is_empty()
    }
}

impl FavoriteSync for PlaybackEngine {
    fn apply_favorite(&self, id: TrackId, favorite: bool) -> bool {
        let mut state = self.lock();
        if state.requests.is_loading() {
            state.pending_favorites.insert(id, favorite);
        }
        let mut changed = state.playlist.set_favorite(id, favorite);
        if let Some(current) = state.current.as_mut().filter(|t| t.id == id) {
            changed |= current.favorite != favorite;
            current.favorite = favorite;
        }
        if changed {
            state.emit(PlaybackEvent::FavoriteChanged {
                track_id: id,
                favorite,
            });
        }
        self.publish(state);
        changed
    }
}

impl fmt::Debug for PlaybackEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("PlaybackEngine")
            .field("current", &state.current_id())
            .field("current_index", &state.current_index)
            .field("is_playing", &state.is_playing)
            .field("playlist_len", &state.playlist.len())
            .field("play_mode", &state.play_mode)
            .finish_non_exhaustive()
    }
}
