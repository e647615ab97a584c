//! Listener session
//!
//! One session per signed-in listener: it creates the playback engine and the
//! list synchronizer over the same catalog client, wires the engine in as a
//! favorite observer, and tears both down on [`ListenerSession::shutdown`].

use std::fmt;
use std::sync::Arc;

use cadenza_catalog::{CatalogEvent, ListSynchronizer, SyncConfig};
use cadenza_core::{CatalogClient, PersistentSettings, Track, TrackId};
use cadenza_playback::{PlaybackConfig, PlaybackEngine, PlaybackError, PlaybackEvent};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Configuration for a listener session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub playback: PlaybackConfig,
    pub catalog: SyncConfig,
}

/// Explicit owner of the listener's playback and catalog state
pub struct ListenerSession {
    engine: Arc<PlaybackEngine>,
    catalog: Arc<ListSynchronizer>,
}

impl ListenerSession {
    pub fn new(client: Arc<dyn CatalogClient>, settings: Arc<dyn PersistentSettings>) -> Self {
        Self::with_config(client, settings, SessionConfig::default())
    }

    pub fn with_config(
        client: Arc<dyn CatalogClient>,
        settings: Arc<dyn PersistentSettings>,
        config: SessionConfig,
    ) -> Self {
        let engine = Arc::new(PlaybackEngine::with_config(
            client.clone(),
            settings,
            config.playback,
        ));
        let catalog = Arc::new(ListSynchronizer::with_config(client, config.catalog));
        catalog.add_favorite_observer(engine.clone());

        info!("Listener session started");
        Self { engine, catalog }
    }

    pub fn engine(&self) -> &Arc<PlaybackEngine> {
        &self.engine
    }

    pub fn catalog(&self) -> &Arc<ListSynchronizer> {
        &self.catalog
    }

    pub fn subscribe_playback(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.engine.subscribe()
    }

    pub fn subscribe_catalog(&self) -> broadcast::Receiver<CatalogEvent> {
        self.catalog.subscribe()
    }

    /// Toggle a favorite and apply the new flag to every cache, the
    /// engine's current track and playlist included
    pub async fn toggle_favorite(&self, id: TrackId, current: bool) -> cadenza_core::Result<bool> {
        self.catalog.toggle_favorite(id, current).await
    }

    /// Toggle the favorite flag of the current track.
    ///
    /// Returns `Ok(None)` when nothing is loaded.
    pub async fn toggle_current_favorite(&self) -> cadenza_core::Result<Option<bool>> {
        match self.engine.current_track() {
            Some(track) => self
                .toggle_favorite(track.id, track.favorite)
                .await
                .map(Some),
            None => Ok(None),
        }
    }

    /// Replace the playlist with the browse list and start at `start`.
    ///
    /// No-op when `start` is past the end of the browse list.
    pub async fn play_list(&self, start: usize) -> cadenza_playback::Result<()> {
        let tracks = self.catalog.tracks();
        let Some(first) = tracks.get(start).cloned() else {
            debug!(start, length = tracks.len(), "Nothing to play at index");
            return Ok(());
        };

        self.engine.add_all_to_playlist(tracks, true);
        self.engine.play(first).await
    }

    /// Play a track by id.
    ///
    /// Uses any cached copy of the track; otherwise fetches its detail record
    /// first.
    pub async fn play_track(&self, id: TrackId) -> cadenza_playback::Result<()> {
        if !id.is_valid() {
            return Err(PlaybackError::MissingTrackId);
        }
        let track = match self.find_cached(id) {
            Some(track) => track,
            None => self.catalog.fetch_music_detail(id).await?.track,
        };
        self.engine.play(track).await
    }

    fn find_cached(&self, id: TrackId) -> Option<Track> {
        let find = |tracks: Vec<Track>| tracks.into_iter().find(|t| t.id == id);

        find(self.engine.playlist())
            .or_else(|| find(self.catalog.tracks()))
            .or_else(|| find(self.catalog.favorites()))
            .or_else(|| find(self.catalog.history()))
            .or_else(|| {
                self.catalog
                    .detail()
                    .filter(|d| d.id() == id)
                    .map(|d| d.track)
            })
    }

    /// Stop playback and drop every cached list.
    ///
    /// Requests still in flight are superseded. Volume and play mode stay
    /// persisted.
    pub fn shutdown(&self) {
        self.engine.clear_playlist();
        self.catalog.reset_state();
        info!("Listener session closed");
    }
}

impl fmt::Debug for ListenerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSession")
            .field("engine", &self.engine)
            .field("catalog", &self.catalog)
            .finish()
    }
}
