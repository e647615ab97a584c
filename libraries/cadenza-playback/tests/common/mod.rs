//! Shared test doubles for playback integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cadenza_core::{
    CatalogClient, CatalogError, MusicStatus, Page, PersistentSettings, PlayInfo, PlayMode,
    SettingsError, SettingsResult, Track, TrackDetail, TrackId,
};
use cadenza_playback::{PlaybackConfig, PlaybackEngine};
use tokio::sync::{oneshot, Notify};

pub type Gate = oneshot::Sender<Result<PlayInfo, CatalogError>>;

/// Catalog whose play URL resolution can be held open per track id.
///
/// Ungated ids resolve immediately to `http://files/{id}.mp3`.
#[derive(Default)]
pub struct GatedCatalog {
    gates: Mutex<HashMap<TrackId, oneshot::Receiver<Result<PlayInfo, CatalogError>>>>,
    failing: Mutex<HashSet<TrackId>>,
    calls: Mutex<Vec<TrackId>>,
    called: Notify,
}

impl GatedCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Hold the next resolution of `id` until the returned sender fires
    pub fn gate(&self, id: u64) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(TrackId::new(id), rx);
        tx
    }

    /// Make every resolution of `id` fail immediately
    pub fn fail(&self, id: u64) {
        self.failing.lock().unwrap().insert(TrackId::new(id));
    }

    pub fn calls(&self) -> Vec<TrackId> {
        self.calls.lock().unwrap().clone()
    }

    /// Wait until at least `n` play URL requests have been issued
    pub async fn wait_for_calls(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if self.calls.lock().unwrap().len() >= n {
                    return;
                }
                self.called.notified().await;
            }
        })
        .await
        .expect("play url was never requested");
    }
}

pub fn info_for(id: u64) -> PlayInfo {
    PlayInfo::new(format!("http://files/{}.mp3", id)).with_duration(180)
}

#[async_trait]
impl CatalogClient for GatedCatalog {
    async fn list(
        &self,
        page: u32,
        size: u32,
        _: MusicStatus,
    ) -> cadenza_core::Result<Page<Track>> {
        Ok(Page::new(Vec::new(), page, size, 0))
    }

    async fn search(&self, _: &str, page: u32, size: u32) -> cadenza_core::Result<Page<Track>> {
        Ok(Page::new(Vec::new(), page, size, 0))
    }

    async fn detail(&self, id: TrackId) -> cadenza_core::Result<TrackDetail> {
        Ok(track(id.get()).into())
    }

    async fn play_url(&self, id: TrackId) -> cadenza_core::Result<PlayInfo> {
        let gate = self.gates.lock().unwrap().remove(&id);
        let fails = self.failing.lock().unwrap().contains(&id);
        self.calls.lock().unwrap().push(id);
        self.called.notify_one();

        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(CatalogError::network("gate dropped"))),
            None if fails => Err(CatalogError::network("connection reset")),
            None => Ok(info_for(id.get())),
        }
    }

    async fn favorite(&self, _: TrackId) -> cadenza_core::Result<()> {
        Ok(())
    }

    async fn unfavorite(&self, _: TrackId) -> cadenza_core::Result<()> {
        Ok(())
    }

    async fn favorites(&self, page: u32, size: u32) -> cadenza_core::Result<Page<Track>> {
        Ok(Page::new(Vec::new(), page, size, 0))
    }

    async fn history(&self, page: u32, size: u32) -> cadenza_core::Result<Page<Track>> {
        Ok(Page::new(Vec::new(), page, size, 0))
    }
}

/// Settings that remember every write
pub struct RecordingSettings {
    volume: f32,
    mode: PlayMode,
    fail_writes: bool,
    pub volume_writes: Mutex<Vec<f32>>,
    pub mode_writes: Mutex<Vec<PlayMode>>,
}

impl RecordingSettings {
    pub fn new(volume: f32, mode: PlayMode) -> Arc<Self> {
        Arc::new(Self {
            volume,
            mode,
            fail_writes: false,
            volume_writes: Mutex::new(Vec::new()),
            mode_writes: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            volume: 0.7,
            mode: PlayMode::Sequence,
            fail_writes: true,
            volume_writes: Mutex::new(Vec::new()),
            mode_writes: Mutex::new(Vec::new()),
        })
    }

    fn write_result(&self) -> SettingsResult<()> {
        if self.fail_writes {
            Err(SettingsError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        } else {
            Ok(())
        }
    }
}

impl PersistentSettings for RecordingSettings {
    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&self, volume: f32) -> SettingsResult<()> {
        self.volume_writes.lock().unwrap().push(volume);
        self.write_result()
    }

    fn play_mode(&self) -> PlayMode {
        self.mode
    }

    fn set_play_mode(&self, mode: PlayMode) -> SettingsResult<()> {
        self.mode_writes.lock().unwrap().push(mode);
        self.write_result()
    }
}

pub fn track(id: u64) -> Track {
    Track::new(TrackId::new(id), format!("Track {}", id), "Artist").with_duration(120)
}

pub fn tracks(ids: &[u64]) -> Vec<Track> {
    ids.iter().copied().map(track).collect()
}

pub fn engine_with(catalog: Arc<GatedCatalog>) -> Arc<PlaybackEngine> {
    Arc::new(PlaybackEngine::with_config(
        catalog,
        RecordingSettings::new(0.7, PlayMode::Sequence),
        PlaybackConfig {
            random_seed: Some(42),
            ..PlaybackConfig::default()
        },
    ))
}

pub fn current_id(engine: &PlaybackEngine) -> Option<u64> {
    engine.current_track().map(|t| t.id.get())
}
