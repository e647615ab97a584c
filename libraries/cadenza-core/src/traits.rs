//! Collaborator traits for the Cadenza listener

use crate::error::{Result, SettingsResult};
use crate::types::{MusicStatus, Page, PlayInfo, PlayMode, Track, TrackDetail, TrackId};
use async_trait::async_trait;

/// Remote catalog API
///
/// Pure request/response: implementers keep no listing state. Transport
/// concerns (auth headers, timeouts) live behind this trait and surface as
/// ordinary [`CatalogError`](crate::CatalogError)s.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// List tracks with the given moderation status
    async fn list(&self, page: u32, size: u32, status: MusicStatus) -> Result<Page<Track>>;

    /// Full-text search over approved tracks
    async fn search(&self, keyword: &str, page: u32, size: u32) -> Result<Page<Track>>;

    /// Fetch the detail record of a track
    async fn detail(&self, id: TrackId) -> Result<TrackDetail>;

    /// Resolve a playable URL for a track
    async fn play_url(&self, id: TrackId) -> Result<PlayInfo>;

    /// Mark a track as favorite for the current user
    async fn favorite(&self, id: TrackId) -> Result<()>;

    /// Remove a track from the current user's favorites
    async fn unfavorite(&self, id: TrackId) -> Result<()>;

    /// The current user's favorite tracks
    async fn favorites(&self, page: u32, size: u32) -> Result<Page<Track>>;

    /// The current user's play history
    async fn history(&self, page: u32, size: u32) -> Result<Page<Track>>;
}

/// Key-value store for player settings that survive restarts
///
/// Getters never fail: a missing or unreadable value yields the default
/// (`0.7` volume, `Sequence` mode).
pub trait PersistentSettings: Send + Sync {
    /// Stored volume in `[0, 1]`
    fn volume(&self) -> f32;

    /// Persist the volume
    fn set_volume(&self, volume: f32) -> SettingsResult<()>;

    /// Stored play mode
    fn play_mode(&self) -> PlayMode;

    /// Persist the play mode
    fn set_play_mode(&self, mode: PlayMode) -> SettingsResult<()>;
}

/// A cache that holds tracks and must reflect favorite-flag changes
///
/// A favorite toggle is one logical update: every cache holding the id
/// applies it before anyone observes the new flag.
pub trait FavoriteSync: Send + Sync {
    /// Apply a favorite flag to every cached copy of `id`.
    ///
    /// Returns `true` if any cached entry changed.
    fn apply_favorite(&self, id: TrackId, favorite: bool) -> bool;
}
