//! Track types as served by the catalog API

use super::{null_as_default, TrackId};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Moderation status of an uploaded track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MusicStatus {
    /// Waiting for moderation
    Pending,
    /// Visible to listeners
    Approved,
    /// Taken down from the catalog
    Offline,
}

impl MusicStatus {
    /// Wire value used in query strings
    pub fn code(self) -> u8 {
        self.into()
    }
}

impl From<MusicStatus> for u8 {
    fn from(status: MusicStatus) -> Self {
        match status {
            MusicStatus::Pending => 0,
            MusicStatus::Approved => 1,
            MusicStatus::Offline => 2,
        }
    }
}

impl TryFrom<u8> for MusicStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Approved),
            2 => Ok(Self::Offline),
            other => Err(format!("unknown music status: {other}")),
        }
    }
}

/// A catalog track
///
/// Identity is the catalog id: two `Track` values with the same id are equal
/// even if one of them carries a stale favorite flag or a resolved play URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,

    #[serde(rename = "musicName", default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub artist: String,

    #[serde(default)]
    pub album: Option<String>,

    /// Length in whole seconds (0 when unknown)
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: u32,

    #[serde(default)]
    pub cover_url: Option<String>,

    #[serde(rename = "isFavorite", default, deserialize_with = "null_as_default")]
    pub favorite: bool,

    /// Populated lazily once playback resolves a URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_url: Option<String>,

    #[serde(default)]
    pub status: Option<MusicStatus>,

    #[serde(default)]
    pub play_count: Option<u64>,

    #[serde(default)]
    pub description: Option<String>,
}

impl Track {
    /// Create a track with the fields every view needs
    pub fn new(id: TrackId, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
            album: None,
            duration: 0,
            cover_url: None,
            favorite: false,
            play_url: None,
            status: None,
            play_count: None,
            description: None,
        }
    }

    /// Set the duration in seconds
    #[must_use]
    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration = seconds;
        self
    }

    /// Set the favorite flag
    #[must_use]
    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    /// Merge resolved play information into this track.
    ///
    /// Fields present in `info` win over the listing data.
    pub fn merge_play_info(&mut self, info: &PlayInfo) {
        self.play_url = Some(info.play_url.clone());
        if let Some(duration) = info.duration.filter(|d| *d > 0) {
            self.duration = duration;
        }
        if let Some(ref title) = info.title {
            self.title.clone_from(title);
        }
        if let Some(ref artist) = info.artist {
            self.artist.clone_from(artist);
        }
        if info.cover_url.is_some() {
            self.cover_url.clone_from(&info.cover_url);
        }
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Full track record from the detail endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackDetail {
    #[serde(flatten)]
    pub track: Track,

    #[serde(default)]
    pub file_uuid: Option<String>,

    /// Size of the stored audio file in bytes
    #[serde(default)]
    pub file_size: Option<u64>,
}

impl TrackDetail {
    pub fn id(&self) -> TrackId {
        self.track.id
    }
}

impl From<Track> for TrackDetail {
    fn from(track: Track) -> Self {
        Self {
            track,
            file_uuid: None,
            file_size: None,
        }
    }
}

/// Playback information resolved for a single track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayInfo {
    pub play_url: String,

    /// Duration in seconds as known to the file store
    #[serde(default)]
    pub duration: Option<u32>,

    #[serde(rename = "musicName", default)]
    pub title: Option<String>,

    #[serde(default)]
    pub artist: Option<String>,

    #[serde(default)]
    pub cover_url: Option<String>,
}

impl PlayInfo {
    /// Create play info with only a URL
    pub fn new(play_url: impl Into<String>) -> Self {
        Self {
            play_url: play_url.into(),
            duration: None,
            title: None,
            artist: None,
            cover_url: None,
        }
    }

    /// Set the resolved duration
    #[must_use]
    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration = Some(seconds);
        self
    }
}
