//! Types for catalog API requests and responses.

use std::time::Duration;

use cadenza_core::TrackId;
use serde::{Deserialize, Serialize};

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// `code` value the catalog uses for success
pub const CODE_SUCCESS: i32 = 200;

/// `code` value the catalog uses for a missing or expired login
pub const CODE_UNAUTHORIZED: i32 = 401;

/// Configuration for connecting to a catalog server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the server (e.g., "http://localhost:8080")
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Bearer token from a previous login
    pub token: Option<String>,
}

impl ClientConfig {
    /// Create a config with just the URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            token: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Response envelope wrapped around every catalog payload.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub code: i32,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub keyword: &'a str,
    pub page: u32,
    pub size: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RateRequest {
    pub music_id: TrackId,
    pub score: u8,
}

// =============================================================================
// Response payloads
// =============================================================================

/// Signed-in user profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl UserProfile {
    /// Nickname when set, username otherwise
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }
}

/// Aggregate listening and rating numbers for one track.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicStats {
    pub music_id: TrackId,
    #[serde(default)]
    pub play_count: Option<u64>,
    #[serde(default)]
    pub favorite_count: Option<u64>,
    /// Average score, absent until someone has rated the track
    #[serde(default)]
    pub avg_score: Option<f64>,
    #[serde(default)]
    pub total_ratings: Option<u32>,
}
