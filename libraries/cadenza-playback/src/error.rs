//! Error types for playback management

use cadenza_core::CatalogError;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Track has no usable catalog id
    #[error("Track has no id")]
    MissingTrackId,

    /// Play URL resolution failed
    #[error("Failed to resolve play url: {0}")]
    Catalog(#[from] CatalogError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
