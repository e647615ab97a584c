//! Listener error types

use cadenza_core::{CatalogError, SettingsError};
use cadenza_playback::PlaybackError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ListenerError>;

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

impl From<config::ConfigError> for ListenerError {
    fn from(err: config::ConfigError) -> Self {
        ListenerError::Config(err.to_string())
    }
}
