//! Cadenza - Playback Engine
//!
//! Playlist ordering, play-mode semantics and current-playback state for the
//! Cadenza listener.
//!
//! This crate provides:
//! - Duplicate-free playlist with explicit add/remove
//! - Play modes (Sequence, Loop, Random) driving prev/next and end-of-track
//! - Current track, position, duration, volume and mute tracking
//! - Play URL resolution through a [`CatalogClient`](cadenza_core::CatalogClient)
//!   with latest-request-wins ordering
//! - Volume and play mode persisted through
//!   [`PersistentSettings`](cadenza_core::PersistentSettings)
//! - Broadcast [`PlaybackEvent`]s for UI synchronization
//!
//! # Architecture
//!
//! The engine never produces audio. The audio output reports progress via
//! [`PlaybackEngine::update_current_time`] and end of track via
//! [`PlaybackEngine::on_ended`]; everything else is driven by user actions.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cadenza_playback::PlaybackEngine;
//! use cadenza_settings::JsonSettings;
//!
//! let engine = PlaybackEngine::new(Arc::new(client), Arc::new(JsonSettings::in_memory()));
//!
//! engine.add_all_to_playlist(tracks, true);
//! engine.play_by_index(0).await?;
//!
//! engine.set_volume(0.5);
//! engine.toggle_play_mode(); // Sequence -> Loop
//! engine.on_ended().await?;  // replays the same track
//! ```

#![forbid(unsafe_code)]

mod engine;
pub mod error;
pub mod events;
pub mod navigation;
mod playlist;
pub mod types;
mod volume;

pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use playlist::Playlist;
pub use types::{PlaybackConfig, PlaybackState};
pub use volume::Volume;
