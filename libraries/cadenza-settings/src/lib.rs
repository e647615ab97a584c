//! Player settings persistence
//!
//! Settings are stored as key-value pairs with JSON values, either in memory
//! or in a single JSON file that is rewritten on every change.
//!
//! # Example
//!
//! ```rust
//! use cadenza_core::{PersistentSettings, PlayMode};
//! use cadenza_settings::JsonSettings;
//!
//! let settings = JsonSettings::in_memory();
//! assert_eq!(settings.volume(), 0.7);
//!
//! settings.set_play_mode(PlayMode::Random).unwrap();
//! assert_eq!(settings.play_mode(), PlayMode::Random);
//! ```

#![forbid(unsafe_code)]

mod store;

pub use store::JsonSettings;

/// Player volume in `[0, 1]`
pub const SETTING_VOLUME: &str = "player.volume";

/// Player play mode (`"sequence"`, `"loop"`, `"random"`)
pub const SETTING_PLAY_MODE: &str = "player.mode";
