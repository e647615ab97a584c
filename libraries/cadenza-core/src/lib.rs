//! Cadenza Core
//!
//! Domain types, collaborator traits, and request bookkeeping shared by the
//! Cadenza listener crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackDetail`, `PlayInfo`, `Page`, `PlayMode`
//! - **Collaborator Traits**: `CatalogClient` (remote catalog API) and
//!   `PersistentSettings` (volume / play-mode store)
//! - **Favorite Sync**: the `FavoriteSync` trait every track cache implements
//! - **Request Tokens**: `RequestTracker`, which lets a store discard stale
//!   responses and keep its loading flag honest under overlapping calls
//! - **Error Handling**: `CatalogError` and `SettingsError`
//!
//! # Example
//!
//! ```rust
//! use cadenza_core::{PlayMode, RequestTracker, Track, TrackId};
//!
//! let track = Track::new(TrackId::new(7), "Night Drive", "Analog Sea");
//! assert_eq!(track.id.get(), 7);
//!
//! assert_eq!(PlayMode::Sequence.next(), PlayMode::Loop);
//!
//! let mut requests = RequestTracker::new();
//! let first = requests.begin();
//! let second = requests.begin();
//! assert!(!requests.finish(first)); // superseded
//! assert!(requests.finish(second));
//! assert!(!requests.is_loading());
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod request;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CatalogError, Result, SettingsError, SettingsResult};
pub use request::{RequestToken, RequestTracker};
pub use traits::{CatalogClient, FavoriteSync, PersistentSettings};
pub use types::{
    MusicStatus, Page, PageQuery, PaginationSnapshot, PlayInfo, PlayMode, Track, TrackDetail,
    TrackId, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, DEFAULT_PLAY_MODE, DEFAULT_VOLUME,
};
