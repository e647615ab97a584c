//! Cadenza - Catalog Synchronization
//!
//! In-memory caches of the remote catalog for the Cadenza listener.
//!
//! This crate provides:
//! - Paginated browse list fed by plain listing or keyword search
//! - Favorites, play history and single-detail caches
//! - Favorite toggles applied to every cached copy of a track, including
//!   other caches registered as [`FavoriteSync`](cadenza_core::FavoriteSync)
//!   observers
//! - Per-group request tokens so stale responses are dropped
//! - Broadcast [`CatalogEvent`]s
//!
//! Failures from the [`CatalogClient`](cadenza_core::CatalogClient) are
//! returned unchanged and leave the caches as they were.
//!
//! # Example
//!
//! ```rust,ignore
//! use cadenza_catalog::ListSynchronizer;
//! use cadenza_core::PageQuery;
//!
//! let catalog = ListSynchronizer::new(client);
//! catalog.fetch_list(PageQuery::default(), false).await?;
//! while catalog.has_more() {
//!     catalog.load_more().await?;
//! }
//! ```

#![forbid(unsafe_code)]

pub mod events;
mod synchronizer;
pub mod types;

pub use events::CatalogEvent;
pub use synchronizer::ListSynchronizer;
pub use types::{RequestGroup, SyncConfig};
