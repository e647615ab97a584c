//! Catalog Events
//!
//! Emitted by the [`ListSynchronizer`](crate::ListSynchronizer) whenever one
//! of its caches changes. Lagging subscribers re-read through the accessors.

use cadenza_core::{PaginationSnapshot, TrackId};
use serde::{Deserialize, Serialize};

use crate::types::RequestGroup;

/// Events emitted by the list synchronizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CatalogEvent {
    /// Browse list replaced or extended
    ListChanged {
        length: usize,
        pagination: PaginationSnapshot,
    },

    /// A request group started or finished loading
    LoadingChanged {
        group: RequestGroup,
        loading: bool,
    },

    /// Active search keyword changed (`None` for plain listing)
    KeywordChanged {
        keyword: Option<String>,
    },

    FavoritesChanged {
        length: usize,
    },

    HistoryChanged {
        length: usize,
    },

    /// Detail cache replaced (`None` after reset)
    DetailChanged {
        track_id: Option<TrackId>,
    },

    /// A favorite toggle was applied to the cached copies of a track
    FavoriteChanged {
        track_id: TrackId,
        favorite: bool,
    },
}
