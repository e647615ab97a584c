//! Configuration and request groups for the list synchronizer

use cadenza_core::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operations sharing one cache and one loading flag.
///
/// Listing and search both write the browse list, so they form one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestGroup {
    List,
    Favorites,
    History,
    Detail,
}

impl RequestGroup {
    pub const ALL: [RequestGroup; 4] = [
        RequestGroup::List,
        RequestGroup::Favorites,
        RequestGroup::History,
        RequestGroup::Detail,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RequestGroup::List => "list",
            RequestGroup::Favorites => "favorites",
            RequestGroup::History => "history",
            RequestGroup::Detail => "detail",
        }
    }
}

impl fmt::Display for RequestGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the list synchronizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Page size used when a query does not name one (default: 10)
    pub page_size: u32,

    /// Buffered events per subscriber (default: 64)
    pub event_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            event_capacity: 64,
        }
    }
}
