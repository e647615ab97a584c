//! ID types for catalog entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog track identifier
///
/// The catalog uses auto-increment ids, so `0` never names a real track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(u64);

impl TrackId {
    /// Create a new track ID
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw numeric id
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Whether this id can refer to a catalog track
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TrackId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_id_is_transparent_on_the_wire() {
        let id: TrackId = serde_json::from_str("42").unwrap();
        assert_eq!(id, TrackId::new(42));
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }

    #[test]
    fn zero_is_not_a_valid_track() {
        assert!(!TrackId::new(0).is_valid());
        assert!(TrackId::new(1).is_valid());
    }
}
