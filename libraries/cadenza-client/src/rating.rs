//! Track rating endpoints.

use cadenza_core::{CatalogError, Result, TrackId};
use tracing::debug;

use crate::client::HttpCatalogClient;
use crate::types::{MusicStats, RateRequest};

/// Highest score a listener can give
pub const MAX_SCORE: u8 = 5;

impl HttpCatalogClient {
    /// Rate a track from 1 to [`MAX_SCORE`].
    pub async fn rate(&self, id: TrackId, score: u8) -> Result<()> {
        if !(1..=MAX_SCORE).contains(&score) {
            return Err(CatalogError::InvalidInput(format!(
                "Score must be between 1 and {}, got {}",
                MAX_SCORE, score
            )));
        }

        debug!(id = %id, score, "Rating track");
        let request = self.post("/rate").json(&RateRequest {
            music_id: id,
            score,
        });
        // The server answers with a confirmation string we have no use for
        let _: serde_json::Value = self.execute(request).await?;
        Ok(())
    }

    /// Play, favorite and rating aggregates for a track.
    pub async fn rating(&self, id: TrackId) -> Result<MusicStats> {
        debug!(id = %id, "Fetching track stats");
        self.execute(self.get(&format!("/rate/music/{}", id))).await
    }
}
