//! Music catalog endpoints.

use async_trait::async_trait;
use cadenza_core::{
    CatalogClient, MusicStatus, Page, PlayInfo, Result, Track, TrackDetail, TrackId,
};
use tracing::debug;

use crate::client::HttpCatalogClient;
use crate::types::SearchRequest;

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn list(&self, page: u32, size: u32, status: MusicStatus) -> Result<Page<Track>> {
        debug!(page, size, status = status.code(), "Fetching music list");
        let request = self.get("/music/list").query(&[
            ("page", page.to_string()),
            ("size", size.to_string()),
            ("status", status.code().to_string()),
        ]);
        let result: Page<Track> = self.execute(request).await?;
        debug!(
            returned = result.list.len(),
            total = result.total,
            "Fetched music list"
        );
        Ok(result)
    }

    async fn search(&self, keyword: &str, page: u32, size: u32) -> Result<Page<Track>> {
        debug!(keyword, page, size, "Searching music");
        let request = self
            .post("/music/search")
            .json(&SearchRequest {
                keyword,
                page,
                size,
            });
        self.execute(request).await
    }

    async fn detail(&self, id: TrackId) -> Result<TrackDetail> {
        debug!(id = %id, "Fetching music detail");
        self.execute(self.get(&format!("/music/detail/{}", id))).await
    }

    async fn play_url(&self, id: TrackId) -> Result<PlayInfo> {
        debug!(id = %id, "Resolving play url");
        self.execute(self.get(&format!("/music/play/{}", id))).await
    }

    async fn favorite(&self, id: TrackId) -> Result<()> {
        debug!(id = %id, "Adding favorite");
        let _: serde_json::Value = self
            .execute(self.post(&format!("/music/favorite/{}", id)))
            .await?;
        Ok(())
    }

    async fn unfavorite(&self, id: TrackId) -> Result<()> {
        debug!(id = %id, "Removing favorite");
        let _: serde_json::Value = self
            .execute(self.delete(&format!("/music/favorite/{}", id)))
            .await?;
        Ok(())
    }

    async fn favorites(&self, page: u32, size: u32) -> Result<Page<Track>> {
        debug!(page, size, "Fetching favorite list");
        let request = self
            .get("/music/favorite/list")
            .query(&[("page", page), ("size", size)]);
        self.execute(request).await
    }

    async fn history(&self, page: u32, size: u32) -> Result<Page<Track>> {
        debug!(page, size, "Fetching play history");
        let request = self
            .get("/music/history")
            .query(&[("page", page), ("size", size)]);
        self.execute(request).await
    }
}
