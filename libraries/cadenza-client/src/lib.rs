//! Cadenza Catalog Client
//!
//! HTTP implementation of [`cadenza_core::CatalogClient`] for the catalog
//! REST API.
//!
//! # Features
//!
//! - **Catalog**: list, search, detail, play URL resolution
//! - **Favorites & history**: favorite/unfavorite and the per-user lists
//! - **Authentication**: login with username/password, bearer token handling
//! - **Ratings**: rate a track and read its aggregate stats
//!
//! # Example
//!
//! ```ignore
//! use cadenza_client::{ClientConfig, HttpCatalogClient};
//! use cadenza_core::CatalogClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpCatalogClient::new(ClientConfig::new("http://localhost:8080"))?;
//!     client.login("listener", "secret").await?;
//!
//!     let results = client.search("night", 1, 10).await?;
//!     for track in &results.list {
//!         println!("{} - {}", track.artist, track.title);
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

mod auth;
mod catalog;
mod client;
mod error;
mod rating;
mod types;

pub use client::HttpCatalogClient;
pub use rating::MAX_SCORE;
pub use types::{ClientConfig, MusicStats, UserProfile, DEFAULT_TIMEOUT};
