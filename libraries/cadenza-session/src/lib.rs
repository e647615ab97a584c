//! Cadenza - Listener Session
//!
//! Ties the [`PlaybackEngine`](cadenza_playback::PlaybackEngine) and the
//! [`ListSynchronizer`](cadenza_catalog::ListSynchronizer) together for one
//! listener. The session is the single owner of both stores: it keeps
//! favorite flags consistent between them and defines their teardown.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cadenza_core::PageQuery;
//! use cadenza_session::ListenerSession;
//!
//! let session = ListenerSession::new(client, settings);
//! session.catalog().fetch_list(PageQuery::default(), false).await?;
//! session.play_list(0).await?;
//! session.toggle_current_favorite().await?;
//! session.shutdown();
//! ```

#![forbid(unsafe_code)]

mod session;

pub use session::{ListenerSession, SessionConfig};
