//! Cadenza Listener
//!
//! Configuration, error types and terminal formatting for the `cadenza`
//! command-line listener.

pub mod config;
pub mod display;
pub mod error;

pub use config::ListenerConfig;
pub use error::{ListenerError, Result};
