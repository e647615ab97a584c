//! Core error types for Cadenza

use thiserror::Error;

/// Result type alias using `CatalogError`
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Result type alias for settings persistence
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

/// Failures surfaced by a [`CatalogClient`](crate::CatalogClient).
///
/// The listener core never retries; every variant is handed back to the
/// caller unchanged.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Connectivity problem or timeout in the transport
    #[error("Network failure: {0}")]
    Network(String),

    /// The catalog answered, but refused the request
    #[error("Catalog rejected request ({code}): {message}")]
    Rejected { code: i32, message: String },

    /// Credentials are missing or no longer valid (HTTP 401)
    #[error("Authentication expired")]
    AuthExpired,

    /// The response body could not be understood
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Client-side configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An argument the catalog would refuse anyway
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CatalogError {
    /// Create a rejection error
    pub fn rejected(code: i32, message: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Whether the caller should send the user back to login
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }
}

/// Failures while reading or writing persisted player settings
#[derive(Error, Debug)]
pub enum SettingsError {
    /// IO error on the backing file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
