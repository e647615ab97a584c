//! Listener configuration
//!
//! Read from an optional TOML file (`cadenza.toml` in the working directory
//! unless a path is given) and overridden by `CADENZA_*` environment
//! variables, with `__` between section and key:
//! `CADENZA_SERVER__BASE_URL`, `CADENZA_AUTH__TOKEN`, ...

use crate::error::{ListenerError, Result};
use cadenza_catalog::SyncConfig;
use cadenza_client::ClientConfig;
use cadenza_session::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "cadenza.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListenerConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub settings: SettingsStore,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Credentials; a token takes precedence over username/password
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SettingsStore {
    /// JSON file holding volume and play mode
    #[serde(default = "default_settings_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl ListenerConfig {
    /// Load configuration from file and environment.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                settings = settings
                    .add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false));
            }
        }

        // Override with environment variables (prefixed with CADENZA_)
        settings = settings.add_source(
            config::Environment::with_prefix("CADENZA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text without consulting the environment
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.base_url.trim().is_empty() {
            return Err(ListenerError::Config(
                "Server base URL is required (set CADENZA_SERVER__BASE_URL)".to_string(),
            ));
        }

        if self.server.timeout_secs == 0 {
            return Err(ListenerError::Config(
                "Server timeout must be at least one second".to_string(),
            ));
        }

        if self.catalog.page_size == 0 {
            return Err(ListenerError::Config(
                "Catalog page size must be greater than zero".to_string(),
            ));
        }

        if self.auth.username.is_some() != self.auth.password.is_some() {
            return Err(ListenerError::Config(
                "Username and password must be configured together".to_string(),
            ));
        }

        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.server.base_url.clone())
            .with_timeout(Duration::from_secs(self.server.timeout_secs));
        match &self.auth.token {
            Some(token) if !token.is_empty() => config.with_token(token.clone()),
            _ => config,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            catalog: SyncConfig {
                page_size: self.catalog.page_size,
                ..SyncConfig::default()
            },
            ..SessionConfig::default()
        }
    }

    /// Username and password, when both are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.auth.username, &self.auth.password) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        }
    }
}

// Default values
fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("./data/settings.json")
}

fn default_page_size() -> u32 {
    cadenza_core::DEFAULT_PAGE_SIZE
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self {
            path: default_settings_path(),
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}
