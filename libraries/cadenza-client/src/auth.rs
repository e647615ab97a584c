//! Authentication endpoints.

use cadenza_core::{CatalogError, Result};
use tracing::{debug, info};

use crate::client::HttpCatalogClient;
use crate::types::{LoginRequest, UserProfile};

impl HttpCatalogClient {
    /// Login with username and password.
    ///
    /// On success the returned token is stored and sent with every later
    /// request.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        debug!(username = %username, "Attempting login");

        // Stale credentials must not ride along on a fresh login
        self.store_token(None).await;

        let request = self.post("/auth/login").json(&LoginRequest { username, password });
        let token: String = self.execute(request).await?;

        if token.is_empty() {
            return Err(CatalogError::Decode("Login returned an empty token".into()));
        }

        self.store_token(Some(token.clone())).await;
        info!(username = %username, "Login successful");
        Ok(token)
    }

    /// Clear the stored token.
    pub async fn logout(&self) {
        self.store_token(None).await;
        info!("Logged out");
    }

    /// Profile of the signed-in user.
    pub async fn current_user(&self) -> Result<UserProfile> {
        if !self.is_authenticated().await {
            return Err(CatalogError::AuthExpired);
        }
        let profile: UserProfile = self.execute(self.get("/user/me")).await?;
        debug!(user_id = profile.id, username = %profile.username, "Fetched current user");
        Ok(profile)
    }
}
