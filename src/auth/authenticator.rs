//! Authenticator implementation
//!
//! Login, logout and token refresh against the token and revoke endpoints,
//! and the session flag bookkeeping that goes with them.

use super::credentials::CredentialProvider;
use super::types::TokenResponse;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::session::SessionState;
use reqwest::{Client, Response};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Performs the token endpoint operations
#[derive(Debug, Clone)]
pub struct Authenticator {
    /// Token endpoint URL
    token_url: Url,
    /// Revoke endpoint URL
    revoke_url: Url,
    /// Cookie scoping hint, if tokens live in cookies
    cookie_path: Option<String>,
    /// Where credentials come from
    credentials: Arc<dyn CredentialProvider>,
    /// Logged-in flag
    session: SessionState,
    /// HTTP client for token requests
    http_client: Client,
}

impl Authenticator {
    /// Create an authenticator for the endpoints named in `config`
    pub fn new(
        config: &ClientConfig,
        http_client: Client,
        credentials: Arc<dyn CredentialProvider>,
        session: SessionState,
    ) -> Result<Self> {
        Ok(Self {
            token_url: config.url(&config.token_endpoint)?,
            revoke_url: config.url(&config.revoke_endpoint)?,
            cookie_path: config.effective_cookie_path().map(String::from),
            credentials,
            session,
            http_client,
        })
    }

    /// Exchange a username and password for tokens
    ///
    /// Sets the session flag on success. On rejection returns
    /// [`Error::Login`] and leaves the flag as it was.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let mut form = vec![
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
        ];
        if let Some(cookie_path) = self.cookie_path.as_deref() {
            form.push(("cookie_path", cookie_path));
        }

        let response = self
            .http_client
            .post(self.token_url.clone())
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(
                "Login for user '{}' rejected with status {}",
                username,
                response.status().as_u16()
            );
            return Err(Error::Login);
        }

        self.store_tokens(response).await?;
        self.session.set_logged_in().await?;
        info!("Logged in as '{}'", username);
        Ok(())
    }

    /// Revoke the refresh credential
    ///
    /// Clears the session flag on success. On rejection returns
    /// [`Error::Logout`] and leaves the flag set.
    pub async fn logout(&self) -> Result<()> {
        let Some(token) = self.credentials.refresh_token().await? else {
            warn!("Logout requested without a refresh credential");
            return Err(Error::Logout);
        };

        let form = [("token", token.as_str()), ("hint", "access_token")];

        let response = self
            .http_client
            .post(self.revoke_url.clone())
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(
                "Logout rejected with status {}",
                response.status().as_u16()
            );
            return Err(Error::Logout);
        }

        self.credentials.clear().await?;
        self.session.clear().await?;
        info!("Logged out");
        Ok(())
    }

    /// Exchange the refresh credential for a new access credential
    ///
    /// A rejection clears the session flag and returns
    /// [`Error::TokenRefresh`]. Success does not set the flag.
    pub async fn refresh(&self) -> Result<()> {
        let Some(refresh_token) = self.credentials.refresh_token().await? else {
            warn!("Token refresh requested without a refresh credential");
            self.forget_session().await;
            return Err(Error::TokenRefresh);
        };

        let mut form = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
        ];
        if let Some(cookie_path) = self.cookie_path.as_deref() {
            form.push(("cookie_path", cookie_path));
        }

        let response = self
            .http_client
            .post(self.token_url.clone())
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(
                "Token refresh rejected with status {}",
                response.status().as_u16()
            );
            self.forget_session().await;
            return Err(Error::TokenRefresh);
        }

        self.store_tokens(response).await?;
        debug!("Access token refreshed");
        Ok(())
    }

    /// Whether the session flag says we are logged in
    pub async fn is_logged_in(&self) -> bool {
        self.session.is_logged_in().await
    }

    /// The session flag
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// The credential provider
    pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        &self.credentials
    }

    /// Hand a token response body to the credential provider
    ///
    /// Bodies that are not token JSON are ignored; cookie-mode servers are
    /// free to answer with anything.
    async fn store_tokens(&self, response: Response) -> Result<()> {
        match response.json::<TokenResponse>().await {
            Ok(tokens) => self.credentials.update(tokens).await,
            Err(e) => {
                debug!("Token response carried no token body: {e}");
                Ok(())
            }
        }
    }

    /// Clear the session flag on a path that already returns an error
    async fn forget_session(&self) {
        if let Err(e) = self.session.clear().await {
            warn!("Failed to clear session flag: {e}");
        }
    }
}
