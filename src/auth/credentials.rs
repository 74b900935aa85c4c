//! Credential providers
//!
//! The request layer never looks inside a credential. It asks a provider for
//! the current access and refresh values and forwards them verbatim.

use super::types::{TokenPair, TokenResponse};
use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

/// Placeholder the server replaces with its `access_token` cookie
pub const COOKIE_ACCESS_TOKEN: &str = "cookie:access_token";

/// Placeholder the server replaces with its `refresh_token` cookie
pub const COOKIE_REFRESH_TOKEN: &str = "cookie:refresh_token";

/// Source of access and refresh credentials
#[async_trait]
pub trait CredentialProvider: Send + Sync + std::fmt::Debug {
    /// Current access credential, if any
    async fn access_token(&self) -> Result<Option<String>>;

    /// Current refresh credential, if any
    async fn refresh_token(&self) -> Result<Option<String>>;

    /// Called with the body of a successful login or refresh
    async fn update(&self, _tokens: TokenResponse) -> Result<()> {
        Ok(())
    }

    /// Called after a successful logout
    async fn clear(&self) -> Result<()> {
        Ok(())
    }
}

/// Credentials kept by the server in HTTP-only cookies
///
/// Requests carry placeholders and the transport's cookie jar carries the
/// real values, so this provider has nothing to store.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieCredentials;

#[async_trait]
impl CredentialProvider for CookieCredentials {
    async fn access_token(&self) -> Result<Option<String>> {
        Ok(Some(COOKIE_ACCESS_TOKEN.to_string()))
    }

    async fn refresh_token(&self) -> Result<Option<String>> {
        Ok(Some(COOKIE_REFRESH_TOKEN.to_string()))
    }
}

/// Bearer tokens returned in the token response body, held in memory
#[derive(Debug, Default)]
pub struct TokenCredentials {
    tokens: RwLock<Option<TokenPair>>,
}

impl TokenCredentials {
    /// Create an empty provider; tokens arrive with the first login
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider seeded with known tokens
    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
        }
    }

    /// Snapshot of the held tokens
    pub async fn tokens(&self) -> Option<TokenPair> {
        self.tokens.read().await.clone()
    }
}

#[async_trait]
impl CredentialProvider for TokenCredentials {
    async fn access_token(&self) -> Result<Option<String>> {
        Ok(self
            .tokens
            .read()
            .await
            .as_ref()
            .map(|t| t.access_token.clone()))
    }

    async fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self
            .tokens
            .read()
            .await
            .as_ref()
            .and_then(|t| t.refresh_token.clone()))
    }

    async fn update(&self, tokens: TokenResponse) -> Result<()> {
        let mut held = self.tokens.write().await;
        let previous_refresh = held.take().and_then(|t| t.refresh_token);
        *held = Some(tokens.into_token_pair(previous_refresh));
        debug!("Stored new token pair");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.tokens.write().await = None;
        Ok(())
    }
}
