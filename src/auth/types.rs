//! Token types exchanged with the token endpoint

use serde::Deserialize;

/// Body of a successful token endpoint response
///
/// When the request carried a cookie path, the server answers with the
/// `cookie:access_token` / `cookie:refresh_token` placeholders and sets the
/// real values as HTTP-only cookies instead.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    /// Convert into a token pair, keeping `previous_refresh` when the
    /// response did not rotate the refresh token
    pub fn into_token_pair(self, previous_refresh: Option<String>) -> TokenPair {
        TokenPair {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh),
        }
    }
}

/// Access and refresh credential held client-side
///
/// Expiry is left to the server: a stale access token is discovered by the
/// 401 it earns, not by a local clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived bearer token
    pub access_token: String,
    /// Long-lived token exchanged for a new access token
    pub refresh_token: Option<String>,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
        }
    }
}
