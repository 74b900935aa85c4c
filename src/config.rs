//! Client configuration
//!
//! Configuration for the authenticated client, loaded from YAML or built in
//! code. Every endpoint is an absolute path on the server named by `base_url`.

use crate::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable overriding `base_url`
pub const ENV_BASE_URL: &str = "WEBUI_BASE_URL";

/// Environment variable overriding `session_file`
pub const ENV_SESSION_FILE: &str = "WEBUI_SESSION_FILE";

// ============================================================================
// Credentials Mode
// ============================================================================

/// How credentials are carried between client and server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialsMode {
    /// Tokens live in HTTP-only cookies; requests carry placeholders
    #[default]
    Cookie,
    /// Tokens are returned in the token response body and kept in memory
    Token,
}

// ============================================================================
// Client Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server origin, e.g. `https://127.0.0.1:14148`
    pub base_url: String,

    /// Token endpoint (password and refresh grants)
    pub token_endpoint: String,

    /// Revoke endpoint (logout)
    pub revoke_endpoint: String,

    /// Root under which every path requires authorization
    pub files_root: String,

    /// Sub-path of `files_root` served without authorization
    pub shares_root: String,

    /// Cookie scoping hint sent with token requests (cookie mode only).
    /// Defaults to `files_root`.
    pub cookie_path: Option<String>,

    /// Credentials mode
    pub credentials: CredentialsMode,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,

    /// User agent string
    pub user_agent: String,

    /// File used to remember the session flag between runs
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:14148".to_string(),
            token_endpoint: "/api/v1/auth/token".to_string(),
            revoke_endpoint: "/api/v1/auth/revoke".to_string(),
            files_root: "/api/v1/files".to_string(),
            shares_root: "shares".to_string(),
            cookie_path: None,
            credentials: CredentialsMode::Cookie,
            timeout_ms: 30_000,
            user_agent: format!("webui-auth/{}", env!("CARGO_PKG_VERSION")),
            session_file: None,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&contents)
    }

    /// Parse a config from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `WEBUI_*` environment overrides
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Ok(session_file) = std::env::var(ENV_SESSION_FILE) {
            self.session_file = Some(PathBuf::from(session_file));
        }
        self
    }

    /// Check the config for values that can never work
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)?;

        for (field, value) in [
            ("token_endpoint", &self.token_endpoint),
            ("revoke_endpoint", &self.revoke_endpoint),
            ("files_root", &self.files_root),
        ] {
            if !value.starts_with('/') {
                return Err(Error::config(format!(
                    "'{field}' must be an absolute path, got {value:?}"
                )));
            }
        }

        if self.shares_root.is_empty() || self.shares_root.contains('/') {
            return Err(Error::config(format!(
                "'shares_root' must be a single path segment, got {:?}",
                self.shares_root
            )));
        }

        Ok(())
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cookie scoping hint to send with token requests, if any
    pub fn effective_cookie_path(&self) -> Option<&str> {
        match self.credentials {
            CredentialsMode::Cookie => {
                Some(self.cookie_path.as_deref().unwrap_or(&self.files_root))
            }
            CredentialsMode::Token => None,
        }
    }

    /// Resolve an absolute request path against `base_url`
    pub fn url(&self, path: &str) -> Result<Url> {
        let base = Url::parse(&self.base_url)?;
        Ok(base.join(path)?)
    }
}

/// Builder for client config
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the token endpoint
    pub fn token_endpoint(mut self, path: impl Into<String>) -> Self {
        self.config.token_endpoint = path.into();
        self
    }

    /// Set the revoke endpoint
    pub fn revoke_endpoint(mut self, path: impl Into<String>) -> Self {
        self.config.revoke_endpoint = path.into();
        self
    }

    /// Set the protected files root
    pub fn files_root(mut self, path: impl Into<String>) -> Self {
        self.config.files_root = path.into();
        self
    }

    /// Set the unprotected shares segment
    pub fn shares_root(mut self, segment: impl Into<String>) -> Self {
        self.config.shares_root = segment.into();
        self
    }

    /// Set the cookie scoping hint
    pub fn cookie_path(mut self, path: impl Into<String>) -> Self {
        self.config.cookie_path = Some(path.into());
        self
    }

    /// Set the credentials mode
    pub fn credentials(mut self, mode: CredentialsMode) -> Self {
        self.config.credentials = mode;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the session file
    pub fn session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.session_file = Some(path.into());
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
