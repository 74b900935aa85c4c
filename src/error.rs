//! Error types for webui-auth
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! The authentication failures form a closed set: callers are expected to
//! match on [`Error::kind`] (or the variants directly), never on the message.

use thiserror::Error;

/// The main error type for webui-auth
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("{message}")]
    Auth { message: String },

    #[error("Token refresh failed")]
    TokenRefresh,

    #[error("Login failed")]
    Login,

    #[error("Logout failed")]
    Logout,

    #[error("Requires Basic Authentication")]
    BasicAuthRequired,

    // ============================================================================
    // Precondition Errors
    // ============================================================================
    #[error("The path must be absolute: {path:?}")]
    RelativePath { path: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed with status: {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Request aborted")]
    Aborted,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Session Errors
    // ============================================================================
    #[error("Session store error: {message}")]
    Session { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Distinguishable kinds of authentication failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    /// Generic authentication failure
    Auth,
    /// Exchanging the refresh credential failed
    TokenRefresh,
    /// The token endpoint rejected the username/password
    Login,
    /// The revoke endpoint rejected the logout
    Logout,
    /// An unprotected resource demands HTTP Basic authentication
    BasicAuthRequired,
}

impl Error {
    /// Create a generic auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a session store error
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, reason: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            reason: reason.into(),
        }
    }

    /// Create a relative path error
    pub fn relative_path(path: impl Into<String>) -> Self {
        Self::RelativePath { path: path.into() }
    }

    /// The authentication kind of this error, if it belongs to that category
    pub fn kind(&self) -> Option<AuthErrorKind> {
        match self {
            Error::Auth { .. } => Some(AuthErrorKind::Auth),
            Error::TokenRefresh => Some(AuthErrorKind::TokenRefresh),
            Error::Login => Some(AuthErrorKind::Login),
            Error::Logout => Some(AuthErrorKind::Logout),
            Error::BasicAuthRequired => Some(AuthErrorKind::BasicAuthRequired),
            _ => None,
        }
    }

    /// Check if this is an authentication-category error
    pub fn is_auth_error(&self) -> bool {
        self.kind().is_some()
    }

    /// Check if the caller should send the user back to the login screen
    pub fn requires_login(&self) -> bool {
        matches!(self, Error::TokenRefresh)
    }
}

/// Result type alias for webui-auth
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(Error::TokenRefresh.to_string(), "Token refresh failed");
        assert_eq!(Error::Login.to_string(), "Login failed");
        assert_eq!(Error::Logout.to_string(), "Logout failed");
        assert_eq!(
            Error::BasicAuthRequired.to_string(),
            "Requires Basic Authentication"
        );

        let err = Error::http_status(404, "Not Found");
        assert_eq!(err.to_string(), "Request failed with status: 404 Not Found");

        let err = Error::config("missing base_url");
        assert_eq!(err.to_string(), "Configuration error: missing base_url");
    }

    #[test]
    fn test_kind() {
        assert_eq!(Error::TokenRefresh.kind(), Some(AuthErrorKind::TokenRefresh));
        assert_eq!(Error::Login.kind(), Some(AuthErrorKind::Login));
        assert_eq!(Error::Logout.kind(), Some(AuthErrorKind::Logout));
        assert_eq!(
            Error::BasicAuthRequired.kind(),
            Some(AuthErrorKind::BasicAuthRequired)
        );
        assert_eq!(Error::auth("nope").kind(), Some(AuthErrorKind::Auth));

        assert_eq!(Error::relative_path("api").kind(), None);
        assert_eq!(Error::network("reset").kind(), None);
        assert!(!Error::http_status(401, "Unauthorized").is_auth_error());
    }

    #[test]
    fn test_requires_login() {
        assert!(Error::TokenRefresh.requires_login());
        assert!(!Error::Login.requires_login());
        assert!(!Error::BasicAuthRequired.requires_login());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
