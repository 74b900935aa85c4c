//! Authentication module
//!
//! Path classification, credential providers, and the token endpoint
//! operations (login, logout, refresh).
//!
//! The `Authenticator` owns the session flag transitions; the request layer
//! in [`crate::http`] only calls `refresh` when a protected request is
//! rejected.

mod authenticator;
mod classifier;
mod credentials;
mod types;

pub use authenticator::Authenticator;
pub use classifier::{
    requires_authorization, PathClassifier, DEFAULT_FILES_ROOT, DEFAULT_SHARES_ROOT,
};
pub use credentials::{
    CookieCredentials, CredentialProvider, TokenCredentials, COOKIE_ACCESS_TOKEN,
    COOKIE_REFRESH_TOKEN,
};
pub use types::{TokenPair, TokenResponse};

#[cfg(test)]
mod tests;
