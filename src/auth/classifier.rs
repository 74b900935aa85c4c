//! Path classification
//!
//! Decides whether a request path needs an access credential. Everything
//! under the files root is protected, except the public shares sub-tree.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Default protected root
pub const DEFAULT_FILES_ROOT: &str = "/api/v1/files";

/// Default public sub-path of the protected root
pub const DEFAULT_SHARES_ROOT: &str = "shares";

static DEFAULT_CLASSIFIER: Lazy<PathClassifier> = Lazy::new(PathClassifier::default);

/// Check a path against the default classification rule
///
/// ```
/// use webui_auth::auth::requires_authorization;
///
/// assert!(requires_authorization("/api/v1/files/doc.txt"));
/// assert!(!requires_authorization("/api/v1/files/shares/abc"));
/// assert!(!requires_authorization("/api/v1/other"));
/// ```
pub fn requires_authorization(path: &str) -> bool {
    DEFAULT_CLASSIFIER.requires_authorization(path)
}

/// Two-pattern path classifier
#[derive(Debug, Clone)]
pub struct PathClassifier {
    protected: Regex,
    unprotected: Regex,
}

impl PathClassifier {
    /// Build a classifier for the given files root and shares segment
    pub fn new(files_root: &str, shares_root: &str) -> Result<Self> {
        let root = regex::escape(files_root.trim_end_matches('/'));
        let shares = regex::escape(shares_root.trim_matches('/'));

        let protected = Regex::new(&format!("^{root}"))
            .map_err(|e| Error::config(format!("Invalid files root pattern: {e}")))?;
        let unprotected = Regex::new(&format!("^{root}/{shares}/."))
            .map_err(|e| Error::config(format!("Invalid shares pattern: {e}")))?;

        Ok(Self {
            protected,
            unprotected,
        })
    }

    /// Build a classifier from the client config
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.files_root, &config.shares_root)
    }

    /// Whether `path` needs an access credential
    pub fn requires_authorization(&self, path: &str) -> bool {
        !self.unprotected.is_match(path) && self.protected.is_match(path)
    }
}

impl Default for PathClassifier {
    fn default() -> Self {
        // Escaped literals always compile.
        Self::new(DEFAULT_FILES_ROOT, DEFAULT_SHARES_ROOT)
            .expect("default classifier patterns are valid")
    }
}
