//! Request descriptor

use bytes::Bytes;
use futures::future::BoxFuture;
use reqwest::Method;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Observer receiving upload progress as a percentage (0-100)
pub type ProgressCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// Recovery hook invoked once when a protected transfer is rejected with 401
pub type UnauthorizedCallback = Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Request payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// Raw bytes, sent as-is
    Bytes(Bytes),
    /// `application/x-www-form-urlencoded` key/value pairs
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// Encode into wire bytes and the content type they imply
    pub fn encode(&self) -> (Option<Bytes>, Option<&'static str>) {
        match self {
            RequestBody::Empty => (None, None),
            RequestBody::Bytes(bytes) => (Some(bytes.clone()), None),
            RequestBody::Form(pairs) => {
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs)
                    .finish();
                (
                    Some(Bytes::from(encoded)),
                    Some("application/x-www-form-urlencoded"),
                )
            }
        }
    }

    /// Encoded length in bytes
    pub fn len(&self) -> usize {
        self.encode().0.map_or(0, |b| b.len())
    }

    /// Whether the body is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything needed to issue one request, minus the path
#[derive(Clone, Default)]
pub struct RequestOptions {
    /// HTTP method
    pub method: Method,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body
    pub body: RequestBody,
    /// Upload progress observer (transfers only)
    pub progress: Option<ProgressCallback>,
    /// 401 recovery hook (transfers only)
    pub on_unauthorized: Option<UnauthorizedCallback>,
}

impl RequestOptions {
    /// Create options for a GET request
    pub fn new() -> Self {
        Self::default()
    }

    /// Create options for the given method
    pub fn with_method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Set the method
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set a raw body
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = RequestBody::Bytes(body.into());
        self
    }

    /// Set a form-encoded body
    #[must_use]
    pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = RequestBody::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Observe upload progress
    #[must_use]
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(callback));
        self
    }

    /// Recover from a 401 before the single retry
    #[must_use]
    pub fn on_unauthorized<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_unauthorized = Some(Arc::new(
            move || -> BoxFuture<'static, anyhow::Result<()>> { Box::pin(callback()) },
        ));
        self
    }

    /// Use an already boxed recovery hook
    #[must_use]
    pub fn unauthorized_callback(mut self, callback: UnauthorizedCallback) -> Self {
        self.on_unauthorized = Some(callback);
        self
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("method", &self.method)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("body_len", &self.body.len())
            .field("has_progress", &self.progress.is_some())
            .field("has_on_unauthorized", &self.on_unauthorized.is_some())
            .finish()
    }
}
