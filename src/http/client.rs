//! Authenticated request executor
//!
//! Both entry points run the same call driver:
//! - classify the path and attach the access credential to protected requests
//! - send once
//! - on 401, either recover and resend exactly once (protected paths) or
//!   surface a Basic challenge (unprotected paths)
//!
//! They differ only in scheduling. [`AuthenticatedClient::fetch`] is a single
//! awaited call that refreshes through the [`Authenticator`] and hands back
//! the raw response. [`AuthenticatedClient::transfer`] streams the body with
//! progress reporting, recovers through the caller's `on_unauthorized` hook,
//! resolves to the response body, and can be aborted.

use super::progress::progress_body;
use super::request::{RequestOptions, UnauthorizedCallback};
use crate::auth::{
    Authenticator, CookieCredentials, CredentialProvider, PathClassifier, TokenCredentials,
};
use crate::config::{ClientConfig, CredentialsMode};
use crate::error::{Error, Result};
use crate::session::{FileStore, SessionState};
use bytes::Bytes;
use futures::future::{AbortHandle, Abortable, BoxFuture, FutureExt};
use reqwest::header::{
    HeaderValue, AUTHORIZATION, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, WWW_AUTHENTICATE,
};
use reqwest::{Client, Request, Response, StatusCode};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Lifecycle of a single call
///
/// `Idle → Sent → {Succeeded | Failed | Unauthorized}`, with
/// `Unauthorized → Sent` taken at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallState {
    Idle,
    Sent,
    Succeeded,
    Failed,
    Unauthorized,
}

/// How a call is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Fetch,
    Transfer,
}

impl Strategy {
    fn cache_directive(self) -> &'static str {
        match self {
            Strategy::Fetch => "no-cache",
            Strategy::Transfer => "no-store",
        }
    }

    fn transport_error(self, e: reqwest::Error) -> Error {
        match self {
            Strategy::Fetch => Error::Http(e),
            Strategy::Transfer => Error::network(e.to_string()),
        }
    }
}

/// Per-call bookkeeping. Never shared between calls.
#[derive(Debug)]
struct Call<'a> {
    path: &'a str,
    state: CallState,
    has_retried: bool,
}

impl<'a> Call<'a> {
    fn new(path: &'a str) -> Self {
        Self {
            path,
            state: CallState::Idle,
            has_retried: false,
        }
    }

    fn transition(&mut self, next: CallState) {
        debug!("{} {:?} -> {:?}", self.path, self.state, next);
        self.state = next;
    }

    /// Claim the single retry; false if it was already used
    fn begin_retry(&mut self) -> bool {
        if self.has_retried {
            return false;
        }
        self.has_retried = true;
        true
    }
}

/// HTTP client that authenticates requests to protected paths
pub struct AuthenticatedClient {
    client: Client,
    config: ClientConfig,
    classifier: PathClassifier,
    authenticator: Authenticator,
}

impl AuthenticatedClient {
    /// Create a client with the credential provider and session store the
    /// config asks for
    pub fn new(config: ClientConfig) -> Result<Self> {
        let credentials: Arc<dyn CredentialProvider> = match config.credentials {
            CredentialsMode::Cookie => Arc::new(CookieCredentials),
            CredentialsMode::Token => Arc::new(TokenCredentials::new()),
        };

        let session = match &config.session_file {
            Some(path) => SessionState::new(Arc::new(FileStore::open(path)?)),
            None => SessionState::in_memory(),
        };

        Self::with_parts(config, credentials, session)
    }

    /// Create a client from explicit parts
    pub fn with_parts(
        config: ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
        session: SessionState,
    ) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .build()?;

        let classifier = PathClassifier::from_config(&config)?;
        let authenticator = Authenticator::new(&config, client.clone(), credentials, session)?;

        Ok(Self {
            client,
            config,
            classifier,
            authenticator,
        })
    }

    /// The client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The token endpoint operations
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// Whether `path` is sent with an access credential
    pub fn requires_authorization(&self, path: &str) -> bool {
        self.classifier.requires_authorization(path)
    }

    /// Log in with a username and password
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.authenticator.login(username, password).await
    }

    /// Revoke the current credentials
    pub async fn logout(&self) -> Result<()> {
        self.authenticator.logout().await
    }

    /// Refresh the access credential
    pub async fn refresh(&self) -> Result<()> {
        self.authenticator.refresh().await
    }

    /// Whether the session flag says we are logged in
    pub async fn is_logged_in(&self) -> bool {
        self.authenticator.is_logged_in().await
    }

    /// A recovery hook for [`transfer`](Self::transfer) that refreshes the
    /// access credential
    pub fn refresh_callback(&self) -> UnauthorizedCallback {
        let authenticator = self.authenticator.clone();
        Arc::new(move || -> BoxFuture<'static, anyhow::Result<()>> {
            let authenticator = authenticator.clone();
            async move { authenticator.refresh().await.map_err(anyhow::Error::from) }.boxed()
        })
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        self.fetch(path, &RequestOptions::new()).await
    }

    /// Issue a request and return the final response
    ///
    /// Only 401 is interpreted; every other status comes back as-is. A
    /// protected request is refreshed and resent once, and the second
    /// response is returned whatever its status.
    pub async fn fetch(&self, path: &str, options: &RequestOptions) -> Result<Response> {
        self.execute(path, options, Strategy::Fetch).await
    }

    /// Issue a request with upload progress and return the response body
    ///
    /// Any status outside 2xx is an [`Error::HttpStatus`]; failures below
    /// HTTP are [`Error::Network`].
    pub async fn transfer(&self, path: &str, options: &RequestOptions) -> Result<Bytes> {
        let response = self.execute(path, options, Strategy::Transfer).await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::http_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
            ));
        }

        response
            .bytes()
            .await
            .map_err(|e| Error::network(e.to_string()))
    }

    /// Like [`transfer`](Self::transfer), but cancelable through the returned
    /// handle. An aborted transfer resolves to [`Error::Aborted`].
    pub fn transfer_abortable<'a>(
        &'a self,
        path: &'a str,
        options: &'a RequestOptions,
    ) -> (AbortHandle, impl Future<Output = Result<Bytes>> + 'a) {
        let (handle, registration) = AbortHandle::new_pair();
        let transfer = Abortable::new(self.transfer(path, options), registration);
        (handle, async move { transfer.await.unwrap_or(Err(Error::Aborted)) })
    }

    /// The call driver shared by both strategies
    async fn execute(
        &self,
        path: &str,
        options: &RequestOptions,
        strategy: Strategy,
    ) -> Result<Response> {
        if !path.starts_with('/') {
            return Err(Error::relative_path(path));
        }

        let protected = self.classifier.requires_authorization(path);
        let url = self.config.url(path)?;
        let mut call = Call::new(path);

        loop {
            let request = self.build_request(&url, options, protected, strategy).await?;

            call.transition(CallState::Sent);
            let response = match self.client.execute(request).await {
                Ok(response) => response,
                Err(e) => {
                    call.transition(CallState::Failed);
                    return Err(strategy.transport_error(e));
                }
            };

            let status = response.status();
            if status != StatusCode::UNAUTHORIZED {
                call.transition(if status.is_success() {
                    CallState::Succeeded
                } else {
                    CallState::Failed
                });
                return Ok(response);
            }

            call.transition(CallState::Unauthorized);

            if !protected {
                if is_basic_challenge(&response) {
                    return Err(Error::BasicAuthRequired);
                }
                return Ok(response);
            }

            if !can_recover(options, strategy) {
                return Ok(response);
            }

            if !call.begin_retry() {
                warn!("{} still unauthorized after retry", path);
                return Ok(response);
            }

            drop(response);
            self.recover(options, strategy).await?;
            debug!("Credentials recovered, resending {} {}", options.method, path);
        }
    }

    /// Run the recovery step before the single retry
    async fn recover(&self, options: &RequestOptions, strategy: Strategy) -> Result<()> {
        match strategy {
            Strategy::Fetch => self.authenticator.refresh().await,
            Strategy::Transfer => match &options.on_unauthorized {
                Some(callback) => callback()
                    .await
                    .map_err(|e| e.downcast::<Error>().unwrap_or_else(Error::Anyhow)),
                None => Ok(()),
            },
        }
    }

    /// Build one attempt of the request
    ///
    /// Credentials are read on every attempt so a refreshed token is picked
    /// up by the retry.
    async fn build_request(
        &self,
        url: &Url,
        options: &RequestOptions,
        protected: bool,
        strategy: Strategy,
    ) -> Result<Request> {
        let mut builder = self.client.request(options.method.clone(), url.clone());

        for (key, value) in &options.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let (body, content_type) = options.body.encode();
        if let Some(body) = body {
            builder = match (strategy, &options.progress) {
                (Strategy::Transfer, Some(progress)) => builder
                    .header(CONTENT_LENGTH, body.len())
                    .body(progress_body(body, progress.clone())),
                _ => builder.body(body),
            };
        }

        let mut request = builder.build()?;
        let headers = request.headers_mut();

        if let Some(content_type) = content_type {
            headers
                .entry(CONTENT_TYPE)
                .or_insert(HeaderValue::from_static(content_type));
        }

        if protected {
            match self.authenticator.credentials().access_token().await? {
                Some(token) => {
                    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                        .map_err(|_| Error::auth("Access credential is not a valid header value"))?;
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                None => debug!("No access credential for {}", url.path()),
            }
            headers.insert(
                CACHE_CONTROL,
                HeaderValue::from_static(strategy.cache_directive()),
            );
        }

        Ok(request)
    }
}

impl std::fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("config", &self.config)
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}

/// Whether a 401 carries a `WWW-Authenticate: Basic ...` challenge
fn is_basic_challenge(response: &Response) -> bool {
    response
        .headers()
        .get(WWW_AUTHENTICATE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(' ').next())
        == Some("Basic")
}

/// Whether a 401 on a protected path can be recovered from
fn can_recover(options: &RequestOptions, strategy: Strategy) -> bool {
    match strategy {
        Strategy::Fetch => true,
        Strategy::Transfer => options.on_unauthorized.is_some(),
    }
}
