//! Tests for the auth module

use super::*;
use crate::config::{ClientConfig, CredentialsMode};
use crate::error::Error;
use crate::session::SessionState;
use std::sync::Arc;
use test_case::test_case;
use wiremock::matchers::{body_string, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn authenticator(
    server: &MockServer,
    mode: CredentialsMode,
    credentials: Arc<dyn CredentialProvider>,
) -> (Authenticator, SessionState) {
    let config = ClientConfig::builder()
        .base_url(server.uri())
        .credentials(mode)
        .build();
    let session = SessionState::in_memory();
    let auth = Authenticator::new(
        &config,
        reqwest::Client::new(),
        credentials,
        session.clone(),
    )
    .unwrap();
    (auth, session)
}

fn cookie_authenticator(server: &MockServer) -> (Authenticator, SessionState) {
    authenticator(server, CredentialsMode::Cookie, Arc::new(CookieCredentials))
}

// ============================================================================
// Classifier Tests
// ============================================================================

#[test_case("/api/v1/files" => true; "files root")]
#[test_case("/api/v1/files/" => true; "files root with slash")]
#[test_case("/api/v1/files/doc.txt" => true; "file under root")]
#[test_case("/api/v1/files/dir/sub/doc.txt" => true; "nested file")]
#[test_case("/api/v1/files/shares" => true; "shares without trailing part")]
#[test_case("/api/v1/files/shares/" => true; "shares with empty trailing part")]
#[test_case("/api/v1/files/shares/abc" => false; "share token")]
#[test_case("/api/v1/files/shares/abc/doc.txt" => false; "file inside share")]
#[test_case("/api/v1/other" => false; "other api")]
#[test_case("/api/v1/auth/token" => false; "token endpoint")]
#[test_case("/" => false; "root")]
#[test_case("" => false; "empty")]
#[test_case("api/v1/files/doc.txt" => false; "relative")]
fn test_requires_authorization(path: &str) -> bool {
    requires_authorization(path)
}

#[test]
fn test_classifier_custom_roots() {
    let classifier = PathClassifier::new("/files/", "public").unwrap();
    assert!(classifier.requires_authorization("/files/a"));
    assert!(!classifier.requires_authorization("/files/public/x"));
    assert!(!classifier.requires_authorization("/api/v1/files/a"));
}

#[test]
fn test_classifier_escapes_roots() {
    let classifier = PathClassifier::new("/a.b", "s+").unwrap();
    assert!(classifier.requires_authorization("/a.b/x"));
    assert!(!classifier.requires_authorization("/axb/x"));
    assert!(!classifier.requires_authorization("/a.b/s+/x"));
    assert!(classifier.requires_authorization("/a.b/ss/x"));
}

#[test]
fn test_classifier_from_config() {
    let config = ClientConfig::default();
    let classifier = PathClassifier::from_config(&config).unwrap();
    assert!(classifier.requires_authorization("/api/v1/files/doc.txt"));
    assert!(!classifier.requires_authorization("/api/v1/files/shares/abc"));
}

// ============================================================================
// Credential Provider Tests
// ============================================================================

#[tokio::test]
async fn test_cookie_credentials_placeholders() {
    let creds = CookieCredentials;
    assert_eq!(
        creds.access_token().await.unwrap().as_deref(),
        Some("cookie:access_token")
    );
    assert_eq!(
        creds.refresh_token().await.unwrap().as_deref(),
        Some("cookie:refresh_token")
    );
}

#[tokio::test]
async fn test_token_credentials_update_and_clear() {
    let creds = TokenCredentials::new();
    assert!(creds.access_token().await.unwrap().is_none());

    let response: TokenResponse = serde_json::from_value(serde_json::json!({
        "access_token": "a1",
        "refresh_token": "r1",
        "expires_in": 300
    }))
    .unwrap();
    creds.update(response).await.unwrap();
    assert_eq!(creds.access_token().await.unwrap().as_deref(), Some("a1"));
    assert_eq!(creds.refresh_token().await.unwrap().as_deref(), Some("r1"));

    // A refresh that does not rotate the refresh token keeps the old one
    let response: TokenResponse =
        serde_json::from_value(serde_json::json!({ "access_token": "a2" })).unwrap();
    creds.update(response).await.unwrap();
    assert_eq!(creds.access_token().await.unwrap().as_deref(), Some("a2"));
    assert_eq!(creds.refresh_token().await.unwrap().as_deref(), Some("r1"));

    creds.clear().await.unwrap();
    assert!(creds.tokens().await.is_none());
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_success_sets_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token"))
        .and(body_string(
            "grant_type=password&username=u&password=good&cookie_path=%2Fapi%2Fv1%2Ffiles",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "bearer",
            "expires_in": 300,
            "access_token": "cookie:access_token",
            "refresh_token": "cookie:refresh_token"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (auth, session) = cookie_authenticator(&mock_server);
    auth.login("u", "good").await.unwrap();

    assert!(session.is_logged_in().await);
    assert!(auth.is_logged_in().await);
}

#[tokio::test]
async fn test_login_rejected_leaves_session_unset() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let (auth, session) = cookie_authenticator(&mock_server);
    let err = auth.login("u", "bad").await.unwrap_err();

    assert!(matches!(err, Error::Login));
    assert!(!session.is_logged_in().await);
}

#[tokio::test]
async fn test_login_token_mode_stores_tokens() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token"))
        .and(body_string("grant_type=password&username=u&password=p"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "bearer",
            "expires_in": 300,
            "access_token": "real-access",
            "refresh_token": "real-refresh"
        })))
        .mount(&mock_server)
        .await;

    let creds = Arc::new(TokenCredentials::new());
    let (auth, _session) = authenticator(&mock_server, CredentialsMode::Token, creds.clone());
    auth.login("u", "p").await.unwrap();

    let tokens = creds.tokens().await.unwrap();
    assert_eq!(tokens.access_token, "real-access");
    assert_eq!(tokens.refresh_token.as_deref(), Some("real-refresh"));
}

#[tokio::test]
async fn test_login_success_without_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let (auth, session) = cookie_authenticator(&mock_server);
    auth.login("u", "good").await.unwrap();
    assert!(session.is_logged_in().await);
}

// ============================================================================
// Logout Tests
// ============================================================================

#[tokio::test]
async fn test_logout_success_clears_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/revoke"))
        .and(body_string("token=cookie%3Arefresh_token&hint=access_token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (auth, session) = cookie_authenticator(&mock_server);
    session.set_logged_in().await.unwrap();

    auth.logout().await.unwrap();
    assert!(!session.is_logged_in().await);
}

#[tokio::test]
async fn test_logout_rejected_keeps_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/revoke"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let (auth, session) = cookie_authenticator(&mock_server);
    session.set_logged_in().await.unwrap();

    let err = auth.logout().await.unwrap_err();
    assert!(matches!(err, Error::Logout));
    assert!(session.is_logged_in().await);
}

#[tokio::test]
async fn test_logout_without_refresh_token() {
    let mock_server = MockServer::start().await;

    let (auth, _session) = authenticator(
        &mock_server,
        CredentialsMode::Token,
        Arc::new(TokenCredentials::new()),
    );
    let err = auth.logout().await.unwrap_err();
    assert!(matches!(err, Error::Logout));
}

#[tokio::test]
async fn test_logout_token_mode_clears_tokens() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/revoke"))
        .and(body_string("token=r1&hint=access_token"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let creds = Arc::new(TokenCredentials::with_tokens(TokenPair::new(
        "a1",
        Some("r1".to_string()),
    )));
    let (auth, _session) = authenticator(&mock_server, CredentialsMode::Token, creds.clone());
    auth.logout().await.unwrap();

    assert!(creds.tokens().await.is_none());
}

// ============================================================================
// Refresh Tests
// ============================================================================

#[tokio::test]
async fn test_refresh_success_does_not_set_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=cookie%3Arefresh_token"))
        .and(body_string_contains("cookie_path=%2Fapi%2Fv1%2Ffiles"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (auth, session) = cookie_authenticator(&mock_server);
    auth.refresh().await.unwrap();

    assert!(!session.is_logged_in().await);
}

#[tokio::test]
async fn test_refresh_failure_clears_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_request",
            "description": "refresh token corrupted or absent"
        })))
        .mount(&mock_server)
        .await;

    let (auth, session) = cookie_authenticator(&mock_server);
    session.set_logged_in().await.unwrap();

    let err = auth.refresh().await.unwrap_err();
    assert!(matches!(err, Error::TokenRefresh));
    assert!(err.requires_login());
    assert!(!session.is_logged_in().await);
}

#[tokio::test]
async fn test_refresh_without_refresh_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (auth, session) = authenticator(
        &mock_server,
        CredentialsMode::Token,
        Arc::new(TokenCredentials::new()),
    );
    session.set_logged_in().await.unwrap();

    let err = auth.refresh().await.unwrap_err();
    assert!(matches!(err, Error::TokenRefresh));
    assert!(!session.is_logged_in().await);
}

#[tokio::test]
async fn test_refresh_token_mode_rotates_access_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/token"))
        .and(body_string("grant_type=refresh_token&refresh_token=r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "a2",
            "refresh_token": "r2",
            "expires_in": 300
        })))
        .mount(&mock_server)
        .await;

    let creds = Arc::new(TokenCredentials::with_tokens(TokenPair::new(
        "a1",
        Some("r1".to_string()),
    )));
    let (auth, _session) = authenticator(&mock_server, CredentialsMode::Token, creds.clone());
    auth.refresh().await.unwrap();

    let tokens = creds.tokens().await.unwrap();
    assert_eq!(tokens.access_token, "a2");
    assert_eq!(tokens.refresh_token.as_deref(), Some("r2"));
}
