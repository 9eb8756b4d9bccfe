//! Integration tests for authentication and session acquisition

use percolate::config::RedditConfig;
use percolate::session::{Credentials, SessionManager};
use percolate::AuthError;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn manager(base: &str) -> SessionManager {
    let reddit = RedditConfig {
        data_url: base.to_string(),
        oauth_url: format!("{base}/api/v1"),
        web_url: "https://www.example.com".to_string(),
        redirect_uri: "https://app.example.com/oauth/redirect".to_string(),
        scope: "identity read".to_string(),
    };
    SessionManager::new(&reddit, "percolate-test", "app-id", "app-secret").unwrap()
}

async fn mount_identity(server: &MockServer, name: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v1/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": name})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_refresh_token_takes_precedence_over_password() {
    let server = MockServer::start().await;
    mount_identity(&server, "alice").await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok"})))
        .expect(1)
        .mount(&server)
        .await;

    let creds = Credentials {
        user_id: "alice".to_string(),
        username: Some("alice".to_string()),
        password: Some("pw".to_string()),
        refresh_token: Some("refresh".to_string()),
        ..Credentials::default()
    };

    let session = manager(&server.uri()).authenticate(&creds).await.unwrap();
    assert_eq!(session.access_token, "tok");
    assert_eq!(session.display_name.as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_password_grant_sends_the_credentials() {
    let server = MockServer::start().await;
    mount_identity(&server, "alice").await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("username=alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok"})))
        .expect(1)
        .mount(&server)
        .await;

    let creds = Credentials::with_password("alice", "alice", "pw");
    let session = manager(&server.uri()).authenticate(&creds).await.unwrap();
    assert_eq!(session.access_token, "tok");
}

#[tokio::test]
async fn test_rejection_message_is_preserved_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "unsupported_grant_type"})),
        )
        .mount(&server)
        .await;

    let creds = Credentials::with_password("alice", "alice", "pw");
    let err = manager(&server.uri()).authenticate(&creds).await.unwrap_err();

    match err {
        AuthError::Rejected(message) => assert_eq!(message, "unsupported_grant_type"),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_identity_failure_is_tolerated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/me"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let creds = Credentials::with_password("alice", "alice", "pw");
    let session = manager(&server.uri()).authenticate(&creds).await.unwrap();

    assert_eq!(session.access_token, "tok");
    assert!(session.display_name.is_none());
}

#[tokio::test]
async fn test_stored_access_token_is_used_as_is() {
    let server = MockServer::start().await;
    mount_identity(&server, "alice").await;

    // No token endpoint mounted: a grant attempt would fail loudly
    let creds = Credentials {
        user_id: "alice".to_string(),
        access_token: Some("stored-tok".to_string()),
        ..Credentials::default()
    };

    let session = manager(&server.uri()).authenticate(&creds).await.unwrap();
    assert_eq!(session.access_token, "stored-tok");
}
