//! Integration tests for the HTTP surface

use axum::body::Body;
use axum::http::{Request, StatusCode};
use percolate::collector::CollectorService;
use percolate::config::{
    CollectorConfig, Config, DigestConfig, ExtractorConfig, RedditConfig, ServerConfig,
    StoreConfig, UserAgentConfig,
};
use percolate::server::{build_router, AppState};
use percolate::session::{MemorySessionStore, SessionManager, SessionStore};
use percolate::store::HttpContentStore;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn test_config(reddit_base: &str, rate_per_second: f64, burst: u32) -> Config {
    Config {
        collector: CollectorConfig {
            max_posts_per_channel: 10,
            min_subscribers: 10_000,
            min_text_length: 5,
            account_delay_seconds: 0,
            expand_similar: true,
        },
        extractor: ExtractorConfig {
            max_text_length: 4096,
            cache_capacity: 100,
            fetch_timeout_seconds: 5,
            ignore_url_patterns: vec![],
        },
        digest: DigestConfig {
            max_length: 24_576,
            child_length: 2_048,
            body_length: 2_048,
        },
        reddit: RedditConfig {
            data_url: reddit_base.to_string(),
            oauth_url: format!("{reddit_base}/api/v1"),
            web_url: "https://www.example.com".to_string(),
            redirect_uri: "https://app.example.com/oauth/redirect".to_string(),
            scope: "identity read".to_string(),
        },
        store: StoreConfig {
            base_url: "http://store.invalid".to_string(),
            retry_attempts: 1,
            retry_delay_seconds: 0,
        },
        server: ServerConfig {
            bind: "127.0.0.1:0".to_string(),
            rate_per_second,
            burst,
        },
        user_agent: UserAgentConfig {
            app_name: "percolate-test".to_string(),
            app_version: "0.0".to_string(),
        },
    }
}

fn build_app(config: &Config) -> (axum::Router, Arc<dyn SessionStore>) {
    let manager = Arc::new(
        SessionManager::new(
            &config.reddit,
            &config.user_agent.api_user_agent(),
            "app-id",
            "app-secret",
        )
        .unwrap(),
    );
    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());

    let sink = Arc::new(
        HttpContentStore::new(
            &config.store,
            API_KEY,
            &config.user_agent.api_user_agent(),
        )
        .unwrap(),
    );
    let service = Arc::new(
        CollectorService::new(
            config.clone(),
            Arc::clone(&manager),
            Arc::clone(&sessions),
            sink,
        )
        .unwrap(),
    );

    let state = AppState::new(service, manager, Arc::clone(&sessions), &config.server, API_KEY);
    (build_router(state), sessions)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_with_key(uri: &str, key: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("X-API-Key", key)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_collect_requires_api_key() {
    let (app, _) = build_app(&test_config("http://reddit.invalid", 100.0, 10));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/collect")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(post_with_key("/collect", "wrong-key"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_status_reports_idle_before_any_run() {
    let (app, _) = build_app(&test_config("http://reddit.invalid", 100.0, 10));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/collect/status")
                .header("X-API-Key", API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let status: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(status["state"], "idle");
}

#[tokio::test]
async fn test_trigger_and_cancel_are_accepted() {
    let server = MockServer::start().await;
    let (app, _) = build_app(&test_config(&server.uri(), 100.0, 10));

    let response = app
        .clone()
        .oneshot(post_with_key("/collect", API_KEY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = app
        .oneshot(post_with_key("/collect/cancel", API_KEY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_rate_limit_rejects_past_burst() {
    let (app, _) = build_app(&test_config("http://reddit.invalid", 0.001, 1));

    let first = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/collect/status")
                .header("X-API-Key", API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(
            Request::builder()
                .uri("/collect/status")
                .header("X-API-Key", API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_authorize_links_to_the_consent_page() {
    let (app, _) = build_app(&test_config("http://reddit.invalid", 100.0, 10));

    let response = app
        .oneshot(get("/authorize?user_id=alice"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("client_id=app-id"));
    assert!(html.contains("state=alice"));
}

#[tokio::test]
async fn test_redirect_with_error_is_unauthorized() {
    let (app, _) = build_app(&test_config("http://reddit.invalid", 100.0, 10));

    let response = app
        .clone()
        .oneshot(get("/oauth/redirect?error=access_denied"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.oneshot(get("/oauth/redirect?state=alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_redirect_exchanges_code_and_stores_the_account() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok",
            "refresh_token": "refresh"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, sessions) = build_app(&test_config(&server.uri(), 100.0, 10));

    let response = app
        .oneshot(get("/oauth/redirect?state=alice&code=abc123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let creds = sessions.get("alice").expect("account was stored");
    assert_eq!(creds.refresh_token.as_deref(), Some("refresh"));
    assert_eq!(creds.access_token.as_deref(), Some("tok"));
}

#[tokio::test]
async fn test_store_retries_until_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/contents"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let store = HttpContentStore::new(
        &StoreConfig {
            base_url: server.uri(),
            retry_attempts: 3,
            retry_delay_seconds: 0,
        },
        API_KEY,
        "percolate-test",
    )
    .unwrap();

    use percolate::store::ContentSink;
    let err = store.store_contents(&[]).await.unwrap_err();
    assert!(matches!(
        err,
        percolate::StoreError::RetriesExhausted { attempts: 3 }
    ));
}

#[tokio::test]
async fn test_store_sends_api_key_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/engagements"))
        .and(wiremock::matchers::header("X-API-Key", API_KEY))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = HttpContentStore::new(
        &StoreConfig {
            base_url: server.uri(),
            retry_attempts: 1,
            retry_delay_seconds: 0,
        },
        API_KEY,
        "percolate-test",
    )
    .unwrap();

    use percolate::store::ContentSink;
    store.store_engagements(&[]).await.unwrap();
}
