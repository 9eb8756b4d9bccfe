//! Inbound HTTP surface: crawl trigger, status, and OAuth onboarding

mod rate_limit;
mod task;

pub use rate_limit::RateLimiter;
pub use task::{CrawlStatus, CrawlTask};

use crate::collector::CollectorService;
use crate::config::ServerConfig;
use crate::session::{SessionManager, SessionStore};
use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Shared state behind every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CollectorService>,
    pub manager: Arc<SessionManager>,
    pub sessions: Arc<dyn SessionStore>,
    pub task: Arc<CrawlTask>,
    pub limiter: Arc<RateLimiter>,
    pub api_key: Arc<str>,
}

impl AppState {
    pub fn new(
        service: Arc<CollectorService>,
        manager: Arc<SessionManager>,
        sessions: Arc<dyn SessionStore>,
        server: &ServerConfig,
        api_key: &str,
    ) -> Self {
        Self {
            service,
            manager,
            sessions,
            task: Arc::new(CrawlTask::new()),
            limiter: Arc::new(RateLimiter::new(server.rate_per_second, server.burst)),
            api_key: Arc::from(api_key),
        }
    }
}

/// Builds the full application router
///
/// The crawl endpoints sit behind the API key; the OAuth endpoints are
/// public. Everything shares one token bucket.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/collect", post(trigger_collect))
        .route("/collect/status", get(collect_status))
        .route("/collect/cancel", post(cancel_collect))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .merge(protected)
        .route("/authorize", get(authorize))
        .route("/oauth/redirect", get(oauth_redirect))
        .layer(middleware::from_fn_with_state(state.clone(), throttle))
        .with_state(state)
}

/// Rejects requests whose `X-API-Key` header does not match
async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get("X-API-Key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if presented != state.api_key.as_ref() {
        tracing::warn!("Rejected request with missing or bad API key");
        return (StatusCode::UNAUTHORIZED, "unauthorized").into_response();
    }
    next.run(request).await
}

async fn throttle(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !state.limiter.try_acquire() {
        return (StatusCode::TOO_MANY_REQUESTS, "slow down").into_response();
    }
    next.run(request).await
}

/// Starts a background collection run; 202 on start, 409 when one is
/// already in flight
async fn trigger_collect(State(state): State<AppState>) -> Response {
    if state.task.start(Arc::clone(&state.service)) {
        tracing::info!("Collection run triggered");
        (StatusCode::ACCEPTED, Json(json!({"status": "started"}))).into_response()
    } else {
        (
            StatusCode::CONFLICT,
            Json(json!({"status": "already running"})),
        )
            .into_response()
    }
}

async fn collect_status(State(state): State<AppState>) -> Json<CrawlStatus> {
    Json(state.task.status())
}

async fn cancel_collect(State(state): State<AppState>) -> Response {
    state.task.cancel();
    (StatusCode::ACCEPTED, Json(json!({"status": "cancelling"}))).into_response()
}

#[derive(Debug, Deserialize)]
struct AuthorizeParams {
    /// Local identifier the new account will be stored under
    #[serde(default = "default_user_id")]
    user_id: String,
}

fn default_user_id() -> String {
    "web".to_string()
}

/// Renders a consent link for onboarding a new account
///
/// The local user id rides along as the OAuth `state` parameter and comes
/// back on the redirect.
async fn authorize(
    State(state): State<AppState>,
    Query(params): Query<AuthorizeParams>,
) -> Response {
    match state.manager.authorize_url(&params.user_id) {
        Ok(url) => Html(format!(
            "<html><body><a href=\"{url}\">Authorize access</a></body></html>"
        ))
        .into_response(),
        Err(e) => {
            tracing::error!("Failed to build authorize URL: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "misconfigured").into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct RedirectParams {
    #[serde(default)]
    state: String,
    #[serde(default)]
    code: String,
    #[serde(default)]
    error: String,
}

/// OAuth consent callback: exchanges the code and stores the new account
async fn oauth_redirect(
    State(state): State<AppState>,
    Query(params): Query<RedirectParams>,
) -> Response {
    if !params.error.is_empty() {
        tracing::warn!("OAuth consent denied: {}", params.error);
        return (StatusCode::UNAUTHORIZED, "authorization denied").into_response();
    }
    if params.code.is_empty() {
        return (StatusCode::UNAUTHORIZED, "missing authorization code").into_response();
    }

    let user_id = if params.state.is_empty() {
        default_user_id()
    } else {
        params.state.clone()
    };

    match state.manager.exchange_code(&user_id, &params.code).await {
        Ok(creds) => {
            state.sessions.add(creds);
            tracing::info!("Authorized new account {}", user_id);
            (StatusCode::OK, "account authorized").into_response()
        }
        Err(e) => {
            tracing::warn!("Code exchange failed for {}: {}", user_id, e);
            (StatusCode::UNAUTHORIZED, "authorization failed").into_response()
        }
    }
}
