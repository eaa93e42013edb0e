//! Main HTTP server.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{FromRef, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::{SignedCookieJar, cookie::Key};
use chrono::{DateTime, Utc};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, info, warn};

use prinix_core::{PrinixError, ReplyPayload};
use prinix_routing::IntentRouter;

use crate::health_api;
use crate::landing;
use crate::session::session_from_jar;

/// Where the process runs; decides which OS-level features are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Deployment {
    /// Local machine with a desktop: open targets, speak, launch a browser.
    #[default]
    Desktop,
    /// Hosted without a desktop: those features are switched off.
    Serverless,
}

impl Deployment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Serverless => "serverless",
        }
    }
}

impl FromStr for Deployment {
    type Err = PrinixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" | "local" => Ok(Self::Desktop),
            "serverless" | "vercel" => Ok(Self::Serverless),
            other => Err(PrinixError::Config(format!("unknown deployment '{other}'"))),
        }
    }
}

/// Application state shared across routes.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<IntentRouter>,
    pub cookie_key: Key,
    pub deployment: Deployment,
    pub template_dir: Arc<PathBuf>,
    pub static_dir: Arc<PathBuf>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        router: Arc<IntentRouter>,
        cookie_key: Key,
        deployment: Deployment,
        template_dir: impl Into<PathBuf>,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            router,
            cookie_key,
            deployment,
            template_dir: Arc::new(template_dir.into()),
            static_dir: Arc::new(static_dir.into()),
            started_at: Utc::now(),
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Build the router with every route and layer.
pub fn build_router(state: AppState) -> Router {
    let assets = ServeDir::new(state.static_dir.as_ref());
    Router::new()
        .route("/", get(landing::home))
        .route("/ask", post(ask))
        .route("/api/health", get(health_api::get_health))
        .nest_service("/static", assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Pull `message` out of the body; anything malformed counts as empty.
fn extract_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_default()
}

/// Browsers send `text/plain` and form bodies cross-site without a
/// preflight, so only an explicit JSON content type is accepted.
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// `POST /ask`: 200 with a reply payload for any JSON request.
async fn ask(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: SignedCookieJar,
    body: Bytes,
) -> Response {
    if !is_json(&headers) {
        debug!(
            content_type = ?headers.get(header::CONTENT_TYPE),
            "Rejecting non-JSON /ask request"
        );
        return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
    }
    let (jar, session) = session_from_jar(jar);
    let message = extract_message(&body);
    let payload = state.router.route(&message, &session).await;
    (jar, Json(payload)).into_response()
}

/// Serve on an already-bound listener until Ctrl-C, then drop conversations.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let router = Arc::clone(&state.router);
    let app = build_router(state);

    info!("HTTP server listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(store) = router.chat().store() {
        store.clear().await;
    }
    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use prinix_chat::{ChatFallback, MockBackend};
    use prinix_core::MediaDescriptor;
    use prinix_media::StaticResolver;
    use prinix_opener::UnsupportedOpener;
    use prinix_tts::Narrator;
    use tower::ServiceExt;

    fn state_with(backend: &MockBackend, static_dir: &std::path::Path) -> AppState {
        let router = IntentRouter::new(
            Arc::new(StaticResolver::found(MediaDescriptor {
                title: "Song".into(),
                url: "http://media/song".into(),
                id: "s1".into(),
            })),
            Arc::new(UnsupportedOpener),
            ChatFallback::from_backend(Some(Arc::new(backend.clone())), 0),
            Narrator::disabled(),
        );
        AppState::new(
            Arc::new(router),
            Key::generate(),
            Deployment::Serverless,
            static_dir.join("no-templates"),
            static_dir,
        )
    }

    fn ask_request(body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/ask")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ask_sets_session_cookie_and_reuses_it() {
        let dir = tempfile::tempdir().unwrap();
        let backend = MockBackend::new();
        let app = build_router(state_with(&backend, dir.path()));

        let resp = app
            .clone()
            .oneshot(ask_request(r#"{"message": "tell me a joke"}"#, None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let set_cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .expect("session cookie set")
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with("prinix_session="));
        assert!(set_cookie.contains("HttpOnly"));
        assert_eq!(json_body(resp).await["reply"], "session 1 turn 1");

        let cookie = set_cookie.split(';').next().unwrap();
        let resp = app
            .oneshot(ask_request(r#"{"message": "another"}"#, Some(cookie)))
            .await
            .unwrap();
        assert!(resp.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(json_body(resp).await["reply"], "session 1 turn 2");
        assert_eq!(backend.sessions_created(), 1);
    }

    #[tokio::test]
    async fn test_tampered_cookie_gets_new_session() {
        let dir = tempfile::tempdir().unwrap();
        let backend = MockBackend::new();
        let app = build_router(state_with(&backend, dir.path()));

        let resp = app
            .oneshot(ask_request(
                r#"{"message": "question"}"#,
                Some("prinix_session=forged-value"),
            ))
            .await
            .unwrap();
        assert!(resp.headers().get(header::SET_COOKIE).is_some());
    }

    #[tokio::test]
    async fn test_cross_site_text_plain_is_not_routed() {
        let dir = tempfile::tempdir().unwrap();
        let backend = MockBackend::new();
        let app = build_router(state_with(&backend, dir.path()));

        let request = Request::builder()
            .method("POST")
            .uri("/ask")
            .header(header::ORIGIN, "https://evil.example")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(r#"{"message": "open notes.txt"}"#))
            .unwrap();
        let resp = app.oneshot(request).await.unwrap();

        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert!(resp.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(backend.sessions_created(), 0);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let backend = MockBackend::new();
        let app = build_router(state_with(&backend, dir.path()));

        let request = Request::builder()
            .method("POST")
            .uri("/ask")
            .body(Body::from(r#"{"message": "hello"}"#))
            .unwrap();
        let resp = app.oneshot(request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(backend.sessions_created(), 0);
    }

    #[tokio::test]
    async fn test_json_with_charset_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(state_with(&MockBackend::new(), dir.path()));

        let request = Request::builder()
            .method("POST")
            .uri("/ask")
            .header(header::CONTENT_TYPE, "Application/JSON; charset=utf-8")
            .body(Body::from(r#"{"message": "hello"}"#))
            .unwrap();
        let resp = app.oneshot(request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["reply"], "👋 Hello! How can I help you?");
    }

    #[tokio::test]
    async fn test_play_reply_shape() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(state_with(&MockBackend::new(), dir.path()));

        let resp = app
            .oneshot(ask_request(r#"{"message": "play song"}"#, None))
            .await
            .unwrap();
        let json = json_body(resp).await;
        assert_eq!(json["reply"], "🎵 Song");
        assert_eq!(json["music_url"], "http://media/song");
        assert!(json.get("redirect").is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_is_empty_message() {
        let dir = tempfile::tempdir().unwrap();
        let backend = MockBackend::new();
        let app = build_router(state_with(&backend, dir.path()));

        let resp = app.oneshot(ask_request("not json", None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(json_body(resp).await["reply"].is_string());
        assert_eq!(backend.messages_for(1), vec![""]);
    }

    #[tokio::test]
    async fn test_landing_page_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(state_with(&MockBackend::new(), dir.path()));

        let resp = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&html).contains("PRINIX"));
    }

    #[tokio::test]
    async fn test_static_assets_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log('hi');").unwrap();
        let app = build_router(state_with(&MockBackend::new(), dir.path()));

        let resp = app
            .clone()
            .oneshot(Request::get("/static/app.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .oneshot(Request::get("/static/missing.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_report() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(state_with(&MockBackend::new(), dir.path()));

        let resp = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = json_body(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["deployment"], "serverless");
        assert_eq!(json["chat_configured"], true);
        assert_eq!(json["conversations"], 0);
    }

    #[test]
    fn test_deployment_parse() {
        assert_eq!("Desktop".parse::<Deployment>().unwrap(), Deployment::Desktop);
        assert_eq!("serverless".parse::<Deployment>().unwrap(), Deployment::Serverless);
        assert!("mainframe".parse::<Deployment>().is_err());
    }

    #[test]
    fn test_extract_message() {
        assert_eq!(extract_message(br#"{"message": "hi"}"#), "hi");
        assert_eq!(extract_message(br#"{"message": 42}"#), "");
        assert_eq!(extract_message(b"{}"), "");
        assert_eq!(extract_message(b""), "");
    }
}
