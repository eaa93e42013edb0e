//! Health API

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub deployment: &'static str,
    pub chat_configured: bool,
    pub conversations: usize,
    pub uptime_seconds: i64,
    pub timestamp: DateTime<Utc>,
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<AppState>) -> Json<HealthReport> {
    let chat = state.router.chat();
    let now = Utc::now();
    Json(HealthReport {
        status: "ok",
        service: "prinix",
        version: env!("CARGO_PKG_VERSION"),
        deployment: state.deployment.as_str(),
        chat_configured: chat.is_configured(),
        conversations: chat.conversations().await,
        uptime_seconds: (now - state.started_at).num_seconds(),
        timestamp: now,
    })
}
