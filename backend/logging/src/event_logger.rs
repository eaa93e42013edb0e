//! Turn Event Logger
//!
//! One structured record per handled utterance, emitted on the
//! `prinix_turns` tracing target so it can be filtered into its own stream.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum TurnEvent {
    /// An utterance was classified and answered.
    Routed { intent: String, reply: String },
    /// An external backend failed; the user got a fallback reply.
    BackendError { backend: String, error_msg: String },
}

#[derive(Debug, Serialize)]
pub struct TurnLogEntry {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: TurnEvent,
}

pub struct TurnEventLogger;

impl TurnEventLogger {
    /// Redact and emit a turn event.
    pub fn log_event(session_id: &str, event: TurnEvent) {
        let entry = Self::entry(session_id, event);
        match serde_json::to_string(&entry) {
            Ok(json) => info!(target: "prinix_turns", entry = %json, "turn"),
            Err(_) => info!(target: "prinix_turns", entry = ?entry, "turn"),
        }
    }

    fn entry(session_id: &str, mut event: TurnEvent) -> TurnLogEntry {
        match &mut event {
            TurnEvent::Routed { reply, .. } => {
                *reply = redact_sensitive_data(reply);
            }
            TurnEvent::BackendError { error_msg, .. } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
        }

        TurnLogEntry {
            session_id: session_id.into(),
            timestamp: Utc::now(),
            event,
        }
    }
}
