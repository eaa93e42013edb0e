//! Chat fallback: answers anything no other intent claimed.
//!
//! Never fails. Backend errors become a fixed apology and an unconfigured
//! backend becomes a fixed placeholder, without any network call.

use std::sync::Arc;

use tracing::warn;

use prinix_core::{ChatBackend, PrinixError, SessionId};
use prinix_logging::{redact_sensitive_data, TurnEvent, TurnEventLogger};

use crate::store::ConversationStore;

pub const NOT_SURE_REPLY: &str = "🤔 I'm not sure, but I'm learning!";
pub const CHAT_ERROR_REPLY: &str = "⚠️ Error contacting AI model.";
pub const EMPTY_RESPONSE_REPLY: &str = "🤖 (No response)";

pub struct ChatFallback {
    store: Option<ConversationStore>,
}

impl ChatFallback {
    pub fn new(store: ConversationStore) -> Self {
        Self { store: Some(store) }
    }

    /// Build from an optional backend; `None` means no credential was supplied.
    pub fn from_backend(backend: Option<Arc<dyn ChatBackend>>, max_entries: usize) -> Self {
        match backend {
            Some(backend) => Self::new(ConversationStore::new(backend).with_max_entries(max_entries)),
            None => Self::unconfigured(),
        }
    }

    pub fn unconfigured() -> Self {
        Self { store: None }
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    pub fn store(&self) -> Option<&ConversationStore> {
        self.store.as_ref()
    }

    pub async fn conversations(&self) -> usize {
        match &self.store {
            Some(store) => store.len().await,
            None => 0,
        }
    }

    /// Send `message` on the conversation for `id` and return the raw reply.
    pub async fn send(&self, id: &SessionId, message: &str) -> Result<String, PrinixError> {
        let store = self.store.as_ref().ok_or(PrinixError::ChatUnconfigured)?;
        let handle = store.handle(id).await;
        let mut session = handle.lock().await;
        session.send_message(message).await
    }

    /// Like [`send`](Self::send), with every outcome mapped to reply text.
    pub async fn chat(&self, id: &SessionId, message: &str) -> String {
        match self.send(id, message).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    EMPTY_RESPONSE_REPLY.to_string()
                } else {
                    text.to_string()
                }
            }
            Err(PrinixError::ChatUnconfigured) => NOT_SURE_REPLY.to_string(),
            Err(e) => {
                let error_msg = redact_sensitive_data(&e.to_string());
                warn!(session = %id, error = %error_msg, "Chat backend failed");
                let backend = self.store.as_ref().map_or("unknown", |s| s.backend_name());
                TurnEventLogger::log_event(
                    id.as_str(),
                    TurnEvent::BackendError {
                        backend: backend.to_string(),
                        error_msg,
                    },
                );
                CHAT_ERROR_REPLY.to_string()
            }
        }
    }
}
