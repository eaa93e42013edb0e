use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use prinix_core::{ChatBackend, ChatSession, PrinixError};

/// A chat backend that returns canned responses and counts sessions.
#[derive(Clone, Default)]
pub struct MockBackend {
    fixed_response: Option<String>,
    fail: bool,
    created: Arc<AtomicUsize>,
    messages: Arc<Mutex<HashMap<usize, Vec<String>>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = Some(response.into());
        self
    }

    /// Every `send_message` fails.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Number of sessions started so far.
    pub fn sessions_created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Messages received by the n-th session (1-based).
    pub fn messages_for(&self, session: usize) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.get(&session).cloned().unwrap_or_default())
            .unwrap_or_default()
    }
}

impl ChatBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn start_chat(&self) -> Box<dyn ChatSession> {
        let number = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        Box::new(MockSession {
            number,
            backend: self.clone(),
        })
    }
}

struct MockSession {
    number: usize,
    backend: MockBackend,
}

#[async_trait]
impl ChatSession for MockSession {
    async fn send_message(&mut self, message: &str) -> Result<String, PrinixError> {
        if self.backend.fail {
            return Err(PrinixError::chat("mock", "service unavailable"));
        }
        let turn = match self.backend.messages.lock() {
            Ok(mut messages) => {
                let log = messages.entry(self.number).or_default();
                log.push(message.to_string());
                log.len()
            }
            Err(_) => 0,
        };
        Ok(self
            .backend
            .fixed_response
            .clone()
            .unwrap_or_else(|| format!("session {} turn {}", self.number, turn)))
    }
}
