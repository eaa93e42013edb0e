//! Detached speech queue.
//!
//! `narrate` hands text to a background task and returns at once. The task
//! speaks utterances one at a time. A full queue drops the new utterance and
//! speaker errors are discarded, so callers never wait on audio and never
//! see a speech failure.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::Speaker;

pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

#[derive(Clone)]
pub struct Narrator {
    tx: Option<mpsc::Sender<String>>,
}

impl Narrator {
    /// Start the background task. Must be called inside a Tokio runtime.
    pub fn spawn(speaker: Arc<dyn Speaker>, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<String>(capacity.max(1));
        tokio::spawn(async move {
            while let Some(text) = rx.recv().await {
                if let Err(e) = speaker.speak(&text).await {
                    debug!(error = %e, "Speech rendering failed");
                }
            }
        });
        Self { tx: Some(tx) }
    }

    /// A narrator that discards everything.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Queue `text` for speaking without waiting.
    pub fn narrate(&self, text: impl Into<String>) {
        let Some(tx) = &self.tx else {
            return;
        };
        let text = text.into();
        if text.trim().is_empty() {
            return;
        }
        if let Err(e) = tx.try_send(text) {
            debug!(error = %e, "Dropping utterance");
        }
    }
}
