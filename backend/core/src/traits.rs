use async_trait::async_trait;

use crate::error::PrinixError;
use crate::types::{MediaDescriptor, ReplyPayload};

/// Resolves a free-text query to a single playable audio result.
#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Backend name (e.g., "yt-dlp").
    fn name(&self) -> &str;

    /// Look up the best audio match for `query`.
    async fn resolve(&self, query: &str) -> Result<MediaDescriptor, PrinixError>;
}

/// One ongoing exchange with a generative-chat service.
///
/// The handle owns whatever conversational state the backend needs; every
/// call to `send_message` extends it.
#[async_trait]
pub trait ChatSession: Send {
    async fn send_message(&mut self, message: &str) -> Result<String, PrinixError>;
}

/// Factory for chat sessions.
pub trait ChatBackend: Send + Sync {
    /// Provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Start a new session with no prior turns.
    fn start_chat(&self) -> Box<dyn ChatSession>;
}

/// Opens a file, folder, application, or website named by free text.
///
/// Every outcome, including failure, is reported through the reply.
pub trait TargetOpener: Send + Sync {
    fn open(&self, target: &str) -> ReplyPayload;
}
