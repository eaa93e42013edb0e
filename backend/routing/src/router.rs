//! Intent router: the single entry point for every utterance.
//!
//! Normalizes the input, classifies it, and dispatches to the matching
//! handler. Every path returns a reply payload; nothing here fails.

use std::sync::Arc;

use tracing::{debug, info, warn};

use prinix_chat::ChatFallback;
use prinix_core::{MediaResolver, PrinixError, ReplyPayload, SessionId, TargetOpener};
use prinix_logging::{TurnEvent, TurnEventLogger, redact_sensitive_data};
use prinix_tts::Narrator;

use crate::intent::{Intent, classify};
use crate::normalize::normalize;

pub const GREETING_REPLY: &str = "👋 Hello! How can I help you?";
pub const SONG_NOT_FOUND_REPLY: &str = "❌ Could not find that song.";
pub const DEFAULT_ASSISTANT_NAME: &str = "PRINIX";

pub struct IntentRouter {
    media: Arc<dyn MediaResolver>,
    opener: Arc<dyn TargetOpener>,
    chat: ChatFallback,
    narrator: Narrator,
    assistant_name: String,
}

impl IntentRouter {
    pub fn new(
        media: Arc<dyn MediaResolver>,
        opener: Arc<dyn TargetOpener>,
        chat: ChatFallback,
        narrator: Narrator,
    ) -> Self {
        Self {
            media,
            opener,
            chat,
            narrator,
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
        }
    }

    pub fn with_assistant_name(mut self, name: impl Into<String>) -> Self {
        self.assistant_name = name.into();
        self
    }

    pub fn chat(&self) -> &ChatFallback {
        &self.chat
    }

    /// Answer one utterance for `session`.
    pub async fn route(&self, raw: &str, session: &SessionId) -> ReplyPayload {
        let ui = normalize(raw);
        let intent = classify(raw, &ui);
        debug!(session = %session, intent = intent.name(), "Routing utterance");

        let payload = match &intent {
            Intent::Play(query) => self.play(query, session).await,
            Intent::Open(target) => self.open(target),
            Intent::Greeting => ReplyPayload::text(GREETING_REPLY),
            Intent::Identity => self.identity(),
            Intent::Chat => ReplyPayload::text(self.chat.chat(session, raw).await),
        };

        TurnEventLogger::log_event(
            session.as_str(),
            TurnEvent::Routed {
                intent: intent.name().to_string(),
                reply: payload.reply.clone(),
            },
        );
        payload
    }

    async fn play(&self, query: &str, session: &SessionId) -> ReplyPayload {
        match self.media.resolve(query).await {
            Ok(media) => {
                info!(title = %media.title, id = %media.id, "Resolved media");
                self.narrator.narrate(media.title.clone());
                ReplyPayload::with_music(format!("🎵 {}", media.title), media.url)
            }
            Err(e) => {
                let error_msg = redact_sensitive_data(&e.to_string());
                if matches!(e, PrinixError::MediaNotFound(_)) {
                    info!(query = %query, "No media found");
                } else {
                    warn!(query = %query, error = %error_msg, "Media lookup failed");
                }
                TurnEventLogger::log_event(
                    session.as_str(),
                    TurnEvent::BackendError {
                        backend: self.media.name().to_string(),
                        error_msg,
                    },
                );
                ReplyPayload::text(SONG_NOT_FOUND_REPLY)
            }
        }
    }

    fn open(&self, target: &str) -> ReplyPayload {
        let payload = self.opener.open(target);
        self.narrator.narrate(payload.reply.clone());
        payload
    }

    fn identity(&self) -> ReplyPayload {
        ReplyPayload::text(format!("🤖 I am {}, your AI assistant.", self.assistant_name))
    }
}
