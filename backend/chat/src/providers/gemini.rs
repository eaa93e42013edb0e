use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use prinix_core::{ChatBackend, ChatSession, PrinixError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Google Gemini chat backend (`generateContent` REST API).
pub struct GeminiBackend {
    inner: Arc<GeminiInner>,
}

#[derive(Clone)]
struct GeminiInner {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(GeminiInner {
                client: Client::new(),
                api_key: api_key.into(),
                model: DEFAULT_MODEL.to_string(),
                base_url: DEFAULT_BASE_URL.to_string(),
            }),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.inner).model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.inner).base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.inner.model
    }
}

impl ChatBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    fn start_chat(&self) -> Box<dyn ChatSession> {
        Box::new(GeminiChat {
            inner: Arc::clone(&self.inner),
            history: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl Content {
    fn text(role: &str, text: &str) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: &'a [Content],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<serde_json::Value>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u64>,
}

/// One conversation; the turn history lives here and is resent every call.
pub struct GeminiChat {
    inner: Arc<GeminiInner>,
    history: Vec<Content>,
}

impl GeminiChat {
    pub fn turns(&self) -> usize {
        self.history.len()
    }

    fn error(message: impl Into<String>) -> PrinixError {
        PrinixError::chat("gemini", message)
    }
}

#[async_trait]
impl ChatSession for GeminiChat {
    async fn send_message(&mut self, message: &str) -> Result<String, PrinixError> {
        let start = Instant::now();
        let inner = &self.inner;

        let mut contents = self.history.clone();
        contents.push(Content::text("user", message));

        debug!(model = %inner.model, turns = contents.len(), "Sending request to Gemini");

        let response = inner
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                inner.base_url, inner.model
            ))
            .header("x-goog-api-key", &inner.api_key)
            .json(&GenerateRequest {
                contents: &contents,
            })
            .send()
            .await
            .map_err(|e| Self::error(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::error(format!("returned {status}: {error_body}")));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Self::error(format!("failed to parse response: {e}")))?;

        let Some(candidate) = body.candidates.into_iter().next() else {
            let feedback = body
                .prompt_feedback
                .map(|f| f.to_string())
                .unwrap_or_default();
            return Err(Self::error(format!("no candidates returned {feedback}")));
        };

        // A SAFETY or RECITATION stop comes back without any parts.
        let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
        if parts.is_empty() {
            let reason = candidate.finish_reason.as_deref().unwrap_or("UNKNOWN");
            return Err(Self::error(format!("response has no text (finish reason {reason})")));
        }

        let text: String = parts.iter().map(|p| p.text.as_str()).collect();

        debug!(
            tokens = body.usage_metadata.and_then(|u| u.total_token_count).unwrap_or(0),
            latency_ms = start.elapsed().as_millis() as u64,
            "Gemini responded"
        );

        // The API rejects empty text parts, so an empty turn is never replayed.
        if !text.trim().is_empty() {
            contents.push(Content::text("model", &text));
            self.history = contents;
        }
        Ok(text)
    }
}
