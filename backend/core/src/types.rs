use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque per-client token keying conversation continuity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized result of a media search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    pub title: String,
    pub url: String,
    pub id: String,
}

/// Uniform output of every intent handler.
///
/// `music_url` and `redirect` are only ever set by the play and open paths
/// respectively, so at most one of them is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyPayload {
    pub reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl ReplyPayload {
    pub fn text(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            music_url: None,
            redirect: None,
        }
    }

    pub fn with_music(reply: impl Into<String>, music_url: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            music_url: Some(music_url.into()),
            redirect: None,
        }
    }

    pub fn with_redirect(reply: impl Into<String>, redirect: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            music_url: None,
            redirect: Some(redirect.into()),
        }
    }
}
