use thiserror::Error;

/// Top-level error type for the PRINIX assistant.
#[derive(Debug, Error)]
pub enum PrinixError {
    #[error("no media found for query: {0}")]
    MediaNotFound(String),

    #[error("media backend error: {0}")]
    MediaBackend(String),

    #[error("chat backend error ({provider}): {message}")]
    ChatBackend { provider: String, message: String },

    #[error("chat backend not configured")]
    ChatUnconfigured,

    #[error("could not open {target}: {message}")]
    OpenFailed { target: String, message: String },

    #[error("not supported here: {0}")]
    Unsupported(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl PrinixError {
    pub fn chat(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ChatBackend {
            provider: provider.into(),
            message: message.into(),
        }
    }
}
