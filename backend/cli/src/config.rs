use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};

use prinix_chat::providers::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use prinix_gateway::Deployment;
use prinix_routing::DEFAULT_ASSISTANT_NAME;

/// PRINIX runtime configuration.
#[derive(Clone)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Gemini API key; chat degrades to a placeholder reply without it
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// Cookie signing secret (at least 64 bytes)
    pub session_secret: Option<String>,
    pub deployment: Deployment,
    pub static_dir: PathBuf,
    pub template_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// Speak song titles and open results on the server
    pub speech: bool,
    /// Explicit yt-dlp path; PATH lookup otherwise
    pub ytdlp_path: Option<PathBuf>,
    pub assistant_name: String,
    /// Conversation cap, 0 for unbounded
    pub max_conversations: usize,
    pub open_browser: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 5000,
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            session_secret: None,
            deployment: Deployment::Desktop,
            static_dir: PathBuf::from("static"),
            template_dir: PathBuf::from("templates"),
            log_dir: PathBuf::from("logs"),
            log_level: "info".to_string(),
            speech: true,
            ytdlp_path: None,
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
            max_conversations: 0,
            open_browser: true,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("port", &self.port)
            .field("gemini_api_key", &redacted(&self.gemini_api_key))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("session_secret", &redacted(&self.session_secret))
            .field("deployment", &self.deployment)
            .field("static_dir", &self.static_dir)
            .field("template_dir", &self.template_dir)
            .field("log_dir", &self.log_dir)
            .field("log_level", &self.log_level)
            .field("speech", &self.speech)
            .field("ytdlp_path", &self.ytdlp_path)
            .field("assistant_name", &self.assistant_name)
            .field("max_conversations", &self.max_conversations)
            .field("open_browser", &self.open_browser)
            .finish()
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{name}: expected a boolean, got '{other}'"),
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        // Empty values count as unset.
        let var = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let port = match var("PRINIX_PORT") {
            Some(p) => p
                .trim()
                .parse()
                .with_context(|| format!("PRINIX_PORT: invalid port '{p}'"))?,
            None => defaults.port,
        };
        let deployment = match var("PRINIX_DEPLOYMENT") {
            Some(d) => d.parse()?,
            None => defaults.deployment,
        };
        let max_conversations = match var("PRINIX_MAX_CONVERSATIONS") {
            Some(n) => n
                .trim()
                .parse()
                .with_context(|| format!("PRINIX_MAX_CONVERSATIONS: invalid count '{n}'"))?,
            None => defaults.max_conversations,
        };
        let speech = match var("PRINIX_SPEECH") {
            Some(v) => parse_bool("PRINIX_SPEECH", &v)?,
            None => defaults.speech,
        };
        let open_browser = match var("PRINIX_OPEN_BROWSER") {
            Some(v) => parse_bool("PRINIX_OPEN_BROWSER", &v)?,
            None => defaults.open_browser,
        };

        Ok(Self {
            bind_address: var("PRINIX_BIND").unwrap_or(defaults.bind_address),
            port,
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: var("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            session_secret: var("PRINIX_SESSION_SECRET"),
            deployment,
            static_dir: var("PRINIX_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            template_dir: var("PRINIX_TEMPLATE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.template_dir),
            log_dir: var("PRINIX_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_level: var("RUST_LOG").unwrap_or(defaults.log_level),
            speech,
            ytdlp_path: var("PRINIX_YTDLP").map(PathBuf::from),
            assistant_name: var("PRINIX_ASSISTANT_NAME").unwrap_or(defaults.assistant_name),
            max_conversations,
            open_browser,
        })
    }

    /// Desktop-only features are off on serverless regardless of flags.
    pub fn speech_enabled(&self) -> bool {
        self.deployment == Deployment::Desktop && self.speech
    }

    pub fn browser_enabled(&self) -> bool {
        self.deployment == Deployment::Desktop && self.open_browser
    }

    /// URL a local browser should use to reach the server.
    pub fn local_url(&self) -> String {
        let host = match self.bind_address.as_str() {
            "0.0.0.0" | "::" | "[::]" => "127.0.0.1",
            other => other,
        };
        format!("http://{}:{}", host, self.port)
    }
}
