/// Target resolution: filesystem path, then application alias, then website.
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use prinix_core::{PrinixError, ReplyPayload, TargetOpener};

use crate::aliases::find_alias;
use crate::platform::PlatformOpener;

static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[a-z]{2,}$").expect("valid regex"));

pub const UNSUPPORTED_REPLY: &str = "⚠️ Opening apps or files is not supported on this deployment.";

/// Text shown after "Could not open <x>: " for a platform failure.
fn failure_reason(e: &PrinixError) -> String {
    match e {
        PrinixError::OpenFailed { message, .. } => message.clone(),
        PrinixError::Unsupported(what) => what.clone(),
        other => other.to_string(),
    }
}

/// Opener for a machine with a desktop session.
pub struct DesktopOpener {
    platform: Box<dyn PlatformOpener>,
    cwd: Option<PathBuf>,
    home: Option<PathBuf>,
}

impl DesktopOpener {
    pub fn new(platform: Box<dyn PlatformOpener>) -> Self {
        Self {
            platform,
            cwd: None,
            home: None,
        }
    }

    /// Pin the working and home directories instead of reading them per call.
    pub fn with_base_dirs(mut self, cwd: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self.home = Some(home.into());
        self
    }

    fn cwd(&self) -> Option<PathBuf> {
        self.cwd.clone().or_else(|| std::env::current_dir().ok())
    }

    fn home(&self) -> Option<PathBuf> {
        self.home.clone().or_else(dirs::home_dir)
    }

    fn expand_tilde(&self, path: &str) -> PathBuf {
        if path == "~" {
            if let Some(home) = self.home() {
                return home;
            }
        }
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = self.home() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// As given, under the working directory, tilde-expanded, under home.
    fn candidate_paths(&self, target: &str) -> Vec<PathBuf> {
        let mut candidates = vec![PathBuf::from(target)];
        if let Some(cwd) = self.cwd() {
            candidates.push(cwd.join(target));
        }
        candidates.push(self.expand_tilde(target));
        if let Some(home) = self.home() {
            candidates.push(home.join(target));
        }
        candidates
    }

    fn open_existing(&self, path: &Path) -> ReplyPayload {
        let shown = path.display().to_string();
        match self.platform.open_path(path) {
            Ok(()) => {
                let kind = if path.is_dir() { "folder" } else { "file" };
                info!(path = %shown, kind, "Opened path");
                ReplyPayload::with_redirect(format!("📁 Opening {kind}: {shown}"), shown)
            }
            Err(e) => {
                warn!(path = %shown, error = %e, "Failed to open path");
                ReplyPayload::text(format!("⚠️ Could not open {shown}: {}", failure_reason(&e)))
            }
        }
    }

    fn open_alias(&self, target_lower: &str) -> Option<ReplyPayload> {
        let alias = find_alias(self.platform.aliases(), target_lower)?;
        let launched = if Path::new(alias.program).exists() {
            self.platform.launch(alias.program)
        } else {
            let by_name = Path::new(alias.program)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(alias.program);
            self.platform.launch(by_name)
        };
        Some(match launched {
            Ok(()) => {
                info!(alias = alias.key, program = alias.program, "Launched application");
                ReplyPayload::with_redirect(
                    format!("✅ Opening {}...", alias.display_name()),
                    alias.program,
                )
            }
            Err(e) => {
                warn!(alias = alias.key, error = %e, "Failed to launch application");
                ReplyPayload::text(format!("⚠️ Failed to open {}: {}", alias.key, failure_reason(&e)))
            }
        })
    }

    fn open_website(&self, target_lower: &str) -> Option<ReplyPayload> {
        if !DOMAIN_RE.is_match(target_lower) {
            return None;
        }
        let url = if target_lower.starts_with("http://") || target_lower.starts_with("https://") {
            target_lower.to_string()
        } else {
            format!("https://{target_lower}")
        };
        // The client follows `redirect` itself, so a missing local browser is not fatal.
        if let Err(e) = self.platform.open_url(&url) {
            warn!(url = %url, error = %e, "Failed to open browser");
        }
        Some(ReplyPayload::with_redirect(format!("🌐 Opening website: {url}"), url))
    }
}

impl TargetOpener for DesktopOpener {
    fn open(&self, target: &str) -> ReplyPayload {
        let target = target.trim().trim_matches('"').trim_matches('\'');
        if target.trim().is_empty() {
            return ReplyPayload::text("❌ No target provided.");
        }
        let target_lower = target.to_lowercase();

        if let Some(path) = self.candidate_paths(target).into_iter().find(|p| p.exists()) {
            return self.open_existing(&path);
        }

        if let Some(reply) = self.open_alias(&target_lower) {
            return reply;
        }

        if let Some(reply) = self.open_website(&target_lower) {
            return reply;
        }

        info!(target = %target, platform = self.platform.name(), "Nothing matched open target");
        ReplyPayload::text(format!("❌ Unable to open {target}."))
    }
}

/// Opener for deployments without a desktop (serverless hosts).
pub struct UnsupportedOpener;

impl TargetOpener for UnsupportedOpener {
    fn open(&self, _target: &str) -> ReplyPayload {
        ReplyPayload::text(UNSUPPORTED_REPLY)
    }
}
