//! yt-dlp backed resolver.
//!
//! Runs `yt-dlp -J` restricted to the single best audio search hit and reads
//! the info JSON it prints. Downloads nothing.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

use prinix_core::{MediaDescriptor, MediaResolver, PrinixError};

const DEFAULT_BINARY: &str = "yt-dlp";

pub struct YtDlpResolver {
    binary: Option<PathBuf>,
}

impl YtDlpResolver {
    /// Use an explicit binary path, or search PATH for `yt-dlp` when `None`.
    pub fn new(binary: Option<PathBuf>) -> Self {
        let binary = binary.or_else(|| which::which(DEFAULT_BINARY).ok());
        if binary.is_none() {
            warn!("yt-dlp not found on PATH; play requests will fail");
        }
        Self { binary }
    }

    fn command(binary: &Path, query: &str) -> Command {
        let mut cmd = Command::new(binary);
        cmd.arg("-J")
            .arg("--no-playlist")
            .arg("--no-warnings")
            .args(["-f", "bestaudio/best"])
            .args(["--default-search", "ytsearch1"])
            .arg("--")
            .arg(query)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl MediaResolver for YtDlpResolver {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn resolve(&self, query: &str) -> Result<MediaDescriptor, PrinixError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PrinixError::MediaNotFound(String::new()));
        }
        let binary = self
            .binary
            .as_deref()
            .ok_or_else(|| PrinixError::MediaBackend("yt-dlp binary not available".into()))?;

        debug!(query = %query, "Resolving media with yt-dlp");
        let output = Self::command(binary, query)
            .output()
            .await
            .map_err(|e| PrinixError::MediaBackend(format!("failed to run yt-dlp: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PrinixError::MediaBackend(format!(
                "yt-dlp exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        parse_info(query, &output.stdout)
    }
}

#[derive(Debug, Deserialize)]
struct InfoJson {
    title: Option<String>,
    url: Option<String>,
    id: Option<String>,
    entries: Option<Vec<InfoJson>>,
}

/// Pick the first entry of a search listing, or the object itself for a
/// direct hit, and require both a title and a playable URL.
fn parse_info(query: &str, raw: &[u8]) -> Result<MediaDescriptor, PrinixError> {
    let info: InfoJson = serde_json::from_slice(raw)
        .map_err(|e| PrinixError::MediaBackend(format!("malformed yt-dlp output: {e}")))?;

    let info = match info.entries {
        Some(entries) => entries
            .into_iter()
            .next()
            .ok_or_else(|| PrinixError::MediaNotFound(query.to_string()))?,
        None => info,
    };

    match (info.title, info.url) {
        (Some(title), Some(url)) => Ok(MediaDescriptor {
            title,
            url,
            id: info.id.unwrap_or_default(),
        }),
        _ => Err(PrinixError::MediaNotFound(query.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_listing_takes_first_entry() {
        let raw = br#"{
            "_type": "playlist",
            "id": "some song",
            "title": "some song",
            "entries": [
                {"id": "abc123", "title": "Some Song (Official Audio)", "url": "https://rr1.example/audio?id=abc123"},
                {"id": "zzz", "title": "Other", "url": "https://rr1.example/other"}
            ]
        }"#;
        let media = parse_info("some song", raw).unwrap();
        assert_eq!(media.id, "abc123");
        assert_eq!(media.title, "Some Song (Official Audio)");
        assert_eq!(media.url, "https://rr1.example/audio?id=abc123");
    }

    #[test]
    fn test_parse_direct_hit() {
        let raw = br#"{"id": "v1", "title": "Direct", "url": "https://cdn.example/v1.m4a"}"#;
        let media = parse_info("https://youtu.be/v1", raw).unwrap();
        assert_eq!(media.title, "Direct");
    }

    #[test]
    fn test_parse_empty_listing_is_not_found() {
        let raw = br#"{"_type": "playlist", "entries": []}"#;
        let err = parse_info("nothing", raw).unwrap_err();
        assert!(matches!(err, PrinixError::MediaNotFound(_)));
    }

    #[test]
    fn test_parse_missing_url_is_not_found() {
        let raw = br#"{"id": "v1", "title": "No formats"}"#;
        assert!(matches!(
            parse_info("q", raw),
            Err(PrinixError::MediaNotFound(_))
        ));
    }

    #[test]
    fn test_parse_garbage_is_backend_error() {
        assert!(matches!(
            parse_info("q", b"ERROR: something"),
            Err(PrinixError::MediaBackend(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_binary_fails_without_spawning() {
        let resolver = YtDlpResolver { binary: None };
        let err = resolver.resolve("some song").await.unwrap_err();
        assert!(matches!(err, PrinixError::MediaBackend(_)));
    }

    #[tokio::test]
    async fn test_blank_query_is_not_found() {
        let resolver = YtDlpResolver { binary: None };
        let err = resolver.resolve("   ").await.unwrap_err();
        assert!(matches!(err, PrinixError::MediaNotFound(_)));
    }
}
