/// Speaker trait and the local command-line speech engine.
use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::info;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Renders text as audible speech on the host.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Command speaker
// ---------------------------------------------------------------------------

/// How the text reaches the speech program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInput {
    /// Appended as the last argument, after `--` so a leading `-` in the
    /// text is never read as an option.
    Arg,
    /// Written to stdin.
    Stdin,
}

/// Speaks through a platform TTS program (`say`, `espeak`, PowerShell).
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    program: PathBuf,
    args: Vec<String>,
    input: TextInput,
}

const WINDOWS_SPEECH_SCRIPT: &str = "Add-Type -AssemblyName System.Speech; \
     $s = New-Object System.Speech.Synthesis.SpeechSynthesizer; \
     $s.Speak([Console]::In.ReadToEnd())";

impl CommandSpeaker {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>, input: TextInput) -> Self {
        Self {
            program: program.into(),
            args,
            input,
        }
    }

    /// Find a speech program for this platform, if one is installed.
    pub fn detect() -> Option<Self> {
        match std::env::consts::OS {
            "macos" => which::which("say")
                .ok()
                .map(|p| Self::new(p, vec![], TextInput::Arg)),
            "windows" => which::which("powershell").ok().map(|p| {
                Self::new(
                    p,
                    vec![
                        "-NoProfile".into(),
                        "-Command".into(),
                        WINDOWS_SPEECH_SCRIPT.into(),
                    ],
                    TextInput::Stdin,
                )
            }),
            _ => ["espeak-ng", "espeak", "spd-say"]
                .iter()
                .find_map(|name| which::which(name).ok())
                .map(|p| Self::new(p, vec![], TextInput::Arg)),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, text: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        match self.input {
            TextInput::Arg => {
                cmd.arg("--").arg(text).stdin(Stdio::null());
            }
            TextInput::Stdin => {
                cmd.stdin(Stdio::piped());
            }
        }
        cmd
    }
}

#[async_trait]
impl Speaker for CommandSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let mut cmd = self.command(text);
        info!("[TTS/Command] Speaking {} chars via {}", text.len(), self.program.display());
        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to start {}", self.program.display()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            drop(stdin);
        }

        let status = child.wait().await?;
        if !status.success() {
            bail!("{} exited with {}", self.program.display(), status);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blank_text_is_a_no_op() {
        let speaker = CommandSpeaker::new("/nonexistent/speaker", vec![], TextInput::Arg);
        assert!(speaker.speak("   ").await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_program_errors() {
        let speaker = CommandSpeaker::new("/nonexistent/speaker", vec![], TextInput::Arg);
        let err = speaker.speak("hello").await.unwrap_err();
        assert!(err.to_string().contains("failed to start"));
    }

    #[test]
    fn test_text_follows_end_of_options() {
        let speaker = CommandSpeaker::new("espeak", vec!["-s".into(), "150".into()], TextInput::Arg);
        let cmd = speaker.command("-Despacito");
        let args: Vec<_> = cmd.as_std().get_args().collect();
        assert_eq!(args, ["-s", "150", "--", "-Despacito"]);

        let speaker = CommandSpeaker::new("powershell", vec![], TextInput::Stdin);
        assert_eq!(speaker.command("-Despacito").as_std().get_args().count(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dash_text_reaches_program_as_operand() {
        let script = r#"test "$1" = "--" && test "$2" = "-rf song""#;
        let speaker = CommandSpeaker::new(
            "sh",
            vec!["-c".into(), script.into(), "sh".into()],
            TextInput::Arg,
        );
        assert!(speaker.speak("-rf song").await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdin_delivery() {
        // `cat` drains stdin and exits 0.
        let speaker = CommandSpeaker::new("cat", vec![], TextInput::Stdin);
        assert!(speaker.speak("hello").await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_program_reports_status() {
        let speaker = CommandSpeaker::new("false", vec![], TextInput::Arg);
        assert!(speaker.speak("hello").await.is_err());
    }
}
