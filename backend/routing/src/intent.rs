//! Intent classification by ordered literal matching; the first match wins.
const GREETING_WORDS: [&str; 3] = ["hi", "hello", "hey"];
const COMMAND_PREFIX_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// `play <query>`
    Play(String),
    /// `open <target>`
    Open(String),
    Greeting,
    Identity,
    /// Anything else goes to the chat backend.
    Chat,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Play(_) => "play",
            Self::Open(_) => "open",
            Self::Greeting => "greeting",
            Self::Identity => "identity",
            Self::Chat => "chat",
        }
    }
}

/// Everything after the first five characters of the raw text.
///
/// The cut is positional, so irregular spacing around the command word
/// leaks into the argument.
fn command_argument(raw: &str) -> String {
    raw.chars().skip(COMMAND_PREFIX_LEN).collect()
}

/// Classify `raw`, given its normalized form `ui`.
///
/// Substring checks are literal: "this" counts as a greeting because it
/// contains "hi".
pub fn classify(raw: &str, ui: &str) -> Intent {
    if ui.starts_with("play ") {
        return Intent::Play(command_argument(raw));
    }
    if ui.starts_with("open ") {
        return Intent::Open(command_argument(raw).trim().to_string());
    }
    if GREETING_WORDS.iter().any(|w| ui.contains(w)) {
        return Intent::Greeting;
    }
    if ui.contains("who are you") {
        return Intent::Identity;
    }
    Intent::Chat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    fn classify_raw(raw: &str) -> Intent {
        classify(raw, &normalize(raw))
    }

    #[test]
    fn test_play_keeps_raw_case() {
        assert_eq!(
            classify_raw("Play Bohemian Rhapsody!"),
            Intent::Play("Bohemian Rhapsody!".into())
        );
    }

    #[test]
    fn test_open_is_trimmed() {
        assert_eq!(classify_raw("open  Notepad "), Intent::Open("Notepad".into()));
    }

    #[test]
    fn test_fixed_cut_with_leading_space() {
        // The normalized text matches, the raw cut is off by the indent.
        assert_eq!(classify_raw("  play song"), Intent::Play("y song".into()));
    }

    #[test]
    fn test_multibyte_cut_does_not_panic() {
        assert_eq!(classify_raw("play 🎵🎶"), Intent::Play("🎵🎶".into()));
    }

    #[test]
    fn test_play_wins_over_greeting() {
        assert_eq!(classify_raw("play hello"), Intent::Play("hello".into()));
    }

    #[test]
    fn test_greeting_is_substring_match() {
        assert_eq!(classify_raw("Hello there"), Intent::Greeting);
        assert_eq!(classify_raw("I want to hire someone"), Intent::Greeting);
        assert_eq!(classify_raw("hey"), Intent::Greeting);
    }

    #[test]
    fn test_identity() {
        assert_eq!(classify_raw("Who are you?"), Intent::Identity);
    }

    #[test]
    fn test_everything_else_is_chat() {
        assert_eq!(classify_raw("what is the capital of peru"), Intent::Chat);
        assert_eq!(classify_raw("play"), Intent::Chat);
        assert_eq!(classify_raw(""), Intent::Chat);
    }
}
