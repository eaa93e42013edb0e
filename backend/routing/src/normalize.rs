//! Input normalization for intent matching.
//!
//! The normalized text is only used for matching; handlers still receive the
//! raw text.

const TRAILING_PUNCTUATION: [char; 6] = ['.', ',', '!', '?', ';', ':'];

/// Trim, lowercase, and strip trailing punctuation.
///
/// Whitespace interleaved with the trailing punctuation run is stripped too,
/// so `normalize(normalize(s)) == normalize(s)` for every input.
pub fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .trim_end_matches(|c: char| TRAILING_PUNCTUATION.contains(&c) || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        assert_eq!(normalize("  Hello There!! "), "hello there");
        assert_eq!(normalize("Who are you?"), "who are you");
        assert_eq!(normalize("play Song."), "play song");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("?!.,;:"), "");
    }

    #[test]
    fn test_inner_punctuation_kept() {
        assert_eq!(normalize("open example.com"), "open example.com");
        assert_eq!(normalize("wait, what?"), "wait, what");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "   ",
            "Hello!",
            "hi ! .",
            "What?? ...  ",
            "  PLAY Bohemian Rhapsody ;",
            "open ~/Music:",
            "ÉCOLE. ",
            "tab\tseparated\t!",
            "emoji 🎵 !",
            "line\nbreak?\n",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }
}
