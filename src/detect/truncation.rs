//! Truncation and stub detection.
//!
//! Three independent checks, each reporting its own issue:
//!
//! - **unterminated tail**: the text stops without terminal punctuation and
//!   either trails off in whitespace or ends on a one-letter word
//! - **mid-word cut**: the last word is a single letter, as when a
//!   generator stops inside a word
//! - **stub**: the trimmed text is too short to carry meaning
//!
//! The checks overlap on purpose. Each points at a different repair
//! (extend the text, fix the broken word, replace the fragment), and a
//! false positive costs a reviewer one glance.

use super::types::tail;
use super::{Issue, IssueKind};

/// Characters that end a complete sentence or label.
pub const TERMINAL_PUNCTUATION: &[char] = &['.', '?', '!', ':'];

/// Texts shorter than this (trimmed, in characters) are stubs.
pub const MIN_SENSIBLE_LENGTH: usize = 12;

const TAIL_MIN_LENGTH: usize = 10;
const MID_WORD_MIN_LENGTH: usize = 8;
const TAIL_SNIPPET_CHARS: usize = 40;

/// Run all truncation checks on `text`.
pub fn detect_truncation(text: &str) -> Vec<Issue> {
    let mut issues = Vec::new();

    if has_unterminated_tail(text) {
        issues.push(
            Issue::new(IssueKind::Truncation, "text ends without terminal punctuation")
                .with_snippet(tail(text, TAIL_SNIPPET_CHARS)),
        );
    }

    if has_mid_word_cut(text) {
        issues.push(
            Issue::new(IssueKind::Truncation, "text ends on a single-letter word")
                .with_snippet(tail(text, TAIL_SNIPPET_CHARS)),
        );
    }

    if is_stub(text) {
        // the whole literal text, unclipped; trimmed it is under MIN_SENSIBLE_LENGTH
        let mut stub = Issue::new(IssueKind::Truncation, "stub fragment");
        stub.snippet = Some(text.to_string());
        issues.push(stub);
    }

    issues
}

fn ends_with_terminal(text: &str) -> bool {
    text.ends_with(TERMINAL_PUNCTUATION)
}

fn last_token(text: &str) -> Option<&str> {
    text.split_whitespace().next_back()
}

fn is_single_letter(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
}

/// Unterminated tail: long enough, no terminal punctuation, and either
/// trailing whitespace or a one-letter final word.
pub fn has_unterminated_tail(text: &str) -> bool {
    if text.chars().count() < TAIL_MIN_LENGTH || ends_with_terminal(text) {
        return false;
    }
    let trailing_space = text.ends_with(char::is_whitespace);
    trailing_space || last_token(text).is_some_and(is_single_letter)
}

/// Mid-word cut: the final word is exactly one alphabetic character.
pub fn has_mid_word_cut(text: &str) -> bool {
    if text.chars().count() < MID_WORD_MIN_LENGTH || ends_with_terminal(text) {
        return false;
    }
    last_token(text).is_some_and(is_single_letter)
}

/// Stub: non-empty once trimmed, but shorter than [`MIN_SENSIBLE_LENGTH`].
pub fn is_stub(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed.chars().count() < MIN_SENSIBLE_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_letter_ending_trips_tail_and_mid_word() {
        let issues = detect_truncation("Ez egy teszt a");
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.kind == IssueKind::Truncation));
        assert_eq!(issues[0].detail, "text ends without terminal punctuation");
        assert_eq!(issues[1].detail, "text ends on a single-letter word");
    }

    #[test]
    fn test_trailing_whitespace_trips_tail_only() {
        let text = "Zespół powinien regularnie ";
        assert!(has_unterminated_tail(text));
        assert!(!has_mid_word_cut(text));
        assert_eq!(detect_truncation(text).len(), 1);
    }

    #[test]
    fn test_terminal_punctuation_disables_tail_checks() {
        for text in [
            "Ez egy teszt a.",
            "Czy to jest a?",
            "Uwaga na to a!",
            "Wybierz opcję a:",
        ] {
            assert!(!has_unterminated_tail(text), "{}", text);
            assert!(!has_mid_word_cut(text), "{}", text);
        }
    }

    #[test]
    fn test_mid_word_needs_alphabetic_letter() {
        assert!(has_mid_word_cut("Wybierz w"));
        assert!(has_mid_word_cut("Válaszd á"));
        assert!(!has_mid_word_cut("Wybierz 5"));
        assert!(!has_mid_word_cut("Wybierz ab"));
    }

    #[test]
    fn test_length_thresholds() {
        // 7 chars: below the mid-word threshold
        assert!(!has_mid_word_cut("abcde f"));
        // 8 chars: mid-word fires, tail needs 10
        assert!(has_mid_word_cut("abcdef g"));
        assert!(!has_unterminated_tail("abcdef g"));
        assert!(has_unterminated_tail("abcdefgh i"));
    }

    #[test]
    fn test_stub_snippet_is_literal_text() {
        let issues = detect_truncation("Tak.");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].detail, "stub fragment");
        assert_eq!(issues[0].snippet.as_deref(), Some("Tak."));
    }

    #[test]
    fn test_stub_boundaries() {
        assert!(!is_stub(""));
        assert!(!is_stub("    "));
        assert!(is_stub("  abc  "));
        assert!(is_stub("12345678901"));
        assert!(!is_stub("123456789012"));
        // counts characters, not bytes
        assert!(is_stub("źźźźźźźźźźź"));
    }

    #[test]
    fn test_complete_sentence_is_clean() {
        let text = "Regularna informacja zwrotna buduje zaufanie w zespole.";
        assert!(detect_truncation(text).is_empty());
    }

    #[test]
    fn test_padded_stub_keeps_literal_text() {
        let text = format!("Tak{}", " ".repeat(70));
        let stub = detect_truncation(&text)
            .into_iter()
            .find(|i| i.detail == "stub fragment")
            .unwrap();
        assert_eq!(stub.snippet.as_deref(), Some(text.as_str()));
    }

    #[test]
    fn test_tail_snippet_is_bounded() {
        let text = format!("{} a", "słowo ".repeat(30));
        let issues = detect_truncation(&text);
        assert_eq!(issues.len(), 2);
        let snippet = issues[0].snippet.as_deref().unwrap();
        assert_eq!(snippet.chars().count(), TAIL_SNIPPET_CHARS);
        assert!(snippet.ends_with(" a"));
    }
}
