//! Core types for audit results.

use serde::{Deserialize, Serialize};

/// Maximum length of an issue snippet, in characters.
pub const SNIPPET_MAX_CHARS: usize = 60;

/// Kinds of content defects the detectors can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    #[serde(rename = "bad_term")]
    BadTerm,
    #[serde(rename = "truncation")]
    Truncation,
    #[serde(rename = "mixed_language")]
    MixedLanguage,
    #[serde(rename = "template_leakage")]
    TemplateLeakage,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::BadTerm => "bad_term",
            IssueKind::Truncation => "truncation",
            IssueKind::MixedLanguage => "mixed_language",
            IssueKind::TemplateLeakage => "template_leakage",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bad_term" => Some(IssueKind::BadTerm),
            "truncation" => Some(IssueKind::Truncation),
            "mixed_language" => Some(IssueKind::MixedLanguage),
            "template_leakage" => Some(IssueKind::TemplateLeakage),
            _ => None,
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single detected defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    /// Human-readable label; never empty.
    pub detail: String,
    /// Bounded excerpt for manual review.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl Issue {
    pub fn new(kind: IssueKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            snippet: None,
        }
    }

    /// Attach a snippet, clipped to [`SNIPPET_MAX_CHARS`].
    pub fn with_snippet(mut self, snippet: &str) -> Self {
        self.snippet = Some(clip(snippet, SNIPPET_MAX_CHARS));
        self
    }

    /// Prefix the detail with the secondary text it came from, e.g. `option 2: ...`.
    pub fn for_option(mut self, index: usize) -> Self {
        self.detail = format!("option {}: {}", index, self.detail);
        self
    }
}

/// Issues found in one content record.
///
/// Only built for records with at least one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub id: String,
    pub locale: String,
    /// Preview in sample mode, full text in export mode.
    pub primary_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_texts: Option<Vec<String>>,
    pub issues: Vec<Issue>,
}

impl AuditResult {
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// Count issues of one kind.
    pub fn count_kind(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }
}

/// Keep at most `max` characters of `text`.
pub(crate) fn clip(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Last `max` characters of `text`.
pub(crate) fn tail(text: &str, max: usize) -> &str {
    let count = text.chars().count();
    if count <= max {
        return text;
    }
    match text.char_indices().nth(count - max) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

/// Shorten `text` for sample output, marking the cut with an ellipsis.
pub(crate) fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        format!("{}…", clip(text, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_kind_roundtrip_names() {
        for kind in [
            IssueKind::BadTerm,
            IssueKind::Truncation,
            IssueKind::MixedLanguage,
            IssueKind::TemplateLeakage,
        ] {
            assert_eq!(IssueKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(IssueKind::parse("weasel_word"), None);
    }

    #[test]
    fn test_snippet_is_bounded() {
        let long = "x".repeat(500);
        let issue = Issue::new(IssueKind::BadTerm, "label").with_snippet(&long);
        assert_eq!(issue.snippet.unwrap().chars().count(), SNIPPET_MAX_CHARS);
    }

    #[test]
    fn test_clip_and_tail_respect_char_boundaries() {
        assert_eq!(clip("łódź żółw", 4), "łódź");
        assert_eq!(tail("łódź żółw", 4), "żółw");
        assert_eq!(tail("ab", 10), "ab");
    }

    #[test]
    fn test_preview_marks_cut() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("abcdefghij", 4), "abcd…");
    }

    #[test]
    fn test_for_option_prefixes_detail() {
        let issue = Issue::new(IssueKind::Truncation, "stub fragment").for_option(2);
        assert_eq!(issue.detail, "option 2: stub fragment");
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = AuditResult {
            id: "q1".into(),
            locale: "pl".into(),
            primary_text: "Tekst".into(),
            secondary_texts: None,
            issues: vec![Issue::new(IssueKind::Truncation, "stub fragment")],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["primaryText"], "Tekst");
        assert!(json.get("secondaryTexts").is_none());
        assert_eq!(json["issues"][0]["kind"], "truncation");
        assert!(json["issues"][0].get("snippet").is_none());
    }
}
