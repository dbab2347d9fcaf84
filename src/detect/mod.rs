//! Detection of content-quality issues in quiz text.

mod bad_terms;
mod leakage;
mod runner;
mod template;
mod truncation;
mod types;

pub use bad_terms::detect_bad_terms;
pub use leakage::detect_foreign_leakage;
pub use runner::{
    AuditOptions, AuditSession, Auditor, CancelToken, LocaleSelector, RunState, TextMode,
    DEFAULT_LIMIT, MAX_LIMIT, PREVIEW_CHARS,
};
pub use template::detect_template_leakage;
pub use truncation::{
    detect_truncation, has_mid_word_cut, has_unterminated_tail, is_stub, MIN_SENSIBLE_LENGTH,
    TERMINAL_PUNCTUATION,
};
pub use types::{AuditResult, Issue, IssueKind, SNIPPET_MAX_CHARS};

pub(crate) use types::preview;

use crate::rules::RuleRegistry;

/// Run every detector over one text.
///
/// Issues come out grouped by detector: bad terms, foreign leakage,
/// template leakage, truncation.
pub fn audit_text(text: &str, locale: &str, registry: &RuleRegistry) -> Vec<Issue> {
    let mut issues = detect_bad_terms(text, locale, registry);
    issues.extend(detect_foreign_leakage(text, locale, registry));
    issues.extend(detect_template_leakage(text, registry));
    issues.extend(detect_truncation(text));
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> RuleRegistry {
        RuleRegistry::builtin().unwrap()
    }

    #[test]
    fn test_hungarian_single_letter_scenario() {
        let issues = audit_text("Ez egy teszt a", "hu", &registry());
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.kind == IssueKind::Truncation));
    }

    #[test]
    fn test_polish_feedback_loop_scenario() {
        let text = "Zbuduj w zespole feedback loop, który wspiera rozwój.";
        let issues = audit_text(text, "pl", &registry());

        let bad: Vec<_> = issues
            .iter()
            .filter(|i| i.kind == IssueKind::BadTerm)
            .collect();
        let mixed: Vec<_> = issues
            .iter()
            .filter(|i| i.kind == IssueKind::MixedLanguage)
            .collect();

        assert_eq!(bad.len(), 1);
        assert!(bad[0].detail.contains("pętla informacji zwrotnej"));
        assert_eq!(mixed.len(), 1);
        assert_eq!(mixed[0].snippet.as_deref(), Some("feedback"));
        assert!(issues.len() >= 2);
    }

    #[test]
    fn test_bad_term_is_locale_isolated() {
        let registry = registry();
        let text = "To napewno jest dobra odpowiedź.";
        let pl = audit_text(text, "pl", &registry);
        let hu = audit_text(text, "hu", &registry);
        assert_eq!(
            pl.iter().filter(|i| i.kind == IssueKind::BadTerm).count(),
            1
        );
        assert_eq!(
            hu.iter().filter(|i| i.kind == IssueKind::BadTerm).count(),
            0
        );
    }

    #[test]
    fn test_two_leaked_terms_yield_one_issue() {
        let text = "Ustal deadline i zbierz insights od zespołu.";
        let issues = audit_text(text, "pl", &registry());
        assert_eq!(
            issues
                .iter()
                .filter(|i| i.kind == IssueKind::MixedLanguage)
                .count(),
            1
        );
    }

    #[test]
    fn test_detector_order() {
        let text = "Użyj {{name}} jako feedback loop a";
        let kinds: Vec<_> = audit_text(text, "pl", &registry())
            .into_iter()
            .map(|i| i.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::BadTerm,
                IssueKind::MixedLanguage,
                IssueKind::TemplateLeakage,
                IssueKind::Truncation,
                IssueKind::Truncation,
            ]
        );
    }

    #[test]
    fn test_every_detail_is_non_empty() {
        let registry = registry();
        for text in [
            "x",
            "TODO ${a} {{b}} [...]",
            "Zbuduj feedback loop a ",
            "Das macht Sinn in 2024 ",
        ] {
            for locale in ["pl", "de", "xx", "en", "unknown"] {
                for issue in audit_text(text, locale, &registry) {
                    assert!(!issue.detail.trim().is_empty());
                }
            }
        }
    }
}
