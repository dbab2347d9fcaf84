//! Detection of foreign (source-language) terms in localized text.
//!
//! Only the first leaked term is reported. One flag is enough for a
//! reviewer to open the record; listing every term adds noise, not
//! information. Callers must not treat the result as an exhaustive list.

use crate::rules::RuleRegistry;

use super::{Issue, IssueKind};

/// Report the first leakage term found in `text`, if the locale is checked.
///
/// Returns nothing for the source locale and for the unknown-locale marker.
pub fn detect_foreign_leakage(text: &str, locale: &str, registry: &RuleRegistry) -> Option<Issue> {
    if !registry.checks_leakage(locale) {
        return None;
    }

    registry.leakage_terms().iter().find_map(|rule| {
        rule.find(text)
            .map(|found| Issue::new(IssueKind::MixedLanguage, rule.label()).with_snippet(found))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::UNKNOWN_LOCALE;

    fn registry() -> RuleRegistry {
        RuleRegistry::builtin().unwrap()
    }

    #[test]
    fn test_reports_leaked_term() {
        let issue = detect_foreign_leakage("Poproś zespół o feedback.", "pl", &registry()).unwrap();
        assert_eq!(issue.kind, IssueKind::MixedLanguage);
        assert_eq!(issue.snippet.as_deref(), Some("feedback"));
        assert!(issue.detail.contains("feedback"));
    }

    #[test]
    fn test_stops_at_first_match() {
        let registry = registry();
        let text = "Zmień mindset i pilnuj, żeby deadline był realny.";
        let issue = detect_foreign_leakage(text, "pl", &registry).unwrap();
        assert_eq!(issue.snippet.as_deref(), Some("mindset"));
    }

    #[test]
    fn test_table_order_wins_over_text_order() {
        // "deadline" appears first in the text, "feedback" first in the table
        let text = "Deadline jest jutro, a feedback potem.";
        let issue = detect_foreign_leakage(text, "pl", &registry()).unwrap();
        assert_eq!(issue.snippet.as_deref(), Some("feedback"));
    }

    #[test]
    fn test_skips_source_and_unknown_locales() {
        let registry = registry();
        let text = "Give feedback before the deadline.";
        assert!(detect_foreign_leakage(text, "en", &registry).is_none());
        assert!(detect_foreign_leakage(text, UNKNOWN_LOCALE, &registry).is_none());
    }

    #[test]
    fn test_clean_text() {
        assert!(detect_foreign_leakage("Wszystko w porządku.", "pl", &registry()).is_none());
    }
}
