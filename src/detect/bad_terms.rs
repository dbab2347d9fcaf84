//! Detection of known bad phrasings for a locale.

use crate::rules::RuleRegistry;

use super::{Issue, IssueKind};

/// Report every bad-term rule of `locale` that matches `text`.
///
/// Each matching rule yields one issue labelled with the rule's label and
/// the first matched substring as snippet. Different rules matching the
/// same words are all reported.
pub fn detect_bad_terms(text: &str, locale: &str, registry: &RuleRegistry) -> Vec<Issue> {
    registry
        .rules_for(locale)
        .iter()
        .filter_map(|rule| {
            rule.find(text)
                .map(|found| Issue::new(IssueKind::BadTerm, rule.label()).with_snippet(found))
        })
        .collect()
}
