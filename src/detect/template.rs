//! Detection of unresolved template syntax and internal markers.
//!
//! Every marker class that matches is reported, once per class: a leftover
//! `{{name}}` and a leftover `TODO` are two different fixes.

use crate::rules::RuleRegistry;

use super::{Issue, IssueKind};

/// Report each template-marker class found in `text`.
pub fn detect_template_leakage(text: &str, registry: &RuleRegistry) -> Vec<Issue> {
    registry
        .template_markers()
        .iter()
        .filter_map(|rule| {
            rule.find(text).map(|found| {
                Issue::new(IssueKind::TemplateLeakage, rule.label()).with_snippet(found)
            })
        })
        .collect()
}
