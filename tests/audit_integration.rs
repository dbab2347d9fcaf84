//! Integration tests for full audit runs over the fixture corpus.
//!
//! testdata/corpus holds ten published records across four files (plus
//! drafts, an archived record and a hidden scratch file that must be
//! skipped). Six of the published records carry at least one issue.

use std::path::PathBuf;

use contentaudit::corpus::JsonlCorpus;
use contentaudit::detect::{
    AuditOptions, Auditor, CancelToken, IssueKind, LocaleSelector, RunState, TextMode, MAX_LIMIT,
};
use contentaudit::errors::{AuditError, CorpusError};
use contentaudit::report::AuditReport;
use contentaudit::rules::{self, RuleRegistry, RuleSet};
use tempfile::TempDir;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn corpus() -> JsonlCorpus {
    JsonlCorpus::open(testdata_path().join("corpus")).expect("fixture corpus should open")
}

fn builtin() -> RuleRegistry {
    RuleRegistry::builtin().expect("built-in rules should compile")
}

fn course_rules() -> RuleRegistry {
    let rule_set = RuleSet::parse_file(testdata_path().join("rules/course.yaml"))
        .expect("should parse rule file");
    rules::validate(&rule_set).expect("rule file should validate");
    RuleRegistry::from_rule_set(&rule_set).expect("rule file should compile")
}

fn audit(registry: &RuleRegistry, selector: LocaleSelector, limit: usize) -> AuditReport {
    let options = AuditOptions::new(selector, limit);
    Auditor::new(registry)
        .run(&corpus(), &options)
        .expect("audit should succeed")
        .into_report()
}

fn ids(report: &AuditReport) -> Vec<&str> {
    report.items.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn test_all_locales_scan() {
    let report = audit(&builtin(), LocaleSelector::All, 100);

    assert_eq!(report.total_scanned, 10);
    assert_eq!(report.total_with_issues, 6);
    assert_eq!(ids(&report), vec!["x-1", "x-2", "hu-2", "hu-4", "pl-1", "pl-3"]);

    assert_eq!(report.by_language.get("hu"), Some(&2));
    assert_eq!(report.by_language.get("pl"), Some(&2));
    assert_eq!(report.by_language.get("de"), Some(&1));
    assert_eq!(report.by_language.get("unknown"), Some(&1));
    assert_eq!(report.by_language.get("en"), None);
}

#[test]
fn test_report_counts_are_consistent() {
    let report = audit(&builtin(), LocaleSelector::All, 100);

    assert_eq!(report.total_with_issues, report.items.len());
    assert!(report.total_with_issues <= report.total_scanned);
    assert_eq!(
        report.by_language.values().sum::<usize>(),
        report.total_with_issues
    );
    assert!(report.items.iter().all(|r| !r.issues.is_empty()));
}

#[test]
fn test_export_results_carry_full_text() {
    let report = audit(&builtin(), LocaleSelector::All, 100);
    let pl1 = report.items.iter().find(|r| r.id == "pl-1").unwrap();

    assert_eq!(
        pl1.primary_text,
        "Zbuduj w zespole feedback loop, który wspiera rozwój."
    );
    assert_eq!(
        pl1.secondary_texts.as_deref(),
        Some(&["Regularne rozmowy jeden na jeden.".to_string(), "Tak".to_string()][..])
    );

    assert_eq!(pl1.count_kind(IssueKind::BadTerm), 1);
    assert_eq!(pl1.count_kind(IssueKind::MixedLanguage), 1);
    assert_eq!(pl1.count_kind(IssueKind::Truncation), 1);
    let stub = pl1
        .issues
        .iter()
        .find(|i| i.kind == IssueKind::Truncation)
        .unwrap();
    assert_eq!(stub.detail, "option 2: stub fragment");
    assert_eq!(stub.snippet.as_deref(), Some("Tak"));
}

#[test]
fn test_unknown_locale_skips_leakage() {
    let report = audit(&builtin(), LocaleSelector::All, 100);
    let x1 = report.items.iter().find(|r| r.id == "x-1").unwrap();

    assert_eq!(x1.locale, "unknown");
    assert_eq!(x1.count_kind(IssueKind::MixedLanguage), 0);
    assert_eq!(x1.count_kind(IssueKind::TemplateLeakage), 1);
}

#[test]
fn test_single_locale_scan_uses_previews() {
    let report = audit(&builtin(), LocaleSelector::Single("pl".into()), 100);

    assert_eq!(report.total_scanned, 3);
    assert_eq!(ids(&report), vec!["pl-1", "pl-3"]);
    assert!(report.items.iter().all(|r| r.locale == "pl"));
    assert!(report.items.iter().all(|r| r.secondary_texts.is_none()));
}

#[test]
fn test_single_locale_must_be_supported() {
    let options = AuditOptions::new("cs".parse().unwrap(), 100);
    let err = Auditor::new(&builtin()).run(&corpus(), &options).unwrap_err();
    assert!(matches!(err, AuditError::Configuration(_)));
}

#[test]
fn test_rule_file_extends_builtin_tables() {
    let registry = course_rules();

    let report = audit(&registry, LocaleSelector::Single("cs".into()), 100);
    assert_eq!(report.total_scanned, 1);
    let cs1 = &report.items[0];
    assert_eq!(cs1.id, "cs-1");
    assert_eq!(cs1.count_kind(IssueKind::BadTerm), 1);
    assert_eq!(cs1.count_kind(IssueKind::MixedLanguage), 1);

    // built-in Polish rules still apply
    let report = audit(&registry, LocaleSelector::Single("pl".into()), 100);
    assert_eq!(ids(&report), vec!["pl-1", "pl-3"]);
}

#[test]
fn test_broken_rule_file_is_rejected() {
    let rule_set = RuleSet::parse_file(testdata_path().join("rules/broken.yaml")).unwrap();
    assert!(matches!(
        rules::validate(&rule_set),
        Err(AuditError::Configuration(_))
    ));
}

#[test]
fn test_limit_stops_scan_early() {
    let report = audit(&builtin(), LocaleSelector::All, 4);
    assert_eq!(report.total_scanned, 4);
    assert_eq!(ids(&report), vec!["x-1", "x-2"]);
}

#[test]
fn test_limit_is_clamped() {
    let report = audit(&builtin(), LocaleSelector::All, 0);
    assert_eq!(report.total_scanned, 1);

    let options = AuditOptions::new(LocaleSelector::All, usize::MAX);
    assert_eq!(options.effective_limit(), MAX_LIMIT);
}

#[test]
fn test_runs_are_repeatable() {
    let registry = builtin();
    let first = audit(&registry, LocaleSelector::All, 100);
    let second = audit(&registry, LocaleSelector::All, 100);

    assert_eq!(first.total_scanned, second.total_scanned);
    assert_eq!(first.by_language, second.by_language);
    assert_eq!(first.items, second.items);
}

#[test]
fn test_malformed_record_aborts_run() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("quizzes_pl.jsonl"),
        concat!(
            r#"{"id": "a", "localeHint": "quiz_pl", "primaryText": "Ez egy teszt a"}"#,
            "\n",
            "{not json}\n",
        ),
    )
    .unwrap();

    let corpus = JsonlCorpus::open(temp.path()).unwrap();
    let options = AuditOptions::new(LocaleSelector::All, 100);
    let err = Auditor::new(&builtin()).run(&corpus, &options).unwrap_err();

    match err {
        AuditError::CorpusAccess(CorpusError::Parse { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn test_missing_corpus_is_an_access_error() {
    let err = JsonlCorpus::open(testdata_path().join("no-such-corpus")).unwrap_err();
    assert!(matches!(AuditError::from(err), AuditError::CorpusAccess(_)));
}

#[test]
fn test_cancelled_run_produces_no_report() {
    let token = CancelToken::new();
    token.cancel();

    let registry = builtin();
    let options = AuditOptions::new(LocaleSelector::All, 100);
    let err = Auditor::new(&registry)
        .with_cancel_token(token)
        .run(&corpus(), &options)
        .unwrap_err();
    assert!(matches!(err, AuditError::Cancelled { scanned: 0 }));
}

#[test]
fn test_session_lifecycle() {
    let registry = builtin();
    let options =
        AuditOptions::new(LocaleSelector::Single("hu".into()), 100).with_text_mode(TextMode::Full);
    let mut session = Auditor::new(&registry).run(&corpus(), &options).unwrap();
    assert_eq!(session.state(), RunState::Aggregating);

    let flagged = session
        .emit(|report| Ok::<_, AuditError>(report.total_with_issues))
        .unwrap();
    assert_eq!(flagged, 2);
    assert_eq!(session.state(), RunState::Done);
    assert!(session
        .report()
        .items
        .iter()
        .all(|r| r.secondary_texts.is_some()));
}
