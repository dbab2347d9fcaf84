//! contentaudit - content quality audit for localized course material.
//!
//! Scans generated quiz and lesson text for defects that slip past
//! translation: truncated sentences, stub fragments, leaked source-language
//! vocabulary, unresolved template syntax and locale-specific bad phrasings.
//!
//! # Architecture
//!
//! - `rules`: built-in and file-based rule tables, compiled into a registry
//! - `corpus`: record sources (JSONL on disk, in-memory) and locale resolution
//! - `detect`: per-text detectors and the streaming audit runner
//! - `aggregate`: running totals folded into a report
//! - `report`: console preview and JSON export
//! - `errors`: typed errors shared by the library
//!
//! Detectors are pure functions of text, locale and registry. The runner
//! pulls records lazily, stops at the record limit and aborts on the first
//! corpus error or cancellation.

pub mod aggregate;
pub mod cli;
pub mod corpus;
pub mod detect;
pub mod errors;
pub mod report;
pub mod rules;

pub use corpus::{ContentRecord, CorpusSource, JsonlCorpus, LocaleResolver, MemoryCorpus};
pub use detect::{
    audit_text, AuditOptions, AuditResult, AuditSession, Auditor, Issue, IssueKind,
    LocaleSelector,
};
pub use errors::{AuditError, CorpusError};
pub use report::AuditReport;
pub use rules::{RuleRegistry, RuleSet};
