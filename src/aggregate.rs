//! Running totals for an audit run.

use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;

use crate::detect::AuditResult;
use crate::report::AuditReport;

/// Accumulates counters and flagged results during a scan.
///
/// Counters only ever grow. They are the single source for the report's
/// totals, so `total_with_issues == items.len()` holds by construction.
#[derive(Debug, Default)]
pub struct Aggregator {
    scanned: usize,
    by_language: BTreeMap<String, usize>,
    items: Vec<AuditResult>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a record pulled from the corpus.
    pub fn record_scanned(&mut self) {
        self.scanned += 1;
    }

    /// Keep a flagged result, in discovery order.
    pub fn record_flagged(&mut self, result: AuditResult) {
        *self.by_language.entry(result.locale.clone()).or_insert(0) += 1;
        self.items.push(result);
    }

    pub fn scanned(&self) -> usize {
        self.scanned
    }

    pub fn flagged(&self) -> usize {
        self.items.len()
    }

    pub fn by_language(&self) -> &BTreeMap<String, usize> {
        &self.by_language
    }

    /// Close the run and build its report.
    pub fn finish(self, run_at: DateTime<Utc>) -> AuditReport {
        AuditReport {
            run_at: run_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            total_scanned: self.scanned,
            total_with_issues: self.items.len(),
            by_language: self.by_language,
            items: self.items,
        }
    }
}
