//! Output for audit results.
//!
//! Two modes:
//! - Sample: a short colored preview for a person at a terminal
//! - Export: the complete report as JSON on disk, plus a smaller preview
//!   and the per-locale breakdown

use chrono::{DateTime, Utc};
use colored::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::detect::{preview, AuditResult, Issue, IssueKind, PREVIEW_CHARS};
use crate::errors::AuditError;

/// Results shown in sample mode.
pub const SAMPLE_LIMIT: usize = 20;

/// Results shown after a full export.
pub const EXPORT_SAMPLE_LIMIT: usize = 10;

/// Complete outcome of one audit run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    /// ISO-8601 UTC timestamp.
    pub run_at: String,
    pub total_scanned: usize,
    pub total_with_issues: usize,
    /// Flagged records per locale; keys sorted.
    pub by_language: BTreeMap<String, usize>,
    pub items: Vec<AuditResult>,
}

impl AuditReport {
    /// Locales ordered by flagged count, highest first; ties by code.
    pub fn language_breakdown(&self) -> Vec<(&str, usize)> {
        let mut rows: Vec<(&str, usize)> = self
            .by_language
            .iter()
            .map(|(locale, count)| (locale.as_str(), *count))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        rows
    }

    /// Issue totals per kind across all items.
    pub fn kind_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for issue in self.items.iter().flat_map(|r| &r.issues) {
            *counts.entry(issue.kind.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

/// Default export file name for a run started at `now`.
pub fn default_output_path(now: DateTime<Utc>) -> PathBuf {
    PathBuf::from(format!("content-audit-{}.json", now.format("%Y%m%d-%H%M%S")))
}

/// Serialize the report to `path` in one shot.
///
/// The JSON goes to a temporary file next to `path` and is renamed into
/// place, so a failed write leaves no partial report behind.
pub fn write_json_report(report: &AuditReport, path: &Path) -> Result<PathBuf, AuditError> {
    let write_err = |source: io::Error| AuditError::ReportWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
    serde_json::to_writer_pretty(&mut tmp, report).map_err(|e| write_err(e.into()))?;
    tmp.write_all(b"\n").map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    tracing::info!(path = %path.display(), items = report.items.len(), "report written");
    Ok(path.to_path_buf())
}

/// Write the sample-mode preview.
pub fn write_sample<W: Write>(out: &mut W, locale: &str, report: &AuditReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "  {} v{}",
        "contentaudit".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(out)?;
    write_summary(out, locale, report)?;
    writeln!(out)?;
    write_items(out, report, SAMPLE_LIMIT)?;
    Ok(())
}

/// Write the console part of a full export: summary, a short preview and
/// the locale breakdown.
pub fn write_export_summary<W: Write>(
    out: &mut W,
    report: &AuditReport,
    path: &Path,
) -> io::Result<()> {
    writeln!(out)?;
    write_summary(out, "all", report)?;
    writeln!(out, "  {}{}", "Report:   ".dimmed(), path.display())?;
    writeln!(out)?;
    write_items(out, report, EXPORT_SAMPLE_LIMIT)?;
    write_breakdown(out, report)?;
    Ok(())
}

fn write_summary<W: Write>(out: &mut W, locale: &str, report: &AuditReport) -> io::Result<()> {
    writeln!(out, "  {}{}", "Locale:   ".dimmed(), locale)?;
    writeln!(out, "  {}{}", "Scanned:  ".dimmed(), report.total_scanned)?;

    let flagged = report.total_with_issues.to_string();
    let flagged = if report.total_with_issues == 0 {
        flagged.green()
    } else {
        flagged.yellow().bold()
    };
    writeln!(out, "  {}{}", "Flagged:  ".dimmed(), flagged)?;

    let kinds = report.kind_counts();
    if !kinds.is_empty() {
        let parts: Vec<String> = kinds
            .iter()
            .map(|(kind, count)| format!("{} {}", kind, count))
            .collect();
        writeln!(out, "  {}{}", "Issues:   ".dimmed(), parts.join(", "))?;
    }
    Ok(())
}

fn write_items<W: Write>(out: &mut W, report: &AuditReport, limit: usize) -> io::Result<()> {
    if report.items.is_empty() {
        writeln!(out, "  {}", "No issues found.".green())?;
        writeln!(out)?;
        return Ok(());
    }

    let shown = report.items.len().min(limit);
    writeln!(
        out,
        "  {} ({} of {}):",
        "Flagged records".bold(),
        shown,
        report.items.len()
    )?;
    writeln!(out)?;

    for result in report.items.iter().take(limit) {
        writeln!(
            out,
            "    {} {}",
            result.id.blue(),
            format!("[{}]", result.locale).dimmed()
        )?;
        writeln!(out, "      {}", preview(&result.primary_text, PREVIEW_CHARS))?;
        for issue in &result.issues {
            writeln!(out, "      {}", render_issue(issue))?;
        }
        writeln!(out)?;
    }

    if report.items.len() > limit {
        writeln!(
            out,
            "    {}",
            format!("... and {} more", report.items.len() - limit).dimmed()
        )?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_breakdown<W: Write>(out: &mut W, report: &AuditReport) -> io::Result<()> {
    if report.by_language.is_empty() {
        return Ok(());
    }
    writeln!(out, "  {}", "By language:".bold())?;
    for (locale, count) in report.language_breakdown() {
        let plural = if count != 1 { "s" } else { "" };
        writeln!(out, "    {:<10} {:>6} record{}", locale, count, plural)?;
    }
    writeln!(out)?;
    Ok(())
}

/// One issue as `[kind] detail "snippet"`.
pub fn render_issue(issue: &Issue) -> String {
    let tag = format!("[{}]", issue.kind);
    let tag = match issue.kind {
        IssueKind::BadTerm => tag.red(),
        IssueKind::Truncation => tag.yellow(),
        IssueKind::MixedLanguage => tag.magenta(),
        IssueKind::TemplateLeakage => tag.red().bold(),
    };
    match &issue.snippet {
        Some(snippet) => format!("{} {} {:?}", tag, issue.detail, snippet),
        None => format!("{} {}", tag, issue.detail),
    }
}
