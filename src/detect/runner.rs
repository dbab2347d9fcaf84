//! Audit runner that streams a corpus through every detector.

use indicatif::ProgressBar;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::aggregate::Aggregator;
use crate::corpus::{ContentRecord, CorpusFilter, CorpusSource, LocaleResolver, SuffixResolver};
use crate::errors::AuditError;
use crate::report::AuditReport;
use crate::rules::{is_valid_locale_code, normalize_locale, RuleRegistry};

use super::{audit_text, preview, AuditResult};

/// Hard cap on records per run, whatever the caller asks for.
pub const MAX_LIMIT: usize = 50_000;

/// Records scanned when no limit is given.
pub const DEFAULT_LIMIT: usize = 5_000;

/// Characters of primary text kept in preview mode.
pub const PREVIEW_CHARS: usize = 100;

/// Which records a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleSelector {
    /// Every locale; each record's locale comes from the resolver.
    All,
    /// One locale, applied to every record pulled.
    Single(String),
}

impl FromStr for LocaleSelector {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = normalize_locale(s);
        if code == "all" {
            return Ok(LocaleSelector::All);
        }
        if !is_valid_locale_code(&code) {
            return Err(AuditError::config(format!("invalid locale selector {:?}", s)));
        }
        Ok(LocaleSelector::Single(code))
    }
}

impl fmt::Display for LocaleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocaleSelector::All => write!(f, "all"),
            LocaleSelector::Single(code) => write!(f, "{}", code),
        }
    }
}

/// How much text an [`AuditResult`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// Primary text shortened, secondary texts omitted.
    Preview,
    /// Everything, untruncated.
    Full,
}

/// Parameters for one audit run.
#[derive(Debug, Clone)]
pub struct AuditOptions {
    pub selector: LocaleSelector,
    /// Requested record limit; see [`AuditOptions::effective_limit`].
    pub limit: usize,
    pub text_mode: TextMode,
}

impl AuditOptions {
    /// Options with the text mode implied by the selector: full text for
    /// all-locale exports, previews for single-locale samples.
    pub fn new(selector: LocaleSelector, limit: usize) -> Self {
        let text_mode = match selector {
            LocaleSelector::All => TextMode::Full,
            LocaleSelector::Single(_) => TextMode::Preview,
        };
        Self {
            selector,
            limit,
            text_mode,
        }
    }

    pub fn with_text_mode(mut self, mode: TextMode) -> Self {
        self.text_mode = mode;
        self
    }

    /// Requested limit clamped to `1..=MAX_LIMIT`.
    pub fn effective_limit(&self) -> usize {
        self.limit.clamp(1, MAX_LIMIT)
    }
}

/// Shared flag that stops a running scan before its next record.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Lifecycle of one run. States only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunState {
    Idle,
    Scanning,
    Aggregating,
    Reporting,
    Done,
}

/// A run that has finished scanning and holds its report.
#[derive(Debug)]
pub struct AuditSession {
    state: RunState,
    report: AuditReport,
}

impl AuditSession {
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn report(&self) -> &AuditReport {
        &self.report
    }

    pub fn into_report(self) -> AuditReport {
        self.report
    }

    /// Hand the report to an emitter, moving through `Reporting` to `Done`.
    ///
    /// On error the session stays in `Reporting`.
    pub fn emit<T, E, F>(&mut self, emitter: F) -> Result<T, E>
    where
        F: FnOnce(&AuditReport) -> Result<T, E>,
    {
        self.state = transition(self.state, RunState::Reporting);
        let out = emitter(&self.report)?;
        self.state = transition(self.state, RunState::Done);
        Ok(out)
    }
}

fn transition(from: RunState, to: RunState) -> RunState {
    debug_assert!(to > from, "run state cannot go from {:?} to {:?}", from, to);
    tracing::debug!(?from, ?to, "run state");
    to
}

/// Streams records from a corpus through every detector.
pub struct Auditor<'r> {
    registry: &'r RuleRegistry,
    resolver: Box<dyn LocaleResolver + 'r>,
    cancel: CancelToken,
    progress: ProgressBar,
}

impl<'r> Auditor<'r> {
    /// Auditor using the suffix resolver and no progress output.
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self {
            registry,
            resolver: Box::new(SuffixResolver::new()),
            cancel: CancelToken::new(),
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_resolver<R: LocaleResolver + 'r>(mut self, resolver: R) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Tick `progress` once per record pulled.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Build the corpus query for a run, rejecting unsupported selectors.
    pub fn filter_for(&self, options: &AuditOptions) -> Result<CorpusFilter, AuditError> {
        let requested = options.limit;
        let limit = options.effective_limit();
        if limit != requested {
            tracing::debug!(requested, limit, "record limit clamped");
        }

        let filter = CorpusFilter::new(limit);
        match &options.selector {
            LocaleSelector::All => Ok(filter),
            LocaleSelector::Single(locale) => {
                if !self.registry.is_supported(locale) {
                    let supported: Vec<_> = self.registry.supported_locales().collect();
                    return Err(AuditError::config(format!(
                        "unsupported locale {:?} (supported: {})",
                        locale,
                        supported.join(", ")
                    )));
                }
                let pattern = self.resolver.hint_pattern(locale).map_err(|e| {
                    AuditError::config(format!("cannot build hint pattern for {:?}: {}", locale, e))
                })?;
                Ok(filter.with_hint_pattern(pattern))
            }
        }
    }

    /// Run every detector over one record.
    ///
    /// Returns `None` for clean records. Secondary-text issues carry their
    /// 1-based option index in the detail.
    pub fn audit_record(
        &self,
        record: &ContentRecord,
        locale: &str,
        mode: TextMode,
    ) -> Option<AuditResult> {
        let mut issues = audit_text(&record.primary_text, locale, self.registry);
        for (idx, text) in record.secondary_texts.iter().enumerate() {
            issues.extend(
                audit_text(text, locale, self.registry)
                    .into_iter()
                    .map(|issue| issue.for_option(idx + 1)),
            );
        }

        if issues.is_empty() {
            return None;
        }

        let (primary_text, secondary_texts) = match mode {
            TextMode::Preview => (preview(&record.primary_text, PREVIEW_CHARS), None),
            TextMode::Full => (
                record.primary_text.clone(),
                Some(record.secondary_texts.clone()),
            ),
        };

        Some(AuditResult {
            id: record.id.clone(),
            locale: locale.to_string(),
            primary_text,
            secondary_texts,
            issues,
        })
    }

    /// Scan `source` and aggregate the results.
    ///
    /// Fails fast: a corpus error or cancellation aborts the run and no
    /// report is produced.
    pub fn run(
        &self,
        source: &dyn CorpusSource,
        options: &AuditOptions,
    ) -> Result<AuditSession, AuditError> {
        let mut state = RunState::Idle;
        let filter = self.filter_for(options)?;

        state = transition(state, RunState::Scanning);
        tracing::info!(selector = %options.selector, limit = filter.limit, "audit started");

        let single = match &options.selector {
            LocaleSelector::Single(locale) => Some(normalize_locale(locale)),
            LocaleSelector::All => None,
        };

        let mut aggregator = Aggregator::new();
        let mut stream = source.records(&filter).map_err(|e| {
            self.progress.abandon();
            AuditError::from(e)
        })?;

        while aggregator.scanned() < filter.limit {
            if self.cancel.is_cancelled() {
                self.progress.abandon();
                return Err(AuditError::Cancelled {
                    scanned: aggregator.scanned(),
                });
            }

            let record = match stream.next() {
                Some(Ok(record)) => record,
                Some(Err(err)) => {
                    self.progress.abandon();
                    return Err(err.into());
                }
                None => break,
            };
            aggregator.record_scanned();
            self.progress.inc(1);

            let locale = match &single {
                Some(locale) => locale.clone(),
                None => self.resolver.resolve_or_fallback(&record.locale_hint),
            };

            if let Some(result) = self.audit_record(&record, &locale, options.text_mode) {
                tracing::trace!(id = %result.id, issues = result.issue_count(), "record flagged");
                aggregator.record_flagged(result);
            }
        }
        self.progress.finish_and_clear();

        state = transition(state, RunState::Aggregating);
        tracing::info!(
            scanned = aggregator.scanned(),
            flagged = aggregator.flagged(),
            locales = aggregator.by_language().len(),
            "audit finished"
        );

        Ok(AuditSession {
            state,
            report: aggregator.finish(Utc::now()),
        })
    }
}
