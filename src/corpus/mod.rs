//! Read-only access to the content corpus.
//!
//! The audit engine only needs a streaming query: records matching a
//! [`CorpusFilter`], pulled one at a time. Sources never hand out the whole
//! corpus at once and nothing here writes back.

mod jsonl;
mod locale;

pub use jsonl::JsonlCorpus;
pub use locale::{LocaleResolver, SuffixResolver};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::CorpusError;

/// Statuses that count as live content.
pub const PUBLISHED_STATUSES: &[&str] = &["published", "active"];

/// One lesson or quiz record as stored in the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: String,
    /// Opaque string the locale is derived from.
    pub locale_hint: String,
    pub primary_text: String,
    #[serde(default)]
    pub secondary_texts: Vec<String>,
}

impl ContentRecord {
    pub fn new(id: &str, locale_hint: &str, primary_text: &str) -> Self {
        Self {
            id: id.to_string(),
            locale_hint: locale_hint.to_string(),
            primary_text: primary_text.to_string(),
            secondary_texts: Vec::new(),
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.secondary_texts = options.into_iter().map(Into::into).collect();
        self
    }
}

/// Query parameters passed to a corpus source.
#[derive(Debug, Clone)]
pub struct CorpusFilter {
    /// Skip drafts and archived records.
    pub published_only: bool,
    /// Only records whose locale hint matches.
    pub hint_pattern: Option<Regex>,
    /// Maximum number of records to yield.
    pub limit: usize,
}

impl CorpusFilter {
    pub fn new(limit: usize) -> Self {
        Self {
            published_only: true,
            hint_pattern: None,
            limit,
        }
    }

    pub fn with_hint_pattern(mut self, pattern: Regex) -> Self {
        self.hint_pattern = Some(pattern);
        self
    }

    /// Whether a record with this status and hint passes the filter.
    pub fn accepts(&self, status: Option<&str>, locale_hint: &str) -> bool {
        if self.published_only {
            let status = status.unwrap_or("published");
            if !PUBLISHED_STATUSES
                .iter()
                .any(|s| s.eq_ignore_ascii_case(status))
            {
                return false;
            }
        }
        match &self.hint_pattern {
            Some(pattern) => pattern.is_match(locale_hint),
            None => true,
        }
    }
}

/// Stream of records produced by a corpus source.
pub type RecordStream<'a> = Box<dyn Iterator<Item = Result<ContentRecord, CorpusError>> + 'a>;

/// Read contract the audit engine depends on.
pub trait CorpusSource {
    /// Stream records matching `filter`, at most `filter.limit` of them.
    fn records<'a>(&'a self, filter: &CorpusFilter) -> Result<RecordStream<'a>, CorpusError>;
}

/// Corpus held in memory, mainly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    records: Vec<(ContentRecord, Option<String>)>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a published record.
    pub fn push(&mut self, record: ContentRecord) {
        self.records.push((record, None));
    }

    /// Add a record with an explicit status.
    pub fn push_with_status(&mut self, record: ContentRecord, status: &str) {
        self.records.push((record, Some(status.to_string())));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<ContentRecord> for MemoryCorpus {
    fn from_iter<T: IntoIterator<Item = ContentRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().map(|r| (r, None)).collect(),
        }
    }
}

impl CorpusSource for MemoryCorpus {
    fn records<'a>(&'a self, filter: &CorpusFilter) -> Result<RecordStream<'a>, CorpusError> {
        let filter = filter.clone();
        let limit = filter.limit;
        let iter = self
            .records
            .iter()
            .filter(move |(record, status)| filter.accepts(status.as_deref(), &record.locale_hint))
            .map(|(record, _)| Ok(record.clone()))
            .take(limit);
        Ok(Box::new(iter))
    }
}
