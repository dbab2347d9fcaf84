//! JSON Lines corpus source.
//!
//! A corpus is either a single `.jsonl` file or a directory tree of them
//! (an export of the document store, one collection per file). Each line
//! holds one record:
//!
//! ```json
//! {"id": "q-102", "localeHint": "quiz_feedback_pl", "status": "published",
//!  "primaryText": "...", "secondaryTexts": ["...", "..."]}
//! ```
//!
//! Files are read lazily, line by line, in sorted path order.

use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ContentRecord, CorpusFilter, CorpusSource, RecordStream};
use crate::errors::CorpusError;

const CORPUS_EXTENSIONS: &[&str] = &["jsonl", "ndjson"];

/// On-disk record: the content plus its publication status.
#[derive(Deserialize)]
struct StoredRecord {
    #[serde(flatten)]
    record: ContentRecord,
    #[serde(default)]
    status: Option<String>,
}

/// Corpus backed by JSON Lines files.
#[derive(Debug, Clone)]
pub struct JsonlCorpus {
    root: PathBuf,
}

impl JsonlCorpus {
    /// Open a corpus file or directory. Fails if the path is missing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CorpusError> {
        let root = path.as_ref().to_path_buf();
        std::fs::metadata(&root).map_err(|source| CorpusError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Corpus files in read order.
    pub fn files(&self) -> Result<Vec<PathBuf>, CorpusError> {
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let ext = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("");
            if CORPUS_EXTENSIONS.contains(&ext) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

impl CorpusSource for JsonlCorpus {
    fn records<'a>(&'a self, filter: &CorpusFilter) -> Result<RecordStream<'a>, CorpusError> {
        let files = self.files()?;
        tracing::debug!(root = %self.root.display(), files = files.len(), "opened corpus");
        Ok(Box::new(JsonlStream {
            files: files.into_iter(),
            current: None,
            filter: filter.clone(),
            yielded: 0,
            failed: false,
        }))
    }
}

struct OpenFile {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

struct JsonlStream {
    files: std::vec::IntoIter<PathBuf>,
    current: Option<OpenFile>,
    filter: CorpusFilter,
    yielded: usize,
    /// Set after the first error; the stream ends there.
    failed: bool,
}

impl Iterator for JsonlStream {
    type Item = Result<ContentRecord, CorpusError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.yielded >= self.filter.limit {
            return None;
        }

        loop {
            if self.current.is_none() {
                let path = self.files.next()?;
                match File::open(&path) {
                    Ok(file) => {
                        self.current = Some(OpenFile {
                            path,
                            lines: BufReader::new(file).lines(),
                            line_no: 0,
                        });
                    }
                    Err(source) => {
                        self.failed = true;
                        return Some(Err(CorpusError::Io { path, source }));
                    }
                }
            }

            let file = self.current.as_mut()?;
            match file.lines.next() {
                None => {
                    self.current = None;
                }
                Some(Err(source)) => {
                    self.failed = true;
                    return Some(Err(CorpusError::Io {
                        path: file.path.clone(),
                        source,
                    }));
                }
                Some(Ok(line)) => {
                    file.line_no += 1;
                    if line.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<StoredRecord>(&line) {
                        Ok(stored) => {
                            if !self
                                .filter
                                .accepts(stored.status.as_deref(), &stored.record.locale_hint)
                            {
                                continue;
                            }
                            self.yielded += 1;
                            return Some(Ok(stored.record));
                        }
                        Err(source) => {
                            self.failed = true;
                            return Some(Err(CorpusError::Parse {
                                path: file.path.clone(),
                                line: file.line_no,
                                source,
                            }));
                        }
                    }
                }
            }
        }
    }
}
