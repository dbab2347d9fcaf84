//! Locale derivation from record hints.
//!
//! How a locale is encoded in a record belongs to the corpus owner. The
//! engine only sees the [`LocaleResolver`] contract; [`SuffixResolver`]
//! implements the convention used by the course platform's collection
//! names, where the locale is the trailing `_xx` or `-xx` segment
//! (`quiz_feedback_basics_pl`, `lesson-12-hu`).

use lazy_static::lazy_static;
use regex::Regex;

use crate::rules::UNKNOWN_LOCALE;

lazy_static! {
    static ref LOCALE_SUFFIX: Regex = Regex::new(r"[_-]([A-Za-z]{2,3})$").unwrap();
}

/// Maps a record's locale hint to a locale code.
pub trait LocaleResolver {
    /// Locale encoded in `hint`, if any.
    fn resolve(&self, hint: &str) -> Option<String>;

    /// Code used when `resolve` finds nothing.
    fn fallback(&self) -> &str {
        UNKNOWN_LOCALE
    }

    /// Pattern selecting hints of one locale, for corpus queries.
    fn hint_pattern(&self, locale: &str) -> Result<Regex, regex::Error>;

    /// Resolve with fallback.
    fn resolve_or_fallback(&self, hint: &str) -> String {
        self.resolve(hint)
            .unwrap_or_else(|| self.fallback().to_string())
    }
}

/// Takes the locale from the last `_`/`-` separated segment of the hint.
#[derive(Debug, Clone)]
pub struct SuffixResolver {
    fallback: String,
}

impl Default for SuffixResolver {
    fn default() -> Self {
        Self {
            fallback: UNKNOWN_LOCALE.to_string(),
        }
    }
}

impl SuffixResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(fallback: &str) -> Self {
        Self {
            fallback: fallback.to_string(),
        }
    }
}

impl LocaleResolver for SuffixResolver {
    fn resolve(&self, hint: &str) -> Option<String> {
        LOCALE_SUFFIX
            .captures(hint.trim())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_lowercase())
    }

    fn fallback(&self) -> &str {
        &self.fallback
    }

    fn hint_pattern(&self, locale: &str) -> Result<Regex, regex::Error> {
        Regex::new(&format!(r"(?i)[_-]{}\s*$", regex::escape(locale)))
    }
}
