//! Rule registry for the content audit.
//!
//! The registry holds three kinds of tables:
//!
//! - per-locale bad-term rules, looked up with [`RuleRegistry::rules_for`]
//! - locale-independent foreign-leakage terms
//! - locale-independent template-leakage marker classes
//!
//! All patterns are compiled once when the registry is built. Detectors take
//! the registry by reference; there is no global rule state.
//!
//! Rule files are YAML documents that extend (or replace) the built-in
//! tables:
//!
//! ```yaml
//! version: "1"
//! name: "Course platform rules"
//! extend_builtin: true
//! locales:
//!   pl:
//!     - pattern: '\bw oparciu o\b'
//!       label: "calque 'w oparciu o': use 'na podstawie'"
//! leakage_terms:
//!   - pattern: '\bcheck-in\b'
//!     label: "English term 'check-in' in localized text"
//! ```

pub mod builtin;

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use crate::errors::AuditError;

pub use builtin::{DEFAULT_SOURCE_LOCALE, UNKNOWN_LOCALE};

lazy_static! {
    /// Accepted shape of a locale code: `pl`, `pt-br`, `zh_hant`.
    static ref LOCALE_CODE: Regex = Regex::new(r"^[a-z]{2,3}(?:[-_][a-z0-9]{2,4})?$").unwrap();
}

/// Normalize a locale code for table lookups.
pub fn normalize_locale(code: &str) -> String {
    code.trim().to_lowercase()
}

/// Check that `code` looks like a locale code.
pub fn is_valid_locale_code(code: &str) -> bool {
    LOCALE_CODE.is_match(&normalize_locale(code))
}

/// A compiled pattern with its human-readable label.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    label: String,
}

impl Rule {
    /// Compile a case-insensitive rule.
    pub fn new(pattern: &str, label: &str) -> Result<Self, AuditError> {
        if label.trim().is_empty() {
            return Err(AuditError::config(format!(
                "rule {:?} has an empty label",
                pattern
            )));
        }
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| AuditError::config(format!("invalid pattern {:?}: {}", pattern, e)))?;
        Ok(Self {
            pattern: regex,
            label: label.to_string(),
        })
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// First matched substring, if any.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern.find(text).map(|m| m.as_str())
    }
}

/// Immutable rule tables for one audit run.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    source_locale: String,
    bad_terms: HashMap<String, Vec<Rule>>,
    leakage_terms: Vec<Rule>,
    template_markers: Vec<Rule>,
    supported: BTreeSet<String>,
}

impl RuleRegistry {
    /// Registry with only the built-in tables.
    pub fn builtin() -> Result<Self, AuditError> {
        RegistryBuilder::new().with_builtin().build()
    }

    /// Registry built from a rule file, on top of the built-ins unless the
    /// file sets `extend_builtin: false`.
    pub fn from_rule_set(rule_set: &RuleSet) -> Result<Self, AuditError> {
        let mut builder = RegistryBuilder::new();
        if rule_set.extend_builtin {
            builder = builder.with_builtin();
        }
        builder.rule_set(rule_set).build()
    }

    /// Bad-term rules for a locale, in registration order.
    ///
    /// Unknown locales get an empty slice.
    pub fn rules_for(&self, locale: &str) -> &[Rule] {
        self.bad_terms
            .get(&normalize_locale(locale))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn leakage_terms(&self) -> &[Rule] {
        &self.leakage_terms
    }

    pub fn template_markers(&self) -> &[Rule] {
        &self.template_markers
    }

    pub fn source_locale(&self) -> &str {
        &self.source_locale
    }

    /// Whether foreign-leakage checks apply to `locale`.
    pub fn checks_leakage(&self, locale: &str) -> bool {
        let locale = normalize_locale(locale);
        locale != self.source_locale && locale != UNKNOWN_LOCALE
    }

    /// Whether `locale` may be selected for a single-locale scan.
    pub fn is_supported(&self, locale: &str) -> bool {
        self.supported.contains(&normalize_locale(locale))
    }

    pub fn supported_locales(&self) -> impl Iterator<Item = &str> {
        self.supported.iter().map(String::as_str)
    }
}

/// Collects rule sources before compiling them into a [`RuleRegistry`].
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    source_locale: String,
    bad_terms: BTreeMap<String, Vec<(String, String)>>,
    leakage_terms: Vec<(String, String)>,
    template_markers: Vec<(String, String)>,
    supported: BTreeSet<String>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    /// Empty tables with the default source locale.
    pub fn new() -> Self {
        Self {
            source_locale: DEFAULT_SOURCE_LOCALE.to_string(),
            bad_terms: BTreeMap::new(),
            leakage_terms: Vec::new(),
            template_markers: Vec::new(),
            supported: BTreeSet::new(),
        }
    }

    /// Add the tables shipped in [`builtin`].
    pub fn with_builtin(mut self) -> Self {
        // phf iteration order is not stable across builds; sort for determinism
        let mut locales: Vec<_> = builtin::BAD_TERMS.entries().collect();
        locales.sort_by_key(|(locale, _)| **locale);
        for (locale, rules) in locales {
            for (pattern, label) in rules.iter() {
                self = self.bad_term(locale, pattern, label);
            }
        }
        for (pattern, label) in builtin::LEAKAGE_TERMS {
            self = self.leakage_term(pattern, label);
        }
        for (pattern, label) in builtin::TEMPLATE_MARKERS {
            self = self.template_marker(pattern, label);
        }
        self
    }

    pub fn source_locale(mut self, locale: &str) -> Self {
        self.source_locale = normalize_locale(locale);
        self
    }

    /// Register a bad-term rule. The locale becomes selectable.
    pub fn bad_term(mut self, locale: &str, pattern: &str, label: &str) -> Self {
        let locale = normalize_locale(locale);
        self.supported.insert(locale.clone());
        self.bad_terms
            .entry(locale)
            .or_default()
            .push((pattern.to_string(), label.to_string()));
        self
    }

    pub fn leakage_term(mut self, pattern: &str, label: &str) -> Self {
        self.leakage_terms
            .push((pattern.to_string(), label.to_string()));
        self
    }

    pub fn template_marker(mut self, pattern: &str, label: &str) -> Self {
        self.template_markers
            .push((pattern.to_string(), label.to_string()));
        self
    }

    /// Mark a locale selectable even without bad-term rules.
    pub fn supported_locale(mut self, locale: &str) -> Self {
        self.supported.insert(normalize_locale(locale));
        self
    }

    /// Merge a parsed rule file.
    pub fn rule_set(mut self, rule_set: &RuleSet) -> Self {
        if let Some(source) = &rule_set.source_locale {
            self = self.source_locale(source);
        }
        if !rule_set.extend_builtin {
            self.leakage_terms.clear();
            self.template_markers.clear();
            self.bad_terms.clear();
            self.supported.clear();
        }
        for (locale, rules) in &rule_set.locales {
            self = self.supported_locale(locale);
            for rule in rules {
                self = self.bad_term(locale, &rule.pattern, &rule.label);
            }
        }
        for rule in &rule_set.leakage_terms {
            self = self.leakage_term(&rule.pattern, &rule.label);
        }
        for rule in &rule_set.template_markers {
            self = self.template_marker(&rule.pattern, &rule.label);
        }
        for locale in &rule_set.supported_locales {
            self = self.supported_locale(locale);
        }
        self
    }

    /// Compile every pattern.
    pub fn build(self) -> Result<RuleRegistry, AuditError> {
        let compile = |entries: &[(String, String)]| -> Result<Vec<Rule>, AuditError> {
            entries
                .iter()
                .map(|(pattern, label)| Rule::new(pattern, label))
                .collect()
        };

        for locale in self.supported.iter().chain(self.bad_terms.keys()) {
            if !is_valid_locale_code(locale) {
                return Err(AuditError::config(format!(
                    "invalid locale code {:?}",
                    locale
                )));
            }
        }

        let mut bad_terms = HashMap::with_capacity(self.bad_terms.len());
        for (locale, entries) in &self.bad_terms {
            bad_terms.insert(locale.clone(), compile(entries)?);
        }

        let mut supported = self.supported;
        supported.insert(self.source_locale.clone());

        Ok(RuleRegistry {
            source_locale: self.source_locale,
            bad_terms,
            leakage_terms: compile(&self.leakage_terms)?,
            template_markers: compile(&self.template_markers)?,
            supported,
        })
    }
}

/// A pattern entry in a rule file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleEntry {
    pub pattern: String,
    pub label: String,
}

/// Top-level rule file definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleSet {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Locale the content is translated from (default: "en")
    #[serde(default)]
    pub source_locale: Option<String>,
    /// Keep the built-in tables and append to them (default: true)
    #[serde(default = "default_true")]
    pub extend_builtin: bool,
    /// Locales selectable for single-locale scans even without rules
    #[serde(default)]
    pub supported_locales: Vec<String>,
    #[serde(default)]
    pub locales: BTreeMap<String, Vec<RuleEntry>>,
    #[serde(default)]
    pub leakage_terms: Vec<RuleEntry>,
    #[serde(default)]
    pub template_markers: Vec<RuleEntry>,
}

fn default_true() -> bool {
    true
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            version: String::new(),
            name: String::new(),
            description: None,
            source_locale: None,
            extend_builtin: true,
            supported_locales: Vec::new(),
            locales: BTreeMap::new(),
            leakage_terms: Vec::new(),
            template_markers: Vec::new(),
        }
    }
}

impl RuleSet {
    /// Parse a rule set from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, AuditError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AuditError::config(format!("cannot read rule file {}: {}", path.display(), e))
        })?;
        Self::parse_str(&content)
            .map_err(|e| AuditError::config(format!("{}: {}", path.display(), e)))
    }

    /// Parse a rule set from YAML text.
    pub fn parse_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

/// Validate a rule set for correctness without building a registry.
pub fn validate(rule_set: &RuleSet) -> Result<(), AuditError> {
    if let Some(source) = &rule_set.source_locale {
        if !is_valid_locale_code(source) {
            return Err(AuditError::config(format!(
                "invalid source_locale {:?}",
                source
            )));
        }
    }

    for locale in rule_set.locales.keys().chain(&rule_set.supported_locales) {
        if !is_valid_locale_code(locale) {
            return Err(AuditError::config(format!(
                "invalid locale code {:?}",
                locale
            )));
        }
    }

    let entries = rule_set
        .locales
        .values()
        .flatten()
        .chain(&rule_set.leakage_terms)
        .chain(&rule_set.template_markers);
    for entry in entries {
        Rule::new(&entry.pattern, &entry.label)?;
    }

    Ok(())
}
