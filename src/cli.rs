//! Command-line interface for contentaudit.

use chrono::Utc;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::corpus::JsonlCorpus;
use crate::detect::{AuditOptions, Auditor, CancelToken, LocaleSelector, TextMode, DEFAULT_LIMIT};
use crate::errors::AuditError;
use crate::report;
use crate::rules::{self, RuleRegistry, RuleSet};

/// Exit codes. Finding issues is a successful run.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 1;

/// Rule file names looked up in the working directory.
const DEFAULT_RULE_FILES: &[&str] = &["contentaudit.yaml", ".contentaudit.yaml"];

const STARTER_RULES: &str = include_str!("templates/starter-rules.yaml");

/// Content quality audit for localized course material.
///
/// Scans quiz and lesson text for truncation, stub fragments, leaked
/// source-language terms, unresolved template syntax and known bad
/// phrasings.
#[derive(Parser)]
#[command(name = "contentaudit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a corpus and report flagged records
    #[command(visible_alias = "scan")]
    Audit(AuditArgs),
    /// Show the effective rule tables
    Rules(RulesArgs),
    /// Write a starter rule file
    Init(InitArgs),
}

/// Arguments for the audit command.
#[derive(Parser)]
pub struct AuditArgs {
    /// Corpus to scan: a .jsonl file or a directory of them
    #[arg(short, long)]
    pub corpus: PathBuf,

    /// Locale code to audit, or "all"
    #[arg(short, long, default_value = "all")]
    pub locale: String,

    /// Maximum records to scan (capped at 50000)
    #[arg(short = 'n', long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Write the full JSON report here (default for "all": timestamped file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rule file (default: auto-discover, else built-in rules only)
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Cancel the scan after this many seconds
    #[arg(long)]
    pub time_budget: Option<u64>,

    /// Do not show the progress spinner
    #[arg(long)]
    pub no_progress: bool,
}

/// Arguments for the rules command.
#[derive(Parser)]
pub struct RulesArgs {
    /// Only show bad-term rules for this locale
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Rule file (default: auto-discover)
    #[arg(short, long)]
    pub rules: Option<PathBuf>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "contentaudit.yaml")]
    pub output: PathBuf,
}

/// Find a rule file in the current directory.
fn discover_rules() -> Option<PathBuf> {
    DEFAULT_RULE_FILES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

/// Build the registry from an explicit or discovered rule file, falling
/// back to the built-in tables.
pub fn load_registry(explicit: Option<&Path>) -> Result<RuleRegistry, AuditError> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => discover_rules(),
    };

    match path {
        Some(path) => {
            let rule_set = RuleSet::parse_file(&path)?;
            rules::validate(&rule_set)?;
            tracing::info!(path = %path.display(), name = %rule_set.name, "loaded rule file");
            RuleRegistry::from_rule_set(&rule_set)
        }
        None => {
            tracing::debug!("no rule file found, using built-in rules");
            RuleRegistry::builtin()
        }
    }
}

fn scan_progress() -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    let template = "  {spinner} scanned {pos} records ({elapsed})";
    if let Ok(style) = ProgressStyle::with_template(template) {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(120));
    progress
}

/// Run the audit command.
pub fn run_audit(args: &AuditArgs) -> anyhow::Result<i32> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    audit_to(args, &mut out)
}

/// Run the audit command, writing console output to `out`.
///
/// In export mode the summary is written before the JSON file, so a
/// `ReportWrite` error arrives after the summary.
pub fn audit_to<W: Write>(args: &AuditArgs, out: &mut W) -> anyhow::Result<i32> {
    let registry = load_registry(args.rules.as_deref())?;
    let selector: LocaleSelector = args.locale.parse()?;

    // an explicit output path turns any scan into a full export
    let export = selector == LocaleSelector::All || args.output.is_some();
    let text_mode = if export { TextMode::Full } else { TextMode::Preview };
    let options = AuditOptions::new(selector.clone(), args.limit).with_text_mode(text_mode);

    let corpus = JsonlCorpus::open(&args.corpus).map_err(AuditError::from)?;
    tracing::debug!(corpus = %corpus.root().display(), export, "corpus opened");

    let cancel = CancelToken::new();
    if let Some(secs) = args.time_budget {
        let token = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_secs(secs));
            token.cancel();
        });
    }

    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        scan_progress()
    };

    let auditor = Auditor::new(&registry)
        .with_cancel_token(cancel)
        .with_progress(progress);
    let mut session = auditor.run(&corpus, &options)?;

    if export {
        let path = args
            .output
            .clone()
            .unwrap_or_else(|| report::default_output_path(Utc::now()));
        session.emit(|audit| -> anyhow::Result<()> {
            report::write_export_summary(&mut *out, audit, &path)?;
            out.flush()?;
            report::write_json_report(audit, &path)?;
            Ok(())
        })?;
    } else {
        let locale = selector.to_string();
        session.emit(|audit| -> anyhow::Result<()> {
            report::write_sample(&mut *out, &locale, audit)?;
            Ok(())
        })?;
    }

    Ok(EXIT_SUCCESS)
}

/// Run the rules command.
pub fn run_rules(args: &RulesArgs) -> anyhow::Result<i32> {
    let registry = load_registry(args.rules.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_rules(&mut out, &registry, args.locale.as_deref())?;
    Ok(EXIT_SUCCESS)
}

/// Print the registry tables.
pub fn write_rules<W: Write>(
    out: &mut W,
    registry: &RuleRegistry,
    locale: Option<&str>,
) -> io::Result<()> {
    writeln!(out, "Source locale: {}", registry.source_locale())?;
    let supported: Vec<_> = registry.supported_locales().collect();
    writeln!(out, "Supported locales: {}", supported.join(", "))?;
    writeln!(out)?;

    let locales: Vec<&str> = match locale {
        Some(code) => vec![code],
        None => supported,
    };
    for code in locales {
        let rules = registry.rules_for(code);
        writeln!(out, "Bad terms [{}] ({}):", code, rules.len())?;
        for rule in rules {
            writeln!(out, "  {:<40} {}", rule.pattern().as_str(), rule.label())?;
        }
        writeln!(out)?;
    }

    if locale.is_none() {
        writeln!(
            out,
            "Leakage terms ({}, first match only):",
            registry.leakage_terms().len()
        )?;
        for rule in registry.leakage_terms() {
            writeln!(out, "  {:<40} {}", rule.pattern().as_str(), rule.label())?;
        }
        writeln!(out)?;

        writeln!(out, "Template markers ({}):", registry.template_markers().len())?;
        for rule in registry.template_markers() {
            writeln!(out, "  {:<40} {}", rule.pattern().as_str(), rule.label())?;
        }
    }
    Ok(())
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(&args.output, STARTER_RULES)?;

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Add locale rules to {}", args.output.display());
    println!(
        "  2. Run: contentaudit audit --corpus <path> --rules {}",
        args.output.display()
    );

    Ok(EXIT_SUCCESS)
}
