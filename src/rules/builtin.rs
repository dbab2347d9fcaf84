//! Built-in rule tables shipped with the engine.
//!
//! Entries are `(pattern, label)` pairs. Patterns are compiled
//! case-insensitively when the registry is built.

use phf::phf_map;

/// Locale whose text is the translation source; leakage checks skip it.
pub const DEFAULT_SOURCE_LOCALE: &str = "en";

/// Marker for records whose locale could not be derived.
pub const UNKNOWN_LOCALE: &str = "unknown";

/// Known bad phrasings per locale: calques, misspellings and anglicisms
/// that keep appearing in generated lessons.
pub static BAD_TERMS: phf::Map<&'static str, &'static [(&'static str, &'static str)]> = phf_map! {
    "pl" => &[
        (r"\bfeedback\s+loop\b", "anglicism 'feedback loop': use 'pętla informacji zwrotnej'"),
        (r"\bw\s+oparciu\s+o\b", "calque 'w oparciu o': use 'na podstawie'"),
        (r"\bnapewno\b", "misspelling 'napewno': use 'na pewno'"),
        (r"\bwogóle\b", "misspelling 'wogóle': use 'w ogóle'"),
        (r"\bbyć\s+w\s+stanie\s+by\b", "malformed phrase 'być w stanie by'"),
    ],
    "hu" => &[
        (r"\bkerül\s+bemutatásra\b", "stilted passive 'kerül bemutatásra': use an active verb"),
        (
            r"\bmegvalósításra\s+kerül\b",
            "stilted passive 'megvalósításra kerül': use an active verb",
        ),
        (r"\bmuszály\b", "misspelling 'muszály': use 'muszáj'"),
        (r"\bmeetinget\b", "anglicism 'meetinget': use 'megbeszélést'"),
    ],
    "de" => &[
        (r"\bmacht\s+(?:keinen\s+|viel\s+)?Sinn\b", "anglicism 'macht Sinn': use 'ergibt Sinn'"),
        (r"\bin\s+20\d\d\b", "anglicism 'in <year>': use 'im Jahr <year>' or the bare year"),
        (r"\beinmal\s+mehr\b", "calque 'einmal mehr': use 'wieder einmal'"),
        (r"\bSeid\s+ihr\s+sicher,\s+dass\b", "mixed address form: lessons use 'Sie'"),
    ],
    "fr" => &[
        (r"\bfai(?:re|t|s)\s+sens\b", "anglicism 'faire sens': use 'avoir du sens'"),
        (
            r"\bsupporter\s+(?:l'|la|le|les|un|une)\b",
            "false friend 'supporter' (to support): use 'soutenir'",
        ),
        (r"\bau\s+final\b", "colloquial 'au final': use 'finalement'"),
        (
            r"\ben\s+charge\s+de\s+la\s+(?:deadline|date)\b",
            "malformed phrase 'en charge de la date'",
        ),
    ],
    "es" => &[
        (
            r"\baplicar\s+(?:para|a)\s+(?:un|una|el|la)\b",
            "anglicism 'aplicar para': use 'solicitar'",
        ),
        (
            r"\brealiz(?:ar|ó|as|a)\s+que\b",
            "false friend 'realizar que': use 'darse cuenta de que'",
        ),
        (r"\ben\s+base\s+a\b", "calque 'en base a': use 'con base en'"),
    ],
    "it" => &[
        (r"\bsupportare\b", "false friend 'supportare': use 'sostenere'"),
        (r"\bpiuttosto\s+che\b", "misused 'piuttosto che' as 'or': use 'oppure'"),
        (r"\bapplicare\s+per\b", "anglicism 'applicare per': use 'candidarsi a'"),
    ],
};

/// English terms that leak into localized text. Order matters: the
/// leakage detector reports only the first one found.
pub static LEAKAGE_TERMS: &[(&str, &str)] = &[
    (r"\bfeedback\b", "English term 'feedback' in localized text"),
    (r"\bmindset\b", "English term 'mindset' in localized text"),
    (r"\bdeadlines?\b", "English term 'deadline' in localized text"),
    (r"\bworkflows?\b", "English term 'workflow' in localized text"),
    (r"\bstakeholders?\b", "English term 'stakeholder' in localized text"),
    (r"\bonboarding\b", "English term 'onboarding' in localized text"),
    (r"\binsights?\b", "English term 'insight' in localized text"),
    (r"\bsoft\s+skills?\b", "English term 'soft skills' in localized text"),
    (r"\bbest\s+practices?\b", "English term 'best practice' in localized text"),
    (r"\bfollow-?ups?\b", "English term 'follow-up' in localized text"),
    (r"\bthe\s+\w+\s+(?:is|are|was|were)\b", "English sentence fragment in localized text"),
];

/// Template marker classes. Each class is reported at most once per text.
pub static TEMPLATE_MARKERS: &[(&str, &str)] = &[
    (r"\{\{[^{}]*\}\}", "unresolved {{placeholder}}"),
    (r"\$\{[^{}]*\}", "unresolved ${placeholder}"),
    (r"\b(?:TBD|TODO|FIXME)\b", "administrative marker (TBD/TODO/FIXME)"),
    (r"\[(?:\.\.\.|…)\]", "unresolved [...] marker"),
];
