//! Name normalization.
//!
//! Turns kind labels and surface strings into comparison-safe forms. The
//! text pipeline is fixed:
//! 1. trim and lower-case
//! 2. curly quotes to straight quotes
//! 3. drop periods
//! 4. everything but word characters, whitespace and `&` becomes a space
//! 5. split on whitespace
//! 6. Person: drop a leading honorific, then a trailing generational suffix
//! 7. Organization: drop trailing legal-entity suffixes, repeatedly
//!
//! Stripping never removes the last remaining token.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::EntityKind;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s&]").unwrap());

const HONORIFICS: &[&str] = &["mr", "mrs", "ms", "dr", "prof", "hon", "sir", "madam"];

const GENERATIONAL_SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv"];

const LEGAL_SUFFIXES: &[&str] = &[
    "inc",
    "incorporated",
    "llc",
    "llp",
    "lp",
    "ltd",
    "limited",
    "co",
    "corp",
    "corporation",
    "company",
    "plc",
    "gmbh",
    "ag",
    "sa",
];

/// Tokens skipped by [`acronym_of_significant`].
const CONNECTOR_WORDS: &[&str] = &["of", "the", "and", "for", "&", "de", "la"];

/// Canonicalize a kind label. Always returns a kind; missing or empty labels
/// become [`EntityKind::Other`].
pub fn normalize_kind(raw_kind: Option<&str>) -> EntityKind {
    EntityKind::from_label(raw_kind)
}

/// Normalize a display string for comparison, optionally kind-aware.
pub fn normalize_text(raw_value: &str, kind: Option<&EntityKind>) -> String {
    let lowered = raw_value
        .trim()
        .to_lowercase()
        .replace(['\u{201c}', '\u{201d}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace('.', "");
    let cleaned = NON_WORD.replace_all(&lowered, " ");

    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();

    match kind {
        Some(EntityKind::Person) => {
            if tokens.len() > 1 && HONORIFICS.contains(&tokens[0]) {
                tokens.remove(0);
            }
            if tokens.len() > 1 && tokens.last().is_some_and(|t| GENERATIONAL_SUFFIXES.contains(t)) {
                tokens.pop();
            }
        }
        Some(EntityKind::Organization) => {
            while tokens.len() > 1 && tokens.last().is_some_and(|t| LEGAL_SUFFIXES.contains(t)) {
                tokens.pop();
            }
        }
        _ => {}
    }

    tokens.join(" ")
}

/// Normalized text with all whitespace removed.
pub fn compact(normalized: &str) -> String {
    normalized.split_whitespace().collect()
}

/// First alphabetic character of each alphanumeric token, upper-cased.
/// Purely numeric tokens are ignored.
///
/// ```
/// use brief_core::normalize::acronym_of;
///
/// assert_eq!(acronym_of("Federal Bureau of Investigation"), "FBOI");
/// assert_eq!(acronym_of("Route 66 Diner"), "RD");
/// ```
pub fn acronym_of(name: &str) -> String {
    acronym_from_tokens(name.split_whitespace())
}

/// Like [`acronym_of`], but skips short connector words ("of", "the", "and").
pub fn acronym_of_significant(name: &str) -> String {
    acronym_from_tokens(
        name.split_whitespace()
            .filter(|t| !CONNECTOR_WORDS.contains(&t.to_lowercase().as_str())),
    )
}

fn acronym_from_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for token in tokens {
        if !token.chars().any(char::is_alphanumeric) {
            continue;
        }
        if let Some(first) = token.chars().find(|c| c.is_alphabetic()) {
            out.extend(first.to_uppercase());
        }
    }
    out
}

/// Whether a display name itself reads as an acronym: 2-6 alphanumeric
/// characters, at least two of them letters, every letter upper-case
/// ("FBI", "F.B.I.", "G7A"). "G20" and "3M" carry a single letter and do not
/// qualify.
pub fn looks_like_acronym(display: &str) -> bool {
    let alnum: Vec<char> = display.chars().filter(|c| c.is_alphanumeric()).collect();
    if !(2..=6).contains(&alnum.len()) {
        return false;
    }
    let letters: Vec<&char> = alnum.iter().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase())
}

/// The letters of an acronym-looking display name ("F.B.I." -> "FBI").
pub fn acronym_letters(display: &str) -> String {
    display
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_normalization() {
        assert_eq!(normalize_text("  Jane   Doe ", None), "jane doe");
        assert_eq!(normalize_text("J. Doe", None), "j doe");
        assert_eq!(normalize_text("DOE, Jane", None), "doe jane");
        assert_eq!(normalize_text("AT&T", None), "at&t");
        assert_eq!(normalize_text("U.S.", None), "us");
    }

    #[test]
    fn test_curly_quotes_become_separators() {
        assert_eq!(normalize_text("O\u{2019}Brien", None), "o brien");
        assert_eq!(normalize_text("O'Brien", None), "o brien");
        assert_eq!(normalize_text("\u{201c}Acme\u{201d}", None), "acme");
    }

    #[test]
    fn test_person_honorific_and_suffix() {
        let person = EntityKind::Person;
        assert_eq!(normalize_text("Dr. Jane Doe", Some(&person)), "jane doe");
        assert_eq!(normalize_text("Martin Luther King Jr.", Some(&person)), "martin luther king");
        assert_eq!(normalize_text("Mr. John Smith III", Some(&person)), "john smith");
        // Only one leading honorific is removed.
        assert_eq!(normalize_text("Hon. Dr. Lee", Some(&person)), "dr lee");
    }

    #[test]
    fn test_person_rules_need_person_kind() {
        assert_eq!(normalize_text("Dr. Jane Doe", None), "dr jane doe");
        assert_eq!(
            normalize_text("Dr. Jane Doe", Some(&EntityKind::Organization)),
            "dr jane doe"
        );
    }

    #[test]
    fn test_stripping_keeps_last_token() {
        assert_eq!(normalize_text("Sir", Some(&EntityKind::Person)), "sir");
        assert_eq!(normalize_text("Inc.", Some(&EntityKind::Organization)), "inc");
    }

    #[test]
    fn test_org_legal_suffixes_repeated() {
        let org = EntityKind::Organization;
        assert_eq!(normalize_text("Acme, Inc.", Some(&org)), "acme");
        assert_eq!(normalize_text("Acme Holdings Co. Ltd.", Some(&org)), "acme holdings");
        assert_eq!(normalize_text("Ford Motor Company", Some(&org)), "ford motor");
        assert_eq!(normalize_text("Acme Inc", None), "acme inc");
    }

    #[test]
    fn test_deterministic() {
        let a = normalize_text("Dr. José  Álvarez Jr.", Some(&EntityKind::Person));
        let b = normalize_text("Dr. José  Álvarez Jr.", Some(&EntityKind::Person));
        assert_eq!(a, b);
        assert_eq!(a, "josé álvarez");
    }

    #[test]
    fn test_compact() {
        assert_eq!(compact("new york city"), "newyorkcity");
        assert_eq!(compact(""), "");
    }

    #[test]
    fn test_acronyms() {
        assert_eq!(acronym_of("Federal Bureau of Investigation"), "FBOI");
        assert_eq!(acronym_of_significant("Federal Bureau of Investigation"), "FBI");
        assert_eq!(acronym_of("Route 66 Diner"), "RD");
        assert_eq!(acronym_of("2024"), "");
        assert_eq!(acronym_of("  "), "");
        assert_eq!(acronym_of("- ..."), "");
    }

    #[test]
    fn test_looks_like_acronym() {
        assert!(looks_like_acronym("FBI"));
        assert!(looks_like_acronym("F.B.I."));
        assert!(looks_like_acronym("G7A"));
        assert!(!looks_like_acronym("G20"));
        assert!(!looks_like_acronym("3M"));
        assert!(!looks_like_acronym("Fbi"));
        assert!(!looks_like_acronym("A"));
        assert!(!looks_like_acronym("ABCDEFG"));
        assert!(!looks_like_acronym("2020"));
        assert_eq!(acronym_letters("F.B.I."), "FBI");
    }
}
