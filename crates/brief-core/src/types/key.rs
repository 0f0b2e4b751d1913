//! Canonical identity keys.

use serde::{Serialize, Serializer};
use std::fmt;

use super::kind::EntityKind;

/// Identity part of a canonical key, in precedence order.
///
/// The variant doubles as a type tag, so identifiers from different systems
/// never collide even when their raw values are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentityToken {
    /// Knowledge-graph machine id.
    Mid(String),
    /// Structured-data (Wikidata) id.
    Wikidata(String),
    /// Reference-article URL.
    Wiki(String),
    /// Normalized surface text.
    Text(String),
}

impl IdentityToken {
    /// The raw value without its type tag.
    pub fn value(&self) -> &str {
        match self {
            Self::Mid(v) | Self::Wikidata(v) | Self::Wiki(v) | Self::Text(v) => v,
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            Self::Mid(_) => "mid",
            Self::Wikidata(_) => "wikidata",
            Self::Wiki(_) => "wiki",
            Self::Text(_) => "v",
        }
    }
}

impl fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix(), self.value())
    }
}

/// An ordered (kind, identity) pair deciding whether two mentions are the
/// same entity. Kind is part of the key: identical text under different
/// kinds is never merged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey {
    pub kind: EntityKind,
    pub identity: IdentityToken,
}

impl CanonicalKey {
    pub fn new(kind: EntityKind, identity: IdentityToken) -> Self {
        Self { kind, identity }
    }
}

/// Rendered as `Kind::token`, e.g. `Person::mid:/m/0abc`.
impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.kind, self.identity)
    }
}

impl Serialize for CanonicalKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert_eq!(IdentityToken::Mid("/m/01".into()).to_string(), "mid:/m/01");
        assert_eq!(IdentityToken::Wikidata("Q42".into()).to_string(), "wikidata:Q42");
        assert_eq!(
            IdentityToken::Wiki("https://en.wikipedia.org/wiki/X".into()).to_string(),
            "wiki:https://en.wikipedia.org/wiki/X"
        );
        assert_eq!(IdentityToken::Text("jane doe".into()).to_string(), "v:jane doe");
    }

    #[test]
    fn test_same_raw_value_different_system_differs() {
        let a = CanonicalKey::new(EntityKind::Person, IdentityToken::Mid("42".into()));
        let b = CanonicalKey::new(EntityKind::Person, IdentityToken::Wikidata("42".into()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_serializes_as_string() {
        let key = CanonicalKey::new(EntityKind::Organization, IdentityToken::Text("acme".into()));
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"Organization::v:acme\"");
    }
}
