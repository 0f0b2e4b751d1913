//! Entity canonicalization.
//!
//! Maps a mention to the key that decides cluster membership. Durable
//! identifiers win over text, in a fixed order: knowledge-graph id,
//! structured-data id, reference-article URL, then normalized display text.
//! Identifier-based and text-based keys are never unified implicitly.

use crate::error::SkipReason;
use crate::normalize::{normalize_kind, normalize_text};
use crate::types::{CanonicalKey, IdentityToken, RawEntityMention};

/// Trimmed, non-normalized display text of a mention. May be empty.
pub fn display_text(mention: &RawEntityMention) -> &str {
    mention.value.as_deref().map(str::trim).unwrap_or("")
}

/// Compute the canonical key of a mention.
///
/// Identifier fields that are present but blank count as absent. Fails with
/// `EmptyDisplay` when there is no display text, and with `NoUsableText`
/// when no identifier is present and the display text normalizes to
/// nothing.
pub fn canonical_key(mention: &RawEntityMention) -> Result<CanonicalKey, SkipReason> {
    let display = display_text(mention);
    if display.is_empty() {
        return Err(SkipReason::EmptyDisplay);
    }

    let kind = normalize_kind(mention.kind.as_deref());

    let identity = if let Some(mid) = non_blank(&mention.mid) {
        IdentityToken::Mid(mid.to_string())
    } else if let Some(qid) = non_blank(&mention.wikidata_id) {
        IdentityToken::Wikidata(qid.to_string())
    } else if let Some(url) = non_blank(&mention.wiki_url) {
        IdentityToken::Wiki(url.to_string())
    } else {
        let text = normalize_text(display, Some(&kind));
        if text.is_empty() {
            return Err(SkipReason::NoUsableText);
        }
        IdentityToken::Text(text)
    };

    Ok(CanonicalKey::new(kind, identity))
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
