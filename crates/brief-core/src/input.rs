//! Input boundary: heterogeneous extractor records to [`RawEntityMention`].
//!
//! Extractors disagree on record shape. Some nest the entity under an
//! `entity` object and keep counts/occurrences on the outer record; field
//! names vary (`value`/`name`, `mid`/`knowledge_graph_mid`, ...). This
//! module absorbs that variance so nothing downstream sees raw JSON.
//!
//! Each record yields `Ok(mention)` or `Err(SkipReason)`; one bad record
//! never affects its neighbours.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{BriefError, BriefResult, SkipReason};
use crate::types::{Occurrence, RawEntityMention};

const VALUE_FIELDS: &[&str] = &["value", "name"];
const MID_FIELDS: &[&str] = &["mid", "knowledge_graph_mid"];
const WIKIDATA_FIELDS: &[&str] = &["wikidata_id"];
const WIKI_FIELDS: &[&str] = &["wiki_url", "wikipedia_url"];
const COUNT_FIELDS: &[&str] = &["count", "mentions"];
const CONTEXT_FIELDS: &[&str] = &["context", "snippet", "content"];

/// A record left out at the boundary, by position in the input list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    pub index: usize,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: SkipReason,
}

fn serialize_reason<S: serde::Serializer>(reason: &SkipReason, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(reason)
}

/// Mentions accepted from one document's records, plus what was skipped.
#[derive(Debug, Clone, Default)]
pub struct ParsedMentions {
    pub mentions: Vec<RawEntityMention>,
    /// Input position of each accepted mention.
    pub positions: Vec<usize>,
    pub skipped: Vec<SkippedRecord>,
}

impl ParsedMentions {
    /// Total records seen.
    pub fn total(&self) -> usize {
        self.mentions.len() + self.skipped.len()
    }
}

/// Parse one raw extractor record.
pub fn parse_mention(record: &Value) -> Result<RawEntityMention, SkipReason> {
    let outer = record.as_object().ok_or(SkipReason::NotAnObject)?;
    let payload = match outer.get("entity") {
        Some(Value::Object(inner)) => inner,
        _ => outer,
    };

    let occurrences = match outer.get("occurrences").filter(|v| !v.is_null()) {
        Some(v) => parse_occurrences(v)?,
        None => match payload.get("occurrences") {
            Some(v) => parse_occurrences(v)?,
            None => Vec::new(),
        },
    };

    let count = match first_positive_count(outer)? {
        Some(n) if n > 0 => Some(n),
        outer_count => first_positive_count(payload)?.filter(|&n| n > 0).or(outer_count),
    };

    let relevance = match outer.get("relevance").or_else(|| payload.get("relevance")) {
        Some(v) => parse_relevance(v)?,
        None => None,
    };

    Ok(RawEntityMention {
        kind: string_field(payload, &["kind"])?,
        value: string_field(payload, VALUE_FIELDS)?,
        mid: string_field(payload, MID_FIELDS)?,
        wikidata_id: string_field(payload, WIKIDATA_FIELDS)?,
        wiki_url: string_field(payload, WIKI_FIELDS)?,
        count,
        occurrences,
        relevance,
    })
}

/// Parse one document's list of raw records.
///
/// Records reporting a relevance at or below `min_relevance` are skipped.
/// A payload that is not a JSON array is a caller error.
pub fn parse_document_mentions(records: &Value, min_relevance: f64) -> BriefResult<ParsedMentions> {
    let list = records.as_array().ok_or_else(|| {
        BriefError::invalid_shape(
            "entity records must be a JSON array",
            "pass the flattened list of entity records for one document",
        )
    })?;
    Ok(parse_mentions(list, min_relevance))
}

/// Parse a slice of raw records.
pub fn parse_mentions(records: &[Value], min_relevance: f64) -> ParsedMentions {
    let mut parsed = ParsedMentions::default();

    for (index, record) in records.iter().enumerate() {
        let outcome = parse_mention(record).and_then(|m| check_relevance(&m, min_relevance).map(|_| m));

        match outcome {
            Ok(mention) => {
                parsed.mentions.push(mention);
                parsed.positions.push(index);
            }
            Err(reason) => {
                debug!(index, reason = %reason, "Skipping entity record");
                parsed.skipped.push(SkippedRecord { index, reason });
            }
        }
    }

    parsed
}

/// First field among `names` holding something other than null or "".
fn first_present<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().filter_map(|n| obj.get(*n)).find(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    })
}

/// First positive value among the count fields; zero and empty values fall
/// through to the next field. `Some(0)` when only zeros were found.
fn first_positive_count(obj: &Map<String, Value>) -> Result<Option<u64>, SkipReason> {
    let mut seen = None;
    for value in COUNT_FIELDS.iter().filter_map(|n| obj.get(*n)) {
        if value.is_null() || value.as_str().is_some_and(|s| s.trim().is_empty()) {
            continue;
        }
        match parse_count(value)? {
            Some(n) if n > 0 => return Ok(Some(n)),
            other => seen = seen.or(other),
        }
    }
    Ok(seen)
}

/// Check a mention's relevance against the cutoff. Mentions without a
/// relevance value pass.
pub fn check_relevance(mention: &RawEntityMention, min_relevance: f64) -> Result<(), SkipReason> {
    match mention.relevance {
        Some(relevance) if relevance <= min_relevance => Err(SkipReason::BelowRelevance {
            relevance,
            cutoff: min_relevance,
        }),
        _ => Ok(()),
    }
}

fn string_field(
    obj: &Map<String, Value>,
    names: &'static [&'static str],
) -> Result<Option<String>, SkipReason> {
    match first_present(obj, names) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(SkipReason::malformed(names[0], format!("expected a string, got {}", type_name(other)))),
    }
}

fn parse_count(value: &Value) -> Result<Option<u64>, SkipReason> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                Ok(Some(v))
            } else {
                match n.as_f64() {
                    Some(f) if f >= 0.0 && f.fract() == 0.0 => Ok(Some(f as u64)),
                    _ => Err(SkipReason::malformed("count", format!("not a non-negative integer: {}", n))),
                }
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| SkipReason::malformed("count", format!("not a non-negative integer: {:?}", s))),
        other => Err(SkipReason::malformed("count", format!("expected a number, got {}", type_name(other)))),
    }
}

fn parse_relevance(value: &Value) -> Result<Option<f64>, SkipReason> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| SkipReason::malformed("relevance", format!("not a number: {:?}", s))),
        other => Err(SkipReason::malformed("relevance", format!("expected a number, got {}", type_name(other)))),
    }
}

fn parse_occurrences(value: &Value) -> Result<Vec<Occurrence>, SkipReason> {
    let entries = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(entries) => entries,
        other => {
            return Err(SkipReason::malformed(
                "occurrences",
                format!("expected an array, got {}", type_name(other)),
            ))
        }
    };

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let obj = entry
                .as_object()
                .ok_or_else(|| SkipReason::malformed("occurrences", format!("entry {} is not an object", i)))?;
            // Only integer pages count; anything else means "no page".
            let page = obj
                .get("page")
                .and_then(Value::as_u64)
                .and_then(|p| u32::try_from(p).ok());
            Ok(Occurrence {
                page,
                context: string_field(obj, CONTEXT_FIELDS)?,
            })
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
