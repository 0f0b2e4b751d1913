//! Per-document results handed over by the fetch layer.

use brief_core::{DocId, DocumentMeta};
use serde::{Deserialize, Serialize};

/// What happened when the fetch layer asked for one document's entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    /// Entity records were returned. `records` should be a JSON array.
    Fetched {
        meta: DocumentMeta,
        records: serde_json::Value,
    },
    /// Nothing to process, e.g. "no entities (404)".
    Skipped { meta: DocumentMeta, reason: String },
    /// The fetch failed outright.
    Failed { meta: DocumentMeta, error: String },
}

impl DocumentOutcome {
    pub fn fetched(meta: DocumentMeta, records: serde_json::Value) -> Self {
        Self::Fetched { meta, records }
    }

    pub fn skipped(meta: DocumentMeta, reason: impl Into<String>) -> Self {
        Self::Skipped {
            meta,
            reason: reason.into(),
        }
    }

    pub fn failed(meta: DocumentMeta, error: impl Into<String>) -> Self {
        Self::Failed {
            meta,
            error: error.into(),
        }
    }

    pub fn meta(&self) -> &DocumentMeta {
        match self {
            Self::Fetched { meta, .. } | Self::Skipped { meta, .. } | Self::Failed { meta, .. } => meta,
        }
    }

    pub fn doc_id(&self) -> DocId {
        self.meta().id
    }
}

/// A document that contributed nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedDocument {
    pub doc_id: DocId,
    pub title: String,
    pub url: String,
    pub reason: String,
}

impl SkippedDocument {
    pub(crate) fn new(meta: DocumentMeta, reason: impl Into<String>) -> Self {
        Self {
            doc_id: meta.id,
            title: meta.title,
            url: meta.url,
            reason: reason.into(),
        }
    }
}

/// A document whose entities could not be used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedDocument {
    pub doc_id: DocId,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_json() {
        let raw = serde_json::json!({
            "status": "skipped",
            "meta": {"id": 4, "title": "Scan"},
            "reason": "no entities (404)"
        });
        let outcome: DocumentOutcome = serde_json::from_value(raw).unwrap();
        assert_eq!(outcome.doc_id(), 4);
        assert!(matches!(outcome, DocumentOutcome::Skipped { ref reason, .. } if reason == "no entities (404)"));
    }

    #[test]
    fn test_failed_keeps_meta() {
        let outcome = DocumentOutcome::failed(DocumentMeta::new(9).with_page_count(6), "timeout");
        assert_eq!(outcome.doc_id(), 9);
        assert_eq!(outcome.meta().page_count, 6);

        let raw = serde_json::json!({
            "status": "failed",
            "meta": {"id": 9, "title": "Ledger", "page_count": 6},
            "error": "timeout"
        });
        let parsed: DocumentOutcome = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.meta().title, "Ledger");
        assert_eq!(parsed.meta().page_count, 6);
    }
}
