//! The serializable brief handed to renderers.

use brief_core::{BriefResult, CooccurrenceEdge, CooccurrenceMode, DuplicateSuggestion, EntityCluster};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::outcome::{FailedDocument, SkippedDocument};

/// Run-level summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub version: String,
    pub runtime_seconds: f64,
    /// Documents handed over by the fetch layer, whatever their outcome.
    pub docs_processed: usize,
    /// Sum of reported page counts over those documents.
    pub pages_processed: u64,
    pub unique_entities: usize,
    pub mentions_skipped: usize,
    pub generated_at: DateTime<Utc>,
}

/// A complete entity brief.
#[derive(Debug, Clone, Serialize)]
pub struct BriefReport {
    pub run: RunSummary,
    pub top_entities: Vec<EntityCluster>,
    pub entities: Vec<EntityCluster>,
    pub edges: Vec<CooccurrenceEdge>,
    /// `None` when co-occurrence was disabled for the run.
    pub cooccurrence_mode: Option<CooccurrenceMode>,
    pub duplicates: Vec<DuplicateSuggestion>,
    pub skipped: Vec<SkippedDocument>,
    pub failures: Vec<FailedDocument>,
}

impl BriefReport {
    /// Compact JSON, suitable for embedding in a page.
    pub fn to_json(&self) -> BriefResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON.
    pub fn to_json_pretty(&self) -> BriefResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Whether every document was fetched successfully.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
