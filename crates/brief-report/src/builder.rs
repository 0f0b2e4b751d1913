//! Turns fetch-layer outcomes into a [`BriefReport`].

use std::time::Instant;

use brief_core::{parse_document_mentions, BriefConfig, BriefEngine, BriefResult, DocumentMeta, ParsedMentions};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::outcome::{DocumentOutcome, FailedDocument, SkippedDocument};
use crate::report::{BriefReport, RunSummary};

/// Reason recorded for a fetched document with an empty record list.
pub const NO_ENTITIES: &str = "no entities";

/// Builds one report per run.
pub struct ReportBuilder {
    config: BriefConfig,
    run_id: Option<String>,
    started: Instant,
}

impl ReportBuilder {
    /// Start a run. Runtime is measured from here.
    pub fn new(config: BriefConfig) -> Self {
        Self {
            config,
            run_id: None,
            started: Instant::now(),
        }
    }

    /// Use a caller-supplied run id instead of a fresh UUID.
    pub fn run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    /// Run the engine over every fetched document and assemble the report.
    ///
    /// A document whose payload is not a record array is reported as a
    /// failure; the run carries on. Document and page totals cover every
    /// outcome, whether fetched, skipped or failed.
    pub fn build(self, outcomes: Vec<DocumentOutcome>) -> BriefResult<BriefReport> {
        let engine = BriefEngine::new(self.config.clone())?;
        let min_relevance = self.config.input.min_relevance;

        let mut parsed: Vec<(DocumentMeta, ParsedMentions)> = Vec::new();
        let mut skipped = Vec::new();
        let mut failures = Vec::new();
        let docs_processed = outcomes.len();
        let mut pages_processed = 0u64;

        for outcome in outcomes {
            pages_processed += u64::from(outcome.meta().page_count);
            match outcome {
                DocumentOutcome::Fetched { meta, records } => {
                    if records.as_array().is_some_and(|r| r.is_empty()) {
                        skipped.push(SkippedDocument::new(meta, NO_ENTITIES));
                        continue;
                    }
                    match parse_document_mentions(&records, min_relevance) {
                        Ok(mentions) => parsed.push((meta, mentions)),
                        Err(e) => {
                            warn!(doc_id = meta.id, error = %e, "Unusable entity payload");
                            failures.push(FailedDocument {
                                doc_id: meta.id,
                                error: e.to_string(),
                            });
                        }
                    }
                }
                DocumentOutcome::Skipped { meta, reason } => skipped.push(SkippedDocument::new(meta, reason)),
                DocumentOutcome::Failed { meta, error } => failures.push(FailedDocument { doc_id: meta.id, error }),
            }
        }

        let output = engine.run_parsed(&parsed);

        let run = RunSummary {
            run_id: self.run_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            runtime_seconds: self.started.elapsed().as_secs_f64(),
            docs_processed,
            pages_processed,
            unique_entities: output.clusters.len(),
            mentions_skipped: output.stats.mentions_skipped,
            generated_at: Utc::now(),
        };

        info!(
            run_id = %run.run_id,
            docs = run.docs_processed,
            entities = run.unique_entities,
            skipped_docs = skipped.len(),
            failed_docs = failures.len(),
            "Built entity brief report"
        );

        let report_config = &self.config.report;
        let top_entities = output.top(report_config.top_view_len()).to_vec();
        let (cooccurrence_mode, edges) = match output.graph {
            Some(graph) => (Some(graph.mode), graph.edges),
            None => (None, Vec::new()),
        };

        Ok(BriefReport {
            run,
            top_entities,
            entities: output.clusters.into_iter().take(report_config.max_entities).collect(),
            edges,
            cooccurrence_mode,
            duplicates: output.duplicates,
            skipped,
            failures,
        })
    }
}
