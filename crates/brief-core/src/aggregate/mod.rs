//! Cross-document cluster aggregation.
//!
//! Folds every accepted mention into a cluster keyed by its canonical key,
//! accumulating mention counts, per-document page/sample evidence and
//! aliases. Alongside the clusters it records, per document, which keys were
//! seen where; those scopes feed the co-occurrence builder.
//!
//! Ingestion is best-effort per record: a mention that cannot be clustered
//! yields a [`SkipReason`] and the rest of the document carries on.

mod cluster;

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

use crate::canonical::{canonical_key, display_text};
use crate::config::AggregationConfig;
use crate::error::SkipReason;
use crate::input::{check_relevance, ParsedMentions, SkippedRecord};
use crate::types::{CanonicalKey, DocId, DocumentMeta, RawEntityMention};

pub use cluster::{Cluster, DocumentEvidence, DocumentTally, EntityCluster};

/// Occurrences per mention inspected for context samples.
const SAMPLE_OCCURRENCES_PER_MENTION: usize = 5;

/// Where keys were seen inside one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentScope {
    pub doc_id: DocId,
    /// Distinct keys in first-seen order.
    pub keys: Vec<CanonicalKey>,
    /// Keys seen on each page.
    pub pages: BTreeMap<u32, BTreeSet<CanonicalKey>>,
}

impl DocumentScope {
    fn new(doc_id: DocId) -> Self {
        Self {
            doc_id,
            keys: Vec::new(),
            pages: BTreeMap::new(),
        }
    }

    /// Whether any page-level data was recorded.
    pub fn has_pages(&self) -> bool {
        !self.pages.is_empty()
    }
}

/// Outcome of ingesting one document.
#[derive(Debug, Clone, Default)]
pub struct DocumentIngest {
    pub doc_id: DocId,
    pub accepted: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Run-wide ingestion counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub documents: usize,
    pub mentions_seen: usize,
    pub mentions_accepted: usize,
    pub mentions_skipped: usize,
    /// Skips caused by malformed records rather than empty signal.
    pub mentions_malformed: usize,
    pub skipped_by_reason: BTreeMap<&'static str, usize>,
}

impl IngestStats {
    fn record_skip(&mut self, reason: &SkipReason) {
        self.mentions_seen += 1;
        self.mentions_skipped += 1;
        if reason.is_malformed() {
            self.mentions_malformed += 1;
        }
        *self.skipped_by_reason.entry(reason.label()).or_insert(0) += 1;
    }

    fn record_accept(&mut self) {
        self.mentions_seen += 1;
        self.mentions_accepted += 1;
    }
}

/// Folds per-document mentions into cross-document clusters.
pub struct ClusterAggregator {
    config: AggregationConfig,
    min_relevance: Option<f64>,
    clusters: Vec<Cluster>,
    index: HashMap<CanonicalKey, usize>,
    documents: BTreeMap<DocId, DocumentMeta>,
    scopes: Vec<DocumentScope>,
    scope_index: HashMap<DocId, usize>,
    stats: IngestStats,
}

impl ClusterAggregator {
    /// Create an empty aggregator.
    pub fn new(config: AggregationConfig) -> Self {
        Self {
            config,
            min_relevance: None,
            clusters: Vec::new(),
            index: HashMap::new(),
            documents: BTreeMap::new(),
            scopes: Vec::new(),
            scope_index: HashMap::new(),
            stats: IngestStats::default(),
        }
    }

    /// Skip mentions whose reported relevance is at or below `cutoff`.
    pub fn with_relevance_cutoff(mut self, cutoff: f64) -> Self {
        self.min_relevance = Some(cutoff);
        self
    }

    /// Ingest one document's mentions in the order received.
    pub fn ingest_document(&mut self, meta: DocumentMeta, mentions: &[RawEntityMention]) -> DocumentIngest {
        let doc_id = meta.id;
        self.register_document(meta);

        let mut outcome = DocumentIngest {
            doc_id,
            ..Default::default()
        };
        for (index, mention) in mentions.iter().enumerate() {
            match self.ingest_mention(doc_id, mention) {
                Ok(_) => outcome.accepted += 1,
                Err(reason) => {
                    debug!(doc_id, index, reason = %reason, "Skipping mention");
                    outcome.skipped.push(SkippedRecord { index, reason });
                }
            }
        }

        debug!(
            doc_id,
            accepted = outcome.accepted,
            skipped = outcome.skipped.len(),
            "Ingested document"
        );
        outcome
    }

    /// Ingest mentions that went through the input boundary, counting the
    /// records it already skipped. Skip indices refer to the raw record list.
    pub fn ingest_parsed(&mut self, meta: DocumentMeta, parsed: &ParsedMentions) -> DocumentIngest {
        for skipped in &parsed.skipped {
            self.stats.record_skip(&skipped.reason);
        }
        let mut outcome = self.ingest_document(meta, &parsed.mentions);
        for skipped in &mut outcome.skipped {
            if let Some(&raw_index) = parsed.positions.get(skipped.index) {
                skipped.index = raw_index;
            }
        }
        outcome.skipped.extend(parsed.skipped.iter().cloned());
        outcome.skipped.sort_by_key(|s| s.index);
        outcome
    }

    /// Fold a single mention into its cluster.
    ///
    /// Documents not yet registered get placeholder metadata.
    pub fn ingest_mention(
        &mut self,
        doc_id: DocId,
        mention: &RawEntityMention,
    ) -> Result<CanonicalKey, SkipReason> {
        if !self.scope_index.contains_key(&doc_id) {
            self.register_document(DocumentMeta::new(doc_id));
        }

        let checked = match self.min_relevance {
            Some(cutoff) => check_relevance(mention, cutoff),
            None => Ok(()),
        };
        let key = match checked.and_then(|_| canonical_key(mention)) {
            Ok(key) => key,
            Err(reason) => {
                self.stats.record_skip(&reason);
                return Err(reason);
            }
        };
        let display = display_text(mention);
        let count = mention.mention_count();

        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                self.clusters.push(Cluster::new(key.clone()));
                self.index.insert(key.clone(), self.clusters.len() - 1);
                self.clusters.len() - 1
            }
        };

        let max_samples = self.config.max_samples_per_document;
        let max_chars = self.config.max_sample_chars;

        let cluster = &mut self.clusters[slot];
        cluster.record_display(display);
        cluster.add_mentions(count);

        let tally = cluster.tally_mut(doc_id);
        tally.count = tally.count.saturating_add(count);
        for occurrence in &mention.occurrences {
            if let Some(page) = occurrence.page {
                tally.pages.insert(page);
            }
        }
        let snippets = mention
            .occurrences
            .iter()
            .filter_map(|o| o.context.as_deref())
            .filter(|s| !s.trim().is_empty())
            .take(SAMPLE_OCCURRENCES_PER_MENTION);
        for snippet in snippets {
            if tally.samples.len() >= max_samples {
                break;
            }
            tally.samples.push(snippet.chars().take(max_chars).collect());
        }

        let scope = &mut self.scopes[self.scope_index[&doc_id]];
        if !scope.keys.contains(&key) {
            scope.keys.push(key.clone());
        }
        for page in mention.occurrences.iter().filter_map(|o| o.page) {
            scope.pages.entry(page).or_default().insert(key.clone());
        }

        self.stats.record_accept();
        Ok(key)
    }

    fn register_document(&mut self, meta: DocumentMeta) {
        let doc_id = meta.id;
        if !self.scope_index.contains_key(&doc_id) {
            self.scope_index.insert(doc_id, self.scopes.len());
            self.scopes.push(DocumentScope::new(doc_id));
            self.stats.documents += 1;
        }
        // Real metadata replaces a placeholder registered earlier.
        self.documents.insert(doc_id, meta);
    }

    /// Clusters in creation order.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Look up a cluster by key.
    pub fn cluster(&self, key: &CanonicalKey) -> Option<&Cluster> {
        self.index.get(key).map(|&slot| &self.clusters[slot])
    }

    /// Per-document key scopes in ingestion order.
    pub fn scopes(&self) -> &[DocumentScope] {
        &self.scopes
    }

    /// Registered document metadata.
    pub fn documents(&self) -> &BTreeMap<DocId, DocumentMeta> {
        &self.documents
    }

    /// Ingestion counters so far.
    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// Emit the ranked cluster list.
    ///
    /// Order: most documents first, then most mentions, then display name
    /// (case-insensitive), then key.
    pub fn finalize(&self) -> Vec<EntityCluster> {
        let mut views: Vec<EntityCluster> = self
            .clusters
            .iter()
            .map(|c| c.to_view(&self.documents, &self.config))
            .collect();

        views.sort_by(|a, b| {
            b.doc_count
                .cmp(&a.doc_count)
                .then_with(|| b.total_mentions.cmp(&a.total_mentions))
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
                .then_with(|| a.key.cmp(&b.key))
        });

        info!(
            clusters = views.len(),
            documents = self.stats.documents,
            accepted = self.stats.mentions_accepted,
            skipped = self.stats.mentions_skipped,
            "Finalized entity clusters"
        );
        views
    }
}
