//! Cluster state and its emitted view.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::AggregationConfig;
use crate::types::{CanonicalKey, DocId, DocumentMeta, EntityKind};

/// Evidence gathered for one cluster inside one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentTally {
    /// Mentions contributed by this document.
    pub count: u64,
    /// Every page the entity was seen on.
    pub pages: BTreeSet<u32>,
    /// Context samples, first-seen, capped.
    pub samples: Vec<String>,
}

/// Aggregated record for one canonical key across all documents of a run.
#[derive(Debug, Clone)]
pub struct Cluster {
    key: CanonicalKey,
    /// Display strings with frequency, in first-seen order.
    display_names: Vec<(String, u64)>,
    aliases: BTreeSet<String>,
    total_mentions: u64,
    docs: BTreeMap<DocId, DocumentTally>,
}

impl Cluster {
    pub(crate) fn new(key: CanonicalKey) -> Self {
        Self {
            key,
            display_names: Vec::new(),
            aliases: BTreeSet::new(),
            total_mentions: 0,
            docs: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> &CanonicalKey {
        &self.key
    }

    pub fn kind(&self) -> &EntityKind {
        &self.key.kind
    }

    pub fn total_mentions(&self) -> u64 {
        self.total_mentions
    }

    /// Number of distinct documents contributing to this cluster.
    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    pub fn aliases(&self) -> &BTreeSet<String> {
        &self.aliases
    }

    pub fn documents(&self) -> &BTreeMap<DocId, DocumentTally> {
        &self.docs
    }

    /// Most frequent display string; ties go to the first seen. Falls back
    /// to the tagged identity token when nothing was recorded.
    pub fn display_name(&self) -> String {
        let mut best: Option<&(String, u64)> = None;
        for entry in &self.display_names {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(name, _)| name.clone())
            .unwrap_or_else(|| self.key.identity.to_string())
    }

    pub(crate) fn record_display(&mut self, display: &str) {
        match self.display_names.iter_mut().find(|(name, _)| name == display) {
            Some(entry) => entry.1 += 1,
            None => self.display_names.push((display.to_string(), 1)),
        }
        if !self.aliases.contains(display) {
            self.aliases.insert(display.to_string());
        }
    }

    pub(crate) fn add_mentions(&mut self, count: u64) {
        self.total_mentions = self.total_mentions.saturating_add(count);
    }

    /// Tally for a document, created on first contact.
    pub(crate) fn tally_mut(&mut self, doc_id: DocId) -> &mut DocumentTally {
        self.docs.entry(doc_id).or_default()
    }

    /// Build the emitted view.
    pub(crate) fn to_view(
        &self,
        documents: &BTreeMap<DocId, DocumentMeta>,
        config: &AggregationConfig,
    ) -> EntityCluster {
        let mut docs: Vec<DocumentEvidence> = self
            .docs
            .iter()
            .map(|(doc_id, tally)| {
                let meta = documents
                    .get(doc_id)
                    .cloned()
                    .unwrap_or_else(|| DocumentMeta::new(*doc_id));
                DocumentEvidence {
                    doc_id: *doc_id,
                    title: meta.title,
                    url: meta.url,
                    count: tally.count,
                    pages: tally
                        .pages
                        .iter()
                        .copied()
                        .take(config.max_pages_per_document)
                        .collect(),
                    samples: tally.samples.clone(),
                }
            })
            .collect();
        docs.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        docs.truncate(config.max_documents_per_cluster);

        EntityCluster {
            key: self.key.clone(),
            kind: self.key.kind.clone(),
            name: self.display_name(),
            aliases: self.aliases.iter().take(config.max_aliases).cloned().collect(),
            total_mentions: self.total_mentions,
            doc_count: self.doc_count(),
            docs,
        }
    }
}

/// One document's entry in a cluster's emitted view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentEvidence {
    pub doc_id: DocId,
    pub title: String,
    pub url: String,
    pub count: u64,
    pub pages: Vec<u32>,
    pub samples: Vec<String>,
}

/// Finalized, emitted view of a cluster.
///
/// `doc_count` always reflects every contributing document, even when
/// `docs` is capped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityCluster {
    pub key: CanonicalKey,
    pub kind: EntityKind,
    pub name: String,
    pub aliases: Vec<String>,
    pub total_mentions: u64,
    pub doc_count: usize,
    pub docs: Vec<DocumentEvidence>,
}
