//! Co-occurrence graph construction.
//!
//! Pairs clusters that appear in the same scope. When any document carries
//! page data the scope is a (document, page); otherwise it is a whole
//! document. The two modes never mix within a run.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use strum::{Display, EnumString};
use tracing::info;

use crate::aggregate::{DocumentScope, EntityCluster};
use crate::config::CooccurrenceConfig;
use crate::types::{CanonicalKey, DocId};

/// Granularity the graph was computed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CooccurrenceMode {
    Page,
    Document,
}

/// A (document, page) location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PageRef {
    pub doc_id: DocId,
    pub page: u32,
}

/// Undirected relationship between two clusters. `a_key < b_key`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CooccurrenceEdge {
    pub a_key: CanonicalKey,
    pub b_key: CanonicalKey,
    pub a_name: String,
    pub b_name: String,
    /// Distinct documents the pair shared a scope in.
    pub doc_count: usize,
    /// Distinct (document, page) locations; zero in document mode.
    pub page_count: usize,
    /// First-seen example locations; empty in document mode.
    pub examples: Vec<PageRef>,
}

/// Ranked, capped edge list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CooccurrenceGraph {
    pub mode: CooccurrenceMode,
    pub edges: Vec<CooccurrenceEdge>,
}

impl CooccurrenceGraph {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[derive(Debug, Default)]
struct PairStats {
    docs: BTreeSet<DocId>,
    locations: BTreeSet<PageRef>,
    examples: Vec<PageRef>,
}

/// Pair accumulator with first-seen iteration order.
#[derive(Default)]
struct PairTable {
    pairs: Vec<((CanonicalKey, CanonicalKey), PairStats)>,
    index: HashMap<(CanonicalKey, CanonicalKey), usize>,
}

impl PairTable {
    fn entry(&mut self, a: &CanonicalKey, b: &CanonicalKey) -> &mut PairStats {
        let pair = if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        };
        let slot = match self.index.get(&pair) {
            Some(&slot) => slot,
            None => {
                self.index.insert(pair.clone(), self.pairs.len());
                self.pairs.push((pair, PairStats::default()));
                self.pairs.len() - 1
            }
        };
        &mut self.pairs[slot].1
    }
}

/// Builds the co-occurrence graph from aggregated document scopes.
pub struct CooccurrenceBuilder {
    config: CooccurrenceConfig,
}

impl CooccurrenceBuilder {
    pub fn new(config: CooccurrenceConfig) -> Self {
        Self { config }
    }

    /// Build the graph.
    ///
    /// `clusters` supplies display names and the total-mention ranking used
    /// when a page holds more keys than the scope limit.
    pub fn build(&self, scopes: &[DocumentScope], clusters: &[EntityCluster]) -> CooccurrenceGraph {
        let lookup: HashMap<&CanonicalKey, &EntityCluster> =
            clusters.iter().map(|c| (&c.key, c)).collect();

        let page_mode = scopes.iter().any(DocumentScope::has_pages);
        let (mode, table) = if page_mode {
            (CooccurrenceMode::Page, self.page_pairs(scopes, &lookup))
        } else {
            (CooccurrenceMode::Document, self.document_pairs(scopes))
        };

        let mut edges: Vec<CooccurrenceEdge> = table
            .pairs
            .into_iter()
            .map(|((a, b), stats)| {
                let name = |k: &CanonicalKey| {
                    lookup
                        .get(k)
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| k.identity.to_string())
                };
                CooccurrenceEdge {
                    a_name: name(&a),
                    b_name: name(&b),
                    a_key: a,
                    b_key: b,
                    doc_count: stats.docs.len(),
                    page_count: stats.locations.len(),
                    examples: stats.examples,
                }
            })
            .collect();

        match mode {
            CooccurrenceMode::Page => edges.sort_by(|x, y| {
                y.page_count
                    .cmp(&x.page_count)
                    .then_with(|| y.doc_count.cmp(&x.doc_count))
                    .then_with(|| x.a_name.cmp(&y.a_name))
                    .then_with(|| x.b_name.cmp(&y.b_name))
                    .then_with(|| x.a_key.cmp(&y.a_key))
                    .then_with(|| x.b_key.cmp(&y.b_key))
            }),
            // Stable: equal counts keep first-seen pair order.
            CooccurrenceMode::Document => edges.sort_by(|x, y| y.doc_count.cmp(&x.doc_count)),
        }
        let total = edges.len();
        edges.truncate(self.config.max_edges);

        info!(mode = %mode, pairs = total, kept = edges.len(), "Built co-occurrence graph");
        CooccurrenceGraph { mode, edges }
    }

    fn page_pairs(
        &self,
        scopes: &[DocumentScope],
        lookup: &HashMap<&CanonicalKey, &EntityCluster>,
    ) -> PairTable {
        let mut table = PairTable::default();
        let mentions = |k: &CanonicalKey| lookup.get(k).map_or(0, |c| c.total_mentions);

        for scope in scopes {
            for (&page, keys) in &scope.pages {
                let mut ranked: Vec<&CanonicalKey> = keys.iter().collect();
                ranked.sort_by(|a, b| mentions(*b).cmp(&mentions(*a)).then_with(|| a.cmp(b)));
                ranked.truncate(self.config.max_keys_per_scope);

                let location = PageRef {
                    doc_id: scope.doc_id,
                    page,
                };
                for (i, a) in ranked.iter().enumerate() {
                    for b in &ranked[i + 1..] {
                        let stats = table.entry(a, b);
                        stats.docs.insert(scope.doc_id);
                        stats.locations.insert(location);
                        if stats.examples.len() < self.config.max_example_locations
                            && !stats.examples.contains(&location)
                        {
                            stats.examples.push(location);
                        }
                    }
                }
            }
        }
        table
    }

    fn document_pairs(&self, scopes: &[DocumentScope]) -> PairTable {
        let mut table = PairTable::default();
        for scope in scopes {
            let keys = &scope.keys[..scope.keys.len().min(self.config.max_keys_per_scope)];
            for (i, a) in keys.iter().enumerate() {
                for b in &keys[i + 1..] {
                    table.entry(a, b).docs.insert(scope.doc_id);
                }
            }
        }
        table
    }
}
