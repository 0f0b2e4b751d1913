//! Run-level engine wiring the pipeline stages together.
//!
//! One `BriefEngine::run` call processes one run's documents sequentially
//! and owns every intermediate structure. Engines hold only configuration,
//! so differently configured runs can share a process.

use serde::Serialize;
use tracing::info;

use crate::aggregate::{ClusterAggregator, EntityCluster, IngestStats};
use crate::config::BriefConfig;
use crate::cooccurrence::{CooccurrenceBuilder, CooccurrenceGraph};
use crate::duplicates::{DuplicateDetector, DuplicateSuggestion};
use crate::error::BriefResult;
use crate::input::ParsedMentions;
use crate::types::{DocumentEntities, DocumentMeta};

/// Everything a run produces.
#[derive(Debug, Clone, Serialize)]
pub struct BriefOutput {
    /// Clusters in rank order.
    pub clusters: Vec<EntityCluster>,
    /// `None` when co-occurrence is disabled.
    pub graph: Option<CooccurrenceGraph>,
    pub duplicates: Vec<DuplicateSuggestion>,
    pub stats: IngestStats,
}

impl BriefOutput {
    /// The `n` highest-ranked clusters.
    pub fn top(&self, n: usize) -> &[EntityCluster] {
        &self.clusters[..n.min(self.clusters.len())]
    }
}

/// Entity brief engine.
pub struct BriefEngine {
    config: BriefConfig,
}

impl BriefEngine {
    /// Create an engine; the configuration is validated up front.
    pub fn new(config: BriefConfig) -> BriefResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Engine with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: BriefConfig::default(),
        }
    }

    pub fn config(&self) -> &BriefConfig {
        &self.config
    }

    /// Run over already-typed mentions. The relevance cutoff applies here
    /// exactly as it does at the input boundary.
    pub fn run(&self, documents: &[DocumentEntities]) -> BriefOutput {
        let mut aggregator = self.aggregator();
        for doc in documents {
            aggregator.ingest_document(doc.meta.clone(), &doc.mentions);
        }
        self.finish(aggregator)
    }

    /// Run over mentions that went through the input boundary, so boundary
    /// skips show up in the stats.
    pub fn run_parsed(&self, documents: &[(DocumentMeta, ParsedMentions)]) -> BriefOutput {
        let mut aggregator = self.aggregator();
        for (meta, parsed) in documents {
            aggregator.ingest_parsed(meta.clone(), parsed);
        }
        self.finish(aggregator)
    }

    fn aggregator(&self) -> ClusterAggregator {
        ClusterAggregator::new(self.config.aggregation.clone())
            .with_relevance_cutoff(self.config.input.min_relevance)
    }

    fn finish(&self, aggregator: ClusterAggregator) -> BriefOutput {
        let clusters = aggregator.finalize();

        let graph = self.config.cooccurrence.enabled.then(|| {
            CooccurrenceBuilder::new(self.config.cooccurrence.clone()).build(aggregator.scopes(), &clusters)
        });

        let duplicates = if self.config.duplicates.enabled {
            DuplicateDetector::new(self.config.duplicates.clone()).suggest(&clusters)
        } else {
            Vec::new()
        };

        let stats = aggregator.stats().clone();
        info!(
            documents = stats.documents,
            accepted = stats.mentions_accepted,
            skipped = stats.mentions_skipped,
            clusters = clusters.len(),
            edges = graph.as_ref().map_or(0, |g| g.edges.len()),
            duplicates = duplicates.len(),
            "Entity brief run complete"
        );

        BriefOutput {
            clusters,
            graph,
            duplicates,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BriefError;
    use crate::types::{Occurrence, RawEntityMention};

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = BriefConfig::builder().similarity_threshold(-0.1).build();
        assert!(matches!(BriefEngine::new(config), Err(BriefError::Configuration(_))));
    }

    #[test]
    fn test_disabled_stages() {
        let mut config = BriefConfig::builder().include_connections(false).build();
        config.duplicates.enabled = false;
        let engine = BriefEngine::new(config).unwrap();

        let docs = vec![DocumentEntities::new(
            DocumentMeta::new(1),
            vec![
                RawEntityMention::new("Person", "Jane Doe").with_count(2),
                RawEntityMention::new("Person", "Jane Doe").with_mid("/m/jd"),
            ],
        )];
        let out = engine.run(&docs);
        assert_eq!(out.clusters.len(), 2);
        assert!(out.graph.is_none());
        assert!(out.duplicates.is_empty());
    }

    #[test]
    fn test_relevance_cutoff_matches_across_entry_points() {
        let engine = BriefEngine::new(BriefConfig::builder().min_relevance(0.5).build()).unwrap();
        let mentions = vec![
            RawEntityMention::new("Person", "Faint").with_relevance(0.01),
            RawEntityMention::new("Person", "Jane Doe").with_relevance(0.9),
        ];

        let typed = engine.run(&[DocumentEntities::new(DocumentMeta::new(1), mentions.clone())]);
        assert_eq!(typed.clusters.len(), 1);
        assert_eq!(typed.clusters[0].name, "Jane Doe");
        assert_eq!(typed.stats.skipped_by_reason.get("below_relevance"), Some(&1));

        let records = serde_json::to_value(&mentions).unwrap();
        let parsed = crate::input::parse_document_mentions(&records, 0.5).unwrap();
        let boundary = engine.run_parsed(&[(DocumentMeta::new(1), parsed)]);
        assert_eq!(boundary.clusters, typed.clusters);
        assert_eq!(boundary.stats, typed.stats);
    }

    #[test]
    fn test_top_view() {
        let engine = BriefEngine::with_defaults();
        let mentions: Vec<RawEntityMention> = (0..4)
            .map(|i| {
                RawEntityMention::new("Organization", format!("Org {}", i))
                    .with_occurrence(Occurrence::on_page(1))
            })
            .collect();
        let out = engine.run(&[DocumentEntities::new(DocumentMeta::new(7), mentions)]);
        assert_eq!(out.top(2).len(), 2);
        assert_eq!(out.top(10).len(), 4);
        assert_eq!(out.stats.mentions_accepted, 4);
        assert_eq!(out.graph.map(|g| g.edges.len()), Some(6));
    }
}
