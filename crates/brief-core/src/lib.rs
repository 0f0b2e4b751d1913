//! brief-core - Core engine for cross-document entity briefs.
//!
//! Takes per-document named-entity extraction results and produces a ranked,
//! deduplicated entity index, a co-occurrence graph between entities, and
//! advisory duplicate suggestions. Fetching, rendering and file output live
//! elsewhere; everything here is in-memory and synchronous.
//!
//! # Example
//!
//! ```
//! use brief_core::{BriefEngine, DocumentEntities, DocumentMeta, Occurrence, RawEntityMention};
//!
//! let engine = BriefEngine::with_defaults();
//! let docs = vec![DocumentEntities::new(
//!     DocumentMeta::new(1).with_title("Annual report"),
//!     vec![
//!         RawEntityMention::new("Person", "Dr. Jane Doe").with_occurrence(Occurrence::on_page(1)),
//!         RawEntityMention::new("Org", "Acme, Inc.").with_occurrence(Occurrence::on_page(1)),
//!     ],
//! )];
//!
//! let output = engine.run(&docs);
//! assert_eq!(output.clusters.len(), 2);
//! assert_eq!(output.graph.map(|g| g.edges.len()), Some(1));
//! ```

pub mod aggregate;
pub mod canonical;
pub mod config;
pub mod cooccurrence;
pub mod duplicates;
pub mod engine;
pub mod error;
pub mod input;
pub mod normalize;
pub mod similarity;
pub mod types;

// Re-export commonly used types
pub use aggregate::{ClusterAggregator, DocumentEvidence, DocumentScope, EntityCluster, IngestStats};
pub use canonical::{canonical_key, display_text};
pub use config::{
    AggregationConfig, BriefConfig, CooccurrenceConfig, DuplicateConfig, InputConfig, ReportConfig,
};
pub use cooccurrence::{CooccurrenceBuilder, CooccurrenceEdge, CooccurrenceGraph, CooccurrenceMode, PageRef};
pub use duplicates::{DuplicateDetector, DuplicateSuggestion, MatchReason};
pub use engine::{BriefEngine, BriefOutput};
pub use error::{BriefError, BriefResult, ErrorCode, SkipReason};
pub use input::{check_relevance, parse_document_mentions, parse_mention, ParsedMentions, SkippedRecord};
pub use normalize::{acronym_of, normalize_kind, normalize_text};
pub use types::{
    CanonicalKey, DocId, DocumentEntities, DocumentMeta, EntityKind, IdentityToken, Occurrence,
    RawEntityMention,
};
