//! Duplicate suggestions between distinct clusters.
//!
//! Advisory only: suggestions name pairs of clusters that may be the same
//! real-world entity under different surface forms or identifiers. The
//! cluster list is borrowed immutably and never merged.

use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

use crate::aggregate::EntityCluster;
use crate::config::DuplicateConfig;
use crate::normalize::{
    acronym_letters, acronym_of, acronym_of_significant, compact, looks_like_acronym, normalize_text,
};
use crate::similarity::sequence_ratio;
use crate::types::{CanonicalKey, EntityKind};

/// Why two clusters were paired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchReason {
    /// Kind-aware normalized text is equal once whitespace is removed.
    NormalizedMatch,
    /// One name is an acronym of the other.
    AcronymMatch,
    /// Names share a token and clear the similarity threshold.
    SimilarNames { ratio: f64 },
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NormalizedMatch => write!(f, "normalized match"),
            Self::AcronymMatch => write!(f, "acronym match"),
            Self::SimilarNames { ratio } => write!(f, "similar names ({:.2})", ratio),
        }
    }
}

impl Serialize for MatchReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A candidate pair of distinct clusters of the same kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateSuggestion {
    pub kind: EntityKind,
    pub a_key: CanonicalKey,
    pub b_key: CanonicalKey,
    pub a_name: String,
    pub b_name: String,
    pub reason: MatchReason,
    pub a_doc_count: usize,
    pub b_doc_count: usize,
}

/// Per-cluster data compared pairwise.
struct Candidate<'a> {
    cluster: &'a EntityCluster,
    normalized: String,
    compact: String,
    tokens: BTreeSet<String>,
    acronyms: Vec<String>,
}

impl<'a> Candidate<'a> {
    fn new(cluster: &'a EntityCluster) -> Self {
        let normalized = normalize_text(&cluster.name, Some(&cluster.kind));
        let acronyms = if looks_like_acronym(&cluster.name) {
            vec![acronym_letters(&cluster.name)]
        } else {
            let mut forms = vec![acronym_of(&cluster.name), acronym_of_significant(&cluster.name)];
            forms.dedup();
            forms
        };
        Self {
            cluster,
            compact: compact(&normalized),
            tokens: normalized.split_whitespace().map(str::to_string).collect(),
            normalized,
            acronyms: acronyms.into_iter().filter(|a| !a.is_empty()).collect(),
        }
    }

    fn is_acronym(&self) -> bool {
        looks_like_acronym(&self.cluster.name)
    }
}

/// Proposes likely-duplicate cluster pairs.
pub struct DuplicateDetector {
    config: DuplicateConfig,
}

impl DuplicateDetector {
    pub fn new(config: DuplicateConfig) -> Self {
        Self { config }
    }

    /// Compare clusters pairwise in rank order.
    ///
    /// Only the first `candidate_pool` clusters are considered and comparison
    /// stops once `max_suggestions` pairs have been found.
    pub fn suggest(&self, clusters: &[EntityCluster]) -> Vec<DuplicateSuggestion> {
        let pool: Vec<Candidate<'_>> = clusters
            .iter()
            .take(self.config.candidate_pool)
            .map(Candidate::new)
            .collect();

        let mut suggestions = Vec::new();
        'outer: for (i, a) in pool.iter().enumerate() {
            for b in &pool[i + 1..] {
                if suggestions.len() >= self.config.max_suggestions {
                    break 'outer;
                }
                if a.cluster.kind != b.cluster.kind || a.cluster.key == b.cluster.key {
                    continue;
                }
                if let Some(reason) = self.compare(a, b) {
                    debug!(a = %a.cluster.key, b = %b.cluster.key, reason = %reason, "Duplicate candidate");
                    suggestions.push(DuplicateSuggestion {
                        kind: a.cluster.kind.clone(),
                        a_key: a.cluster.key.clone(),
                        b_key: b.cluster.key.clone(),
                        a_name: a.cluster.name.clone(),
                        b_name: b.cluster.name.clone(),
                        reason,
                        a_doc_count: a.cluster.doc_count,
                        b_doc_count: b.cluster.doc_count,
                    });
                }
            }
        }

        suggestions
    }

    fn compare(&self, a: &Candidate<'_>, b: &Candidate<'_>) -> Option<MatchReason> {
        if a.compact.is_empty() || b.compact.is_empty() {
            return None;
        }
        if a.compact == b.compact {
            return Some(MatchReason::NormalizedMatch);
        }

        if (a.is_acronym() || b.is_acronym())
            && a.acronyms.iter().any(|x| b.acronyms.contains(x))
        {
            return Some(MatchReason::AcronymMatch);
        }

        if !a.tokens.is_disjoint(&b.tokens) {
            let ratio = sequence_ratio(&a.normalized, &b.normalized);
            if ratio >= self.config.similarity_threshold {
                return Some(MatchReason::SimilarNames { ratio });
            }
        }

        None
    }
}
