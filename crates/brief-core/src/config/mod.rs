//! Configuration system for entity briefs.
//!
//! Every threshold and cap the engine uses lives here and is handed to each
//! component at construction, so runs with different settings can share a
//! process.

use serde::{Deserialize, Serialize};

use crate::error::{BriefError, BriefResult};

/// Input-boundary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Mentions reporting a relevance at or below this value are skipped.
    /// Records without a relevance value always pass.
    pub min_relevance: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { min_relevance: 0.15 }
    }
}

/// Cluster aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Text samples retained per (cluster, document).
    pub max_samples_per_document: usize,
    /// Samples are truncated to this many characters.
    pub max_sample_chars: usize,
    /// Documents listed per cluster in the emitted view.
    pub max_documents_per_cluster: usize,
    /// Aliases listed per cluster in the emitted view.
    pub max_aliases: usize,
    /// Page numbers listed per document in the emitted view.
    pub max_pages_per_document: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            max_samples_per_document: 5,
            max_sample_chars: 200,
            max_documents_per_cluster: 10,
            max_aliases: 25,
            max_pages_per_document: 25,
        }
    }
}

/// Co-occurrence graph settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CooccurrenceConfig {
    /// Whether the graph is computed at all.
    pub enabled: bool,
    /// Keys considered per page or document before pairing.
    pub max_keys_per_scope: usize,
    /// Edges kept after ranking.
    pub max_edges: usize,
    /// Example (document, page) locations kept per edge.
    pub max_example_locations: usize,
}

impl Default for CooccurrenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_keys_per_scope: 25,
            max_edges: 50,
            max_example_locations: 3,
        }
    }
}

/// Duplicate suggestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicateConfig {
    /// Whether duplicate suggestions are computed.
    pub enabled: bool,
    /// Only the first N clusters in rank order are compared.
    pub candidate_pool: usize,
    /// Comparison stops once this many suggestions exist.
    pub max_suggestions: usize,
    /// Minimum similarity ratio for a fuzzy suggestion. Range: 0.0-1.0.
    pub similarity_threshold: f64,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            candidate_pool: 200,
            max_suggestions: 20,
            similarity_threshold: 0.88,
        }
    }
}

impl DuplicateConfig {
    /// Create config with custom threshold.
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            similarity_threshold: threshold.clamp(0.0, 1.0),
            ..Default::default()
        }
    }
}

/// Report view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Size of the "top entities" view. The view always holds at least 5.
    pub top_n_entities: usize,
    /// Cap on the full entity list handed to renderers.
    pub max_entities: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n_entities: 15,
            max_entities: 500,
        }
    }
}

impl ReportConfig {
    /// Effective size of the top view.
    pub fn top_view_len(&self) -> usize {
        self.top_n_entities.max(5)
    }
}

/// Main entity brief configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BriefConfig {
    /// Input boundary.
    pub input: InputConfig,
    /// Cluster aggregation.
    pub aggregation: AggregationConfig,
    /// Co-occurrence graph.
    pub cooccurrence: CooccurrenceConfig,
    /// Duplicate suggestions.
    pub duplicates: DuplicateConfig,
    /// Report views.
    pub report: ReportConfig,
}

impl BriefConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> BriefResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => toml::from_str(&content).map_err(|e| BriefError::parse(e.to_string()))?,
            Some("json") => serde_json::from_str(&content).map_err(|e| BriefError::parse(e.to_string()))?,
            Some("yaml" | "yml") => {
                serde_yaml::from_str(&content).map_err(|e| BriefError::parse(e.to_string()))?
            }
            other => {
                return Err(BriefError::unsupported_format(format!(
                    "Unsupported config file format '{}'. Use .toml, .json, or .yaml",
                    other.unwrap_or("")
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Unparseable values are ignored with a warning and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = env_parse::<f64>("ENTITY_BRIEF_MIN_RELEVANCE") {
            config.input.min_relevance = v;
        }
        if let Some(v) = env_parse::<usize>("ENTITY_BRIEF_TOP_N_ENTITIES") {
            config.report.top_n_entities = v;
        }
        if let Some(v) = env_parse::<bool>("ENTITY_BRIEF_INCLUDE_CONNECTIONS") {
            config.cooccurrence.enabled = v;
        }
        if let Some(v) = env_parse::<f64>("ENTITY_BRIEF_SIMILARITY_THRESHOLD") {
            config.duplicates.similarity_threshold = v;
        }

        config
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> BriefConfigBuilder {
        BriefConfigBuilder::default()
    }

    /// Validate configuration values are in valid ranges.
    pub fn validate(&self) -> BriefResult<()> {
        if !(0.0..=1.0).contains(&self.duplicates.similarity_threshold) {
            return Err(BriefError::Configuration(
                "duplicates.similarity_threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !self.input.min_relevance.is_finite() {
            return Err(BriefError::Configuration(
                "input.min_relevance must be a finite number".to_string(),
            ));
        }
        if self.cooccurrence.enabled && self.cooccurrence.max_keys_per_scope < 2 {
            return Err(BriefError::Configuration(
                "cooccurrence.max_keys_per_scope must be at least 2".to_string(),
            ));
        }
        if self.aggregation.max_sample_chars == 0 {
            return Err(BriefError::Configuration(
                "aggregation.max_sample_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "Ignoring unparseable environment value");
            None
        }
    }
}

/// Builder for BriefConfig.
#[derive(Default)]
pub struct BriefConfigBuilder {
    config: BriefConfig,
}

impl BriefConfigBuilder {
    /// Set the relevance cutoff.
    pub fn min_relevance(mut self, cutoff: f64) -> Self {
        self.config.input.min_relevance = cutoff;
        self
    }

    /// Set aggregation configuration.
    pub fn aggregation(mut self, config: AggregationConfig) -> Self {
        self.config.aggregation = config;
        self
    }

    /// Set co-occurrence configuration.
    pub fn cooccurrence(mut self, config: CooccurrenceConfig) -> Self {
        self.config.cooccurrence = config;
        self
    }

    /// Toggle co-occurrence computation.
    pub fn include_connections(mut self, enabled: bool) -> Self {
        self.config.cooccurrence.enabled = enabled;
        self
    }

    /// Set duplicate configuration.
    pub fn duplicates(mut self, config: DuplicateConfig) -> Self {
        self.config.duplicates = config;
        self
    }

    /// Set the duplicate similarity threshold.
    pub fn similarity_threshold(mut self, threshold: f64) -> Self {
        self.config.duplicates.similarity_threshold = threshold;
        self
    }

    /// Set the size of the top entities view.
    pub fn top_n_entities(mut self, n: usize) -> Self {
        self.config.report.top_n_entities = n;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> BriefConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BriefConfig::default();
        assert!((config.input.min_relevance - 0.15).abs() < 1e-9);
        assert_eq!(config.cooccurrence.max_keys_per_scope, 25);
        assert_eq!(config.cooccurrence.max_edges, 50);
        assert_eq!(config.duplicates.candidate_pool, 200);
        assert_eq!(config.duplicates.max_suggestions, 20);
        assert!((config.duplicates.similarity_threshold - 0.88).abs() < 1e-9);
        assert_eq!(config.report.top_n_entities, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_top_view_has_floor() {
        let config = ReportConfig {
            top_n_entities: 2,
            ..Default::default()
        };
        assert_eq!(config.top_view_len(), 5);
    }

    #[test]
    fn test_builder() {
        let config = BriefConfig::builder()
            .min_relevance(0.3)
            .include_connections(false)
            .similarity_threshold(0.9)
            .top_n_entities(8)
            .build();
        assert!(!config.cooccurrence.enabled);
        assert_eq!(config.report.top_n_entities, 8);
        assert!((config.duplicates.similarity_threshold - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_validation_errors() {
        let bad_threshold = BriefConfig::builder().similarity_threshold(1.5).build();
        assert!(bad_threshold.validate().is_err());

        let mut bad_scope = BriefConfig::default();
        bad_scope.cooccurrence.max_keys_per_scope = 1;
        assert!(bad_scope.validate().is_err());

        // A tiny scope is fine when the graph is off.
        bad_scope.cooccurrence.enabled = false;
        assert!(bad_scope.validate().is_ok());
    }

    #[test]
    fn test_with_threshold_clamps() {
        assert!((DuplicateConfig::with_threshold(2.0).similarity_threshold - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_toml_file_partial() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[duplicates]\nsimilarity_threshold = 0.8\n\n[report]\ntop_n_entities = 30").unwrap();

        let config = BriefConfig::from_file(file.path()).unwrap();
        assert!((config.duplicates.similarity_threshold - 0.8).abs() < 1e-9);
        assert_eq!(config.duplicates.max_suggestions, 20);
        assert_eq!(config.report.top_n_entities, 30);
        assert_eq!(config.cooccurrence.max_edges, 50);
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "cooccurrence:\n  enabled: false\n  max_edges: 10").unwrap();

        let config = BriefConfig::from_file(file.path()).unwrap();
        assert!(!config.cooccurrence.enabled);
        assert_eq!(config.cooccurrence.max_edges, 10);
    }

    #[test]
    fn test_from_file_rejects_invalid_values() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, r#"{{"duplicates": {{"similarity_threshold": 3.0}}}}"#).unwrap();
        assert!(matches!(
            BriefConfig::from_file(file.path()),
            Err(BriefError::Configuration(_))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let err = BriefConfig::from_file(file.path()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ParseUnsupportedFormat);
        assert!(err.to_string().contains("'ini'"));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[duplicates\nsimilarity_threshold = ").unwrap();
        let err = BriefConfig::from_file(file.path()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ParseInvalidSyntax);
    }
}
