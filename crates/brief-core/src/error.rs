//! Error types for entity brief operations.
//!
//! Two layers of failure live here:
//! - `BriefError`: run-level failures (bad configuration, caller passing the
//!   wrong shape of input). These propagate with `?`.
//! - `SkipReason`: per-record outcomes. A skipped mention never aborts a run,
//!   it is counted and reported instead.

use thiserror::Error;

/// Result type alias for entity brief operations.
pub type BriefResult<T> = Result<T, BriefError>;

/// Main error type for all entity brief operations.
#[derive(Error, Debug)]
pub enum BriefError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// A config file could not be read as its format.
    #[error("Parse error: {message}")]
    Parse { message: String, code: ErrorCode },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValInvalidShape,
    ValInvalidConfig,

    // Parse (PARSE_xxx)
    ParseInvalidSyntax,
    ParseUnsupportedFormat,

    // IO
    IoFailure,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValInvalidShape => "VAL_002",
            ErrorCode::ValInvalidConfig => "VAL_003",
            ErrorCode::ParseInvalidSyntax => "PARSE_001",
            ErrorCode::ParseUnsupportedFormat => "PARSE_002",
            ErrorCode::IoFailure => "IO_001",
        }
    }
}

impl BriefError {
    /// Create a validation error for input of the wrong shape.
    pub fn invalid_shape(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidShape,
            suggestion: Some(suggestion.into()),
        }
    }

    /// Create a parse error for malformed file contents.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseInvalidSyntax,
        }
    }

    /// Create a parse error for a file format we do not read.
    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseUnsupportedFormat,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            Self::Configuration(_) => ErrorCode::ValInvalidConfig,
            Self::Serialization(_) => ErrorCode::ParseInvalidSyntax,
            Self::Io(_) => ErrorCode::IoFailure,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::Configuration(_) => Some("Check thresholds are within 0.0-1.0 and caps are at least 1"),
            Self::Parse {
                code: ErrorCode::ParseUnsupportedFormat,
                ..
            } => Some("Use a .toml, .json, .yaml or .yml file"),
            _ => None,
        }
    }
}

/// Why a single mention was left out of clustering.
///
/// These are expected outcomes of best-effort ingestion, not failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The record was not a JSON object.
    #[error("record is not an object")]
    NotAnObject,

    /// A field was present with an unusable shape.
    #[error("malformed field '{field}': {detail}")]
    Malformed { field: &'static str, detail: String },

    /// No display text after trimming.
    #[error("empty display text")]
    EmptyDisplay,

    /// Display text normalized to nothing and no identifier was present.
    #[error("no usable text after normalization")]
    NoUsableText,

    /// Relevance at or below the configured cutoff.
    #[error("relevance {relevance} at or below cutoff {cutoff}")]
    BelowRelevance { relevance: f64, cutoff: f64 },
}

impl SkipReason {
    /// Create a malformed-field reason.
    pub fn malformed(field: &'static str, detail: impl Into<String>) -> Self {
        Self::Malformed {
            field,
            detail: detail.into(),
        }
    }

    /// Stable short label, used as a key in skip counters.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotAnObject => "not_an_object",
            Self::Malformed { .. } => "malformed",
            Self::EmptyDisplay => "empty_display",
            Self::NoUsableText => "no_usable_text",
            Self::BelowRelevance { .. } => "below_relevance",
        }
    }

    /// Whether this reason counts as a malformed record rather than an
    /// empty-signal one.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::NotAnObject | Self::Malformed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors() {
        let err = BriefError::parse("expected `=`");
        assert_eq!(err.code(), ErrorCode::ParseInvalidSyntax);
        assert!(err.to_string().contains("expected `=`"));
        assert!(err.suggestion().is_none());

        let err = BriefError::unsupported_format("config.ini");
        assert_eq!(err.code().as_str(), "PARSE_002");
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_io_error_code() {
        let err = BriefError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.code(), ErrorCode::IoFailure);
    }

    #[test]
    fn test_invalid_shape_has_suggestion() {
        let err = BriefError::invalid_shape("expected array", "pass the results list");
        assert_eq!(err.code(), ErrorCode::ValInvalidShape);
        assert_eq!(err.suggestion(), Some("pass the results list"));
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::ValInvalidShape.as_str(), "VAL_002");
        assert_eq!(ErrorCode::ParseInvalidSyntax.as_str(), "PARSE_001");
    }

    #[test]
    fn test_skip_reason_labels() {
        assert_eq!(SkipReason::EmptyDisplay.label(), "empty_display");
        assert_eq!(SkipReason::malformed("count", "not a number").label(), "malformed");
        assert!(SkipReason::NotAnObject.is_malformed());
        assert!(!SkipReason::NoUsableText.is_malformed());
        assert_eq!(
            SkipReason::malformed("count", "not a number").to_string(),
            "malformed field 'count': not a number"
        );
    }
}
