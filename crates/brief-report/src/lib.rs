//! brief-report - Report model for entity briefs.
//!
//! Collects the fetch layer's per-document outcomes, runs the brief engine
//! over the usable ones and packages the result with a run summary. Output
//! is JSON text in memory; writing it anywhere is the caller's business.
//!
//! # Example
//!
//! ```
//! use brief_core::{BriefConfig, DocumentMeta};
//! use brief_report::{DocumentOutcome, ReportBuilder};
//! use serde_json::json;
//!
//! let outcomes = vec![
//!     DocumentOutcome::fetched(
//!         DocumentMeta::new(1).with_title("Minutes"),
//!         json!([{"kind": "Person", "value": "Jane Doe", "occurrences": [{"page": 1}]}]),
//!     ),
//!     DocumentOutcome::skipped(DocumentMeta::new(2), "no entities (404)"),
//! ];
//!
//! let report = ReportBuilder::new(BriefConfig::default()).build(outcomes)?;
//! assert_eq!(report.entities.len(), 1);
//! assert_eq!(report.skipped.len(), 1);
//! let blob = report.to_json()?;
//! assert!(blob.contains("\"run_id\""));
//! # Ok::<(), brief_core::BriefError>(())
//! ```

pub mod builder;
pub mod outcome;
pub mod report;

pub use builder::{ReportBuilder, NO_ENTITIES};
pub use outcome::{DocumentOutcome, FailedDocument, SkippedDocument};
pub use report::{BriefReport, RunSummary};
