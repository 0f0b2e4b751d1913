//! Integration tests for report assembly.

use brief_core::{BriefConfig, CooccurrenceMode, DocumentMeta};
use brief_report::{DocumentOutcome, ReportBuilder};
use serde_json::{json, Value};

fn outcomes() -> Vec<DocumentOutcome> {
    let mut out = vec![
        DocumentOutcome::fetched(
            DocumentMeta::new(1).with_title("Minutes").with_page_count(4),
            json!([
                {"kind": "Person", "value": "Jane Doe", "occurrences": [{"page": 1, "context": "Jane Doe opened"}]},
                {"entity": {"kind": "Org", "name": "Acme, Inc."}, "occurrences": [{"page": 1}]},
                {"kind": "Person", "value": "", "count": 3},
                {"kind": "Person", "value": "Faint", "relevance": 0.01}
            ]),
        ),
        DocumentOutcome::skipped(
            DocumentMeta::new(2)
                .with_title("Scan")
                .with_url("https://docs.test/2")
                .with_page_count(2),
            "no entities (404)",
        ),
        DocumentOutcome::failed(DocumentMeta::new(3).with_page_count(5), "HTTP 500"),
    ];
    for id in 10..20u64 {
        out.push(DocumentOutcome::fetched(
            DocumentMeta::new(id).with_page_count(1),
            json!([{"kind": "Location", "value": format!("Place {}", id)}]),
        ));
    }
    out
}

#[test]
fn test_report_sections() {
    let report = ReportBuilder::new(BriefConfig::default())
        .run_id("fixed")
        .build(outcomes())
        .unwrap();

    assert_eq!(report.run.run_id, "fixed");
    // Skipped and failed documents count toward the totals too.
    assert_eq!(report.run.docs_processed, 13);
    assert_eq!(report.run.pages_processed, 21);
    assert_eq!(report.run.unique_entities, 12);
    assert_eq!(report.run.mentions_skipped, 2);

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].reason, "no entities (404)");
    assert_eq!(report.skipped[0].url, "https://docs.test/2");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].doc_id, 3);
    assert_eq!(report.failures[0].error, "HTTP 500");

    assert_eq!(report.cooccurrence_mode, Some(CooccurrenceMode::Page));
    assert_eq!(report.edges.len(), 1);
}

#[test]
fn test_top_view_has_floor_and_entities_cap() {
    let mut config = BriefConfig::builder().top_n_entities(2).build();
    config.report.max_entities = 7;
    let report = ReportBuilder::new(config).build(outcomes()).unwrap();

    assert_eq!(report.top_entities.len(), 5);
    assert_eq!(report.entities.len(), 7);
    assert_eq!(report.top_entities[..], report.entities[..5]);
}

#[test]
fn test_connections_disabled() {
    let config = BriefConfig::builder().include_connections(false).build();
    let report = ReportBuilder::new(config).build(outcomes()).unwrap();
    assert!(report.cooccurrence_mode.is_none());
    assert!(report.edges.is_empty());
}

#[test]
fn test_json_blob_shape() {
    let report = ReportBuilder::new(BriefConfig::default()).build(outcomes()).unwrap();
    let blob: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert!(blob["run"]["generated_at"].is_string());
    assert_eq!(blob["cooccurrence_mode"], "page");
    assert_eq!(blob["edges"][0]["examples"][0], json!({"doc_id": 1, "page": 1}));
    let keys: Vec<&str> = blob["entities"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["key"].as_str())
        .collect();
    assert!(keys.contains(&"Person::v:jane doe"));
    assert!(report.to_json_pretty().unwrap().contains('\n'));
}
