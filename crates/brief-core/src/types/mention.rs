//! Input records: documents and the entity mentions reported for them.

use serde::{Deserialize, Serialize};

/// Opaque document identifier assigned by the document store.
pub type DocId = u64;

/// One place an entity was seen inside a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Page number, as reported by the extractor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Surrounding text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Occurrence {
    /// Create an occurrence on a page.
    pub fn on_page(page: u32) -> Self {
        Self {
            page: Some(page),
            context: None,
        }
    }

    /// Add surrounding text.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// One entity instance reported for one document.
///
/// Produced by the input boundary (see `crate::input`); the rest of the
/// engine only reads it. Deserializing this type directly accepts only the
/// field names below. Extractor variants such as `name`, `mentions` or
/// nested `entity` objects go through the input boundary instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEntityMention {
    /// Extractor-defined kind label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Surface value / display string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Knowledge-graph machine id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<String>,
    /// Structured-data id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wikidata_id: Option<String>,
    /// Reference-article URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_url: Option<String>,
    /// Explicit mention count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// Per-occurrence detail.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub occurrences: Vec<Occurrence>,
    /// Extractor relevance score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
}

impl RawEntityMention {
    /// Create a mention with a kind label and display value.
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// Set the knowledge-graph id.
    pub fn with_mid(mut self, mid: impl Into<String>) -> Self {
        self.mid = Some(mid.into());
        self
    }

    /// Set the structured-data id.
    pub fn with_wikidata_id(mut self, id: impl Into<String>) -> Self {
        self.wikidata_id = Some(id.into());
        self
    }

    /// Set the reference-article URL.
    pub fn with_wiki_url(mut self, url: impl Into<String>) -> Self {
        self.wiki_url = Some(url.into());
        self
    }

    /// Set the explicit count.
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Add an occurrence.
    pub fn with_occurrence(mut self, occurrence: Occurrence) -> Self {
        self.occurrences.push(occurrence);
        self
    }

    /// Set the relevance score.
    pub fn with_relevance(mut self, relevance: f64) -> Self {
        self.relevance = Some(relevance);
        self
    }

    /// Mentions contributed by this record: the explicit count when
    /// positive, else the number of occurrences.
    pub fn mention_count(&self) -> u64 {
        match self.count {
            Some(n) if n > 0 => n,
            _ => self.occurrences.len() as u64,
        }
    }
}

/// Display metadata for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub id: DocId,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub page_count: u32,
}

impl DocumentMeta {
    /// Create metadata with the placeholder title "Document <id>".
    pub fn new(id: DocId) -> Self {
        Self {
            id,
            title: format!("Document {}", id),
            url: String::new(),
            page_count: 0,
        }
    }

    /// Set the title. Blank titles keep the placeholder.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        if !title.trim().is_empty() {
            self.title = title;
        }
        self
    }

    /// Set the canonical URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the page count.
    pub fn with_page_count(mut self, page_count: u32) -> Self {
        self.page_count = page_count;
        self
    }
}

/// A document together with its mentions, ready for aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentEntities {
    pub meta: DocumentMeta,
    #[serde(default)]
    pub mentions: Vec<RawEntityMention>,
}

impl DocumentEntities {
    pub fn new(meta: DocumentMeta, mentions: Vec<RawEntityMention>) -> Self {
        Self { meta, mentions }
    }
}
