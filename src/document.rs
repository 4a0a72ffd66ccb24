//! Extracted documentation pages
//!
//! A [`Document`] is the structured form of one crawled page. Its serialized
//! field names (`url`, `title`, `content`, `headings`) are a wire contract
//! shared with other tools reading the stored collections.

use serde::{Deserialize, Serialize};

/// A heading found on a page, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level (1-6)
    pub level: u8,

    /// Trimmed heading text
    pub text: String,
}

impl Heading {
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// Structured content of one documentation page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Page URL, unique within a collection
    pub url: String,

    /// Page title, empty if the page has none
    pub title: String,

    /// Main content text, empty if no content container matched
    #[serde(rename = "content")]
    pub body: String,

    /// h1-h3 headings in document order
    #[serde(default)]
    pub headings: Vec<Heading>,
}

impl Document {
    /// Returns the first `max_chars` characters of the body
    pub fn excerpt(&self, max_chars: usize) -> String {
        self.body.chars().take(max_chars).collect()
    }

    /// Returns true if no content container produced text for this page
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// The ordered documents extracted for one source site
///
/// Insertion order is discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    pub site_id: String,
    pub documents: Vec<Document>,
}

impl Collection {
    pub fn new(site_id: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            documents: Vec::new(),
        }
    }

    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
