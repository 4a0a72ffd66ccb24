//! Statistics over stored collections
//!
//! This module computes and prints per-site figures read back from a
//! document store.

use crate::document::Document;
use crate::storage::{DocumentStore, StorageResult};

/// Figures for one stored collection
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionStatistics {
    pub site_id: String,

    /// Number of documents
    pub documents: usize,

    /// Documents whose body is empty (no content container matched)
    pub empty_documents: usize,

    /// Total h1-h3 headings across documents
    pub headings: usize,

    /// Mean body length in characters
    pub average_body_chars: f64,
}

impl CollectionStatistics {
    pub fn from_documents(site_id: impl Into<String>, documents: &[Document]) -> Self {
        let total_chars: usize = documents.iter().map(|d| d.body.chars().count()).sum();
        let average_body_chars = if documents.is_empty() {
            0.0
        } else {
            total_chars as f64 / documents.len() as f64
        };

        Self {
            site_id: site_id.into(),
            documents: documents.len(),
            empty_documents: documents.iter().filter(|d| d.is_empty()).count(),
            headings: documents.iter().map(|d| d.headings.len()).sum(),
            average_body_chars,
        }
    }
}

/// Loads statistics for every collection in the store, sorted by site id
pub fn load_statistics(store: &dyn DocumentStore) -> StorageResult<Vec<CollectionStatistics>> {
    let mut stats = Vec::new();
    for site_id in store.list_collections()? {
        let loaded = store.load(&site_id)?;
        stats.push(CollectionStatistics::from_documents(site_id, &loaded.documents));
    }
    Ok(stats)
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(location: &str, stats: &[CollectionStatistics]) {
    println!("=== Collection Statistics ===\n");
    println!("Store: {}", location);
    println!("Collections: {}", stats.len());
    println!();

    if stats.is_empty() {
        println!("No collections saved yet.");
        return;
    }

    for collection in stats {
        println!("{}:", collection.site_id);
        println!("  Documents: {}", collection.documents);
        println!("  Empty bodies: {}", collection.empty_documents);
        println!("  Headings: {}", collection.headings);
        println!("  Average body length: {:.0} chars", collection.average_body_chars);
        println!();
    }

    let total: usize = stats.iter().map(|s| s.documents).sum();
    println!("Total documents: {}", total);
}
