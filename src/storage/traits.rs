//! Storage traits and error types
//!
//! This module defines the trait interface for collection stores and
//! associated error types.

use crate::document::Document;
use std::fmt;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid collection name: {0:?}")]
    InvalidSiteId(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A recoverable condition reported alongside a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWarning {
    /// No collection has been saved under this site id
    Missing { site_id: String, location: String },
}

impl fmt::Display for StoreWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { site_id, location } => {
                write!(f, "No collection for '{}' found at {}", site_id, location)
            }
        }
    }
}

/// Documents read back from a store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedCollection {
    pub documents: Vec<Document>,
    pub warning: Option<StoreWarning>,
}

impl LoadedCollection {
    pub fn found(documents: Vec<Document>) -> Self {
        Self {
            documents,
            warning: None,
        }
    }

    /// An empty collection carrying a `Missing` warning
    pub fn missing(site_id: &str, location: impl Into<String>) -> Self {
        Self {
            documents: Vec::new(),
            warning: Some(StoreWarning::Missing {
                site_id: site_id.to_string(),
                location: location.into(),
            }),
        }
    }
}

/// Trait for collection store implementations
///
/// One named collection per site. Saving replaces the whole collection;
/// document order survives a save/load round trip.
pub trait DocumentStore {
    /// Persists `documents` as the collection for `site_id`
    fn save(&mut self, site_id: &str, documents: &[Document]) -> StorageResult<()>;

    /// Loads the collection for `site_id`
    ///
    /// A collection that was never saved is not an error: it loads empty,
    /// with a [`StoreWarning::Missing`].
    fn load(&self, site_id: &str) -> StorageResult<LoadedCollection>;

    /// Site ids of every saved collection, sorted
    fn list_collections(&self) -> StorageResult<Vec<String>>;

    /// Human-readable location of the store (directory or database path)
    fn location(&self) -> String;
}

/// Rejects site ids that could escape the store's namespace
pub(crate) fn check_site_id(site_id: &str) -> StorageResult<()> {
    let valid = !site_id.is_empty()
        && site_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidSiteId(site_id.to_string()))
    }
}
