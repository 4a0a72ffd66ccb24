//! Storage module for persisting document collections
//!
//! This module handles saving and loading one collection of documents per
//! site, behind the [`DocumentStore`] trait:
//! - Flat JSON files, one per site
//! - An embedded SQLite database holding every site

mod json;
mod schema;
mod sqlite;
mod traits;

pub use json::JsonFileStore;
pub use sqlite::SqliteStore;
pub use traits::{DocumentStore, LoadedCollection, StorageError, StorageResult, StoreWarning};

use crate::config::{OutputConfig, StorageBackend};
use std::path::Path;

/// Opens the store selected by the output configuration
///
/// # Returns
///
/// * `Ok(Box<dyn DocumentStore>)` - Store ready for save/load
/// * `Err(StorageError)` - The database could not be opened
pub fn open_store(config: &OutputConfig) -> StorageResult<Box<dyn DocumentStore>> {
    match config.backend {
        StorageBackend::Json => Ok(Box::new(JsonFileStore::new(&config.docs_dir))),
        StorageBackend::Sqlite => Ok(Box::new(SqliteStore::new(Path::new(
            &config.database_path,
        ))?)),
    }
}
