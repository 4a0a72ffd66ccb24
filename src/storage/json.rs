//! Flat-file collection store
//!
//! One pretty-printed JSON array per site at `<dir>/<site>_docs.json`, each
//! element `{url, title, content, headings: [{level, text}]}`.

use crate::document::Document;
use crate::storage::traits::{check_site_id, DocumentStore, LoadedCollection, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

const FILE_SUFFIX: &str = "_docs.json";

/// Stores each collection as a JSON file in one directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at `dir`; the directory is created on first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `site_id`'s collection
    pub fn path_for(&self, site_id: &str) -> PathBuf {
        self.dir.join(format!("{}{}", site_id, FILE_SUFFIX))
    }
}

impl DocumentStore for JsonFileStore {
    fn save(&mut self, site_id: &str, documents: &[Document]) -> StorageResult<()> {
        check_site_id(site_id)?;
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(site_id);
        let json = serde_json::to_string_pretty(documents)?;

        // Write then rename so a reader never sees a half-written file
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;

        tracing::debug!("Saved {} documents to {}", documents.len(), path.display());
        Ok(())
    }

    fn load(&self, site_id: &str) -> StorageResult<LoadedCollection> {
        check_site_id(site_id)?;
        let path = self.path_for(site_id);

        if !path.exists() {
            return Ok(LoadedCollection::missing(
                site_id,
                path.display().to_string(),
            ));
        }

        let content = fs::read_to_string(&path)?;
        let documents: Vec<Document> = serde_json::from_str(&content)?;
        Ok(LoadedCollection::found(documents))
    }

    fn list_collections(&self) -> StorageResult<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut site_ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if let Some(site_id) = name.to_str().and_then(|n| n.strip_suffix(FILE_SUFFIX)) {
                if check_site_id(site_id).is_ok() {
                    site_ids.push(site_id.to_string());
                }
            }
        }

        site_ids.sort();
        Ok(site_ids)
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}
