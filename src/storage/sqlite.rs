//! SQLite collection store
//!
//! This module provides a SQLite-based implementation of the DocumentStore
//! trait: every site's collection in one database file.

use crate::document::{Document, Heading};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{check_site_id, DocumentStore, LoadedCollection, StorageResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
    location: String,
}

impl SqliteStore {
    /// Opens or creates the database at `path`
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Database opened and schema in place
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            location: path.display().to_string(),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            location: ":memory:".to_string(),
        })
    }

    fn load_headings(&self, document_id: i64) -> StorageResult<Vec<Heading>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT level, text FROM headings WHERE document_id = ?1 ORDER BY position",
        )?;

        let rows = stmt.query_map(params![document_id], |row| {
            Ok(Heading {
                level: row.get(0)?,
                text: row.get(1)?,
            })
        })?;

        let mut headings = Vec::new();
        for row in rows {
            headings.push(row?);
        }
        Ok(headings)
    }
}

impl DocumentStore for SqliteStore {
    fn save(&mut self, site_id: &str, documents: &[Document]) -> StorageResult<()> {
        check_site_id(site_id)?;
        let tx = self.conn.transaction()?;

        tx.execute(
            "DELETE FROM headings WHERE document_id IN (SELECT id FROM documents WHERE site_id = ?1)",
            params![site_id],
        )?;
        tx.execute("DELETE FROM documents WHERE site_id = ?1", params![site_id])?;
        tx.execute(
            "INSERT INTO collections (site_id, saved_at, document_count) VALUES (?1, ?2, ?3)
             ON CONFLICT(site_id) DO UPDATE SET saved_at = excluded.saved_at,
                                                document_count = excluded.document_count",
            params![site_id, Utc::now().to_rfc3339(), documents.len() as i64],
        )?;

        {
            let mut insert_document = tx.prepare(
                "INSERT INTO documents (site_id, position, url, title, content)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            let mut insert_heading = tx.prepare(
                "INSERT INTO headings (document_id, position, level, text) VALUES (?1, ?2, ?3, ?4)",
            )?;

            for (position, document) in documents.iter().enumerate() {
                insert_document.execute(params![
                    site_id,
                    position as i64,
                    document.url,
                    document.title,
                    document.body
                ])?;
                let document_id = tx.last_insert_rowid();

                for (heading_position, heading) in document.headings.iter().enumerate() {
                    insert_heading.execute(params![
                        document_id,
                        heading_position as i64,
                        heading.level,
                        heading.text
                    ])?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn load(&self, site_id: &str) -> StorageResult<LoadedCollection> {
        check_site_id(site_id)?;

        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM collections WHERE site_id = ?1",
                params![site_id],
                |_| Ok(()),
            )
            .optional()?;
        if exists.is_none() {
            return Ok(LoadedCollection::missing(site_id, self.location()));
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, url, title, content FROM documents WHERE site_id = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![site_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                Document {
                    url: row.get(1)?,
                    title: row.get(2)?,
                    body: row.get(3)?,
                    headings: Vec::new(),
                },
            ))
        })?;

        let mut documents = Vec::new();
        for row in rows {
            let (document_id, mut document) = row?;
            document.headings = self.load_headings(document_id)?;
            documents.push(document);
        }

        Ok(LoadedCollection::found(documents))
    }

    fn list_collections(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT site_id FROM collections ORDER BY site_id")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut site_ids = Vec::new();
        for row in rows {
            site_ids.push(row?);
        }
        Ok(site_ids)
    }

    fn location(&self) -> String {
        self.location.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoreWarning;

    fn doc(url: &str, headings: Vec<Heading>) -> Document {
        Document {
            url: url.to_string(),
            title: format!("Title {}", url),
            body: format!("Body of {}", url),
            headings,
        }
    }

    #[test]
    fn test_create_in_memory() {
        assert!(SqliteStore::new_in_memory().is_ok());
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let docs = vec![
            doc("https://x.com/b", vec![Heading::new(2, "Second"), Heading::new(1, "First")]),
            doc("https://x.com/a", vec![]),
        ];

        store.save("segment", &docs).unwrap();
        let loaded = store.load("segment").unwrap();

        assert_eq!(loaded.warning, None);
        assert_eq!(loaded.documents, docs);
    }

    #[test]
    fn test_save_replaces_collection() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        store
            .save("segment", &[doc("https://x.com/old", vec![Heading::new(1, "Old")])])
            .unwrap();
        store.save("segment", &[doc("https://x.com/new", vec![])]).unwrap();

        let loaded = store.load("segment").unwrap();
        assert_eq!(loaded.documents.len(), 1);
        assert_eq!(loaded.documents[0].url, "https://x.com/new");

        let orphans: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM headings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_collections_are_isolated() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        store.save("segment", &[doc("https://s.com/", vec![])]).unwrap();
        store.save("lytics", &[doc("https://l.com/", vec![])]).unwrap();

        assert_eq!(store.load("segment").unwrap().documents[0].url, "https://s.com/");
        assert_eq!(store.list_collections().unwrap(), vec!["lytics", "segment"]);
    }

    #[test]
    fn test_missing_collection_warns() {
        let store = SqliteStore::new_in_memory().unwrap();
        let loaded = store.load("zeotap").unwrap();
        assert!(loaded.documents.is_empty());
        assert!(matches!(loaded.warning, Some(StoreWarning::Missing { .. })));
    }

    #[test]
    fn test_empty_collection_is_not_missing() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        store.save("segment", &[]).unwrap();
        let loaded = store.load("segment").unwrap();
        assert!(loaded.documents.is_empty());
        assert_eq!(loaded.warning, None);
    }
}
