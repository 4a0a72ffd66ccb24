//! Integration tests for the document stores

use docs_scout::config::{OutputConfig, StorageBackend};
use docs_scout::storage::{open_store, DocumentStore, StoreWarning};
use docs_scout::{Document, Heading, JsonFileStore, SqliteStore};
use tempfile::TempDir;

fn sample_docs() -> Vec<Document> {
    vec![
        Document {
            url: "https://docs.mparticle.com/guides/".to_string(),
            title: "Guides".to_string(),
            body: "Start with the platform guide. Ünïcödé survives.".to_string(),
            headings: vec![Heading::new(1, "Guides"), Heading::new(3, "Next steps")],
        },
        Document {
            url: "https://docs.mparticle.com/empty".to_string(),
            title: String::new(),
            body: String::new(),
            headings: vec![],
        },
    ]
}

fn assert_round_trip(store: &mut dyn DocumentStore) {
    let docs = sample_docs();
    store.save("mparticle", &docs).unwrap();

    let loaded = store.load("mparticle").unwrap();
    assert_eq!(loaded.warning, None);
    assert_eq!(loaded.documents, docs);
}

fn assert_missing_warns(store: &dyn DocumentStore) {
    let loaded = store.load("zeotap").unwrap();
    assert!(loaded.documents.is_empty());
    match loaded.warning {
        Some(StoreWarning::Missing { site_id, .. }) => assert_eq!(site_id, "zeotap"),
        other => panic!("expected missing warning, got {:?}", other),
    }
}

#[test]
fn test_json_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("cdp_docs"));
    assert_round_trip(&mut store);
    assert!(dir.path().join("cdp_docs/mparticle_docs.json").exists());
}

#[test]
fn test_sqlite_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut store = SqliteStore::new(&dir.path().join("docs.db")).unwrap();
    assert_round_trip(&mut store);
}

#[test]
fn test_missing_collection_is_warning_not_error() {
    let dir = TempDir::new().unwrap();
    assert_missing_warns(&JsonFileStore::new(dir.path()));
    assert_missing_warns(&SqliteStore::new(&dir.path().join("docs.db")).unwrap());
}

#[test]
fn test_sqlite_store_persists_across_opens() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("docs.db");

    {
        let mut store = SqliteStore::new(&db).unwrap();
        store.save("mparticle", &sample_docs()).unwrap();
    }

    let store = SqliteStore::new(&db).unwrap();
    assert_eq!(store.load("mparticle").unwrap().documents, sample_docs());
    assert_eq!(store.list_collections().unwrap(), vec!["mparticle"]);
}

#[test]
fn test_open_store_selects_backend() {
    let dir = TempDir::new().unwrap();
    let config = OutputConfig {
        backend: StorageBackend::Sqlite,
        docs_dir: dir.path().join("docs").display().to_string(),
        database_path: dir.path().join("docs.db").display().to_string(),
        summary_path: "summary.md".to_string(),
    };

    let mut store = open_store(&config).unwrap();
    store.save("segment", &sample_docs()).unwrap();
    assert!(dir.path().join("docs.db").exists());
    assert!(!dir.path().join("docs").exists());

    let json_config = OutputConfig {
        backend: StorageBackend::Json,
        ..config
    };
    let mut store = open_store(&json_config).unwrap();
    store.save("segment", &sample_docs()).unwrap();
    assert!(dir.path().join("docs/segment_docs.json").exists());
}
