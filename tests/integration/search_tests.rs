//! Integration tests for searching stored collections

use docs_scout::config::SearchConfig;
use docs_scout::crawler::SelectorExtractor;
use docs_scout::events::{Event, RecordingSink};
use docs_scout::storage::{DocumentStore, JsonFileStore};
use docs_scout::{
    Crawler, Document, Heading, MatchKind, PageFetcher, SearchEngine, SearchError, SearchResponse,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine(sink: Arc<RecordingSink>) -> SearchEngine {
    SearchEngine::new(&SearchConfig::default(), sink)
}

fn segment_docs() -> Vec<Document> {
    vec![
        Document {
            url: "https://segment.com/docs/connections/spec/track/".to_string(),
            title: "Spec: Track".to_string(),
            body: "Track events using the API. Each track call records an action a user performs."
                .to_string(),
            headings: vec![
                Heading::new(1, "Spec: Track"),
                Heading::new(2, "Track event properties"),
            ],
        },
        Document {
            url: "https://segment.com/docs/connections/sources/".to_string(),
            title: "Sources Overview".to_string(),
            body: "Sources send data into Segment from websites, servers and mobile apps."
                .to_string(),
            headings: vec![Heading::new(1, "Sources Overview")],
        },
    ]
}

#[test]
fn test_case_insensitive_exact_match() {
    let response = engine(Arc::new(RecordingSink::new()))
        .search("track event", &segment_docs())
        .unwrap();

    let first = &response.results()[0];
    assert_eq!(first.url, "https://segment.com/docs/connections/spec/track/");
    assert_eq!(first.match_kind, MatchKind::Exact);
    assert!(first.excerpt.starts_with("Track events using the API"));
}

#[test]
fn test_one_document_yields_several_kinds() {
    let response = engine(Arc::new(RecordingSink::new()))
        .search("track event", &segment_docs())
        .unwrap();

    let kinds: Vec<_> = response
        .results()
        .iter()
        .filter(|r| r.url.ends_with("/track/"))
        .map(|r| r.match_kind.to_string())
        .collect();
    assert_eq!(
        kinds,
        vec![
            "Exact Match",
            "Tokenized Match",
            "Heading Match",
            "Fuzzy Match (Score: 100)"
        ]
    );
}

#[test]
fn test_stemmed_overlap_without_substring() {
    let response = engine(Arc::new(RecordingSink::new()))
        .search("sending website data", &segment_docs())
        .unwrap();

    let sources: Vec<_> = response
        .results()
        .iter()
        .filter(|r| r.url.ends_with("/sources/"))
        .map(|r| r.match_kind)
        .collect();
    assert!(sources.contains(&MatchKind::Tokenized));
    assert!(!sources.contains(&MatchKind::Exact));
}

#[test]
fn test_unmatched_query_returns_sentinel() {
    let sink = Arc::new(RecordingSink::new());
    let response = engine(Arc::clone(&sink))
        .search("kubernetes", &segment_docs())
        .unwrap();

    match response {
        SearchResponse::NotFound { message } => {
            assert_eq!(message, "Sorry, I couldn't find relevant information for your query.")
        }
        other => panic!("expected sentinel, got {:?}", other),
    }
    assert_eq!(sink.count(|e| matches!(e, Event::SearchNoMatches { .. })), 1);
}

#[test]
fn test_whitespace_query_is_validation_error() {
    let sink = Arc::new(RecordingSink::new());
    let result = engine(Arc::clone(&sink)).search(" \t ", &segment_docs());
    assert_eq!(result, Err(SearchError::EmptyQuery));
    assert!(sink.events().is_empty());
}

#[test]
fn test_concurrent_searches_share_engine() {
    let engine = Arc::new(engine(Arc::new(RecordingSink::new())));
    let docs = Arc::new(segment_docs());

    let handles: Vec<_> = ["track", "sources", "segment", "identify"]
        .into_iter()
        .map(|query| {
            let engine = Arc::clone(&engine);
            let docs = Arc::clone(&docs);
            std::thread::spawn(move || engine.search(query, &docs).unwrap())
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[tokio::test]
async fn test_crawl_save_load_search_pipeline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/docs/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><head><title>Getting Started</title></head><body>
                <a href="/docs/audiences">Audiences</a>
                <article><h1>Getting Started</h1><p>Install the tracking snippet.</p></article>
            </body></html>"#,
            "text/html",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/audiences"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><head><title>Audiences</title></head><body>
                <div class="content"><h2>Build an audience</h2><p>Create audiences from traits.</p></div>
            </body></html>"#,
            "text/html",
        ))
        .mount(&server)
        .await;

    let user_agent = docs_scout::config::UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    };
    let fetcher = PageFetcher::new(&user_agent, Duration::from_secs(5)).unwrap();
    let extractor = SelectorExtractor::with_defaults().unwrap();
    let mut crawler = Crawler::new(
        "demo",
        fetcher,
        Arc::new(extractor),
        Arc::new(RecordingSink::new()),
    );
    let report = crawler
        .crawl(&format!("{}/docs/", server.uri()), 10, 5)
        .await
        .unwrap();
    assert_eq!(report.documents().len(), 2);

    let dir = TempDir::new().unwrap();
    let mut store = JsonFileStore::new(dir.path());
    store.save("demo", report.documents()).unwrap();
    let loaded = store.load("demo").unwrap();
    assert_eq!(loaded.documents, report.documents());

    let response = engine(Arc::new(RecordingSink::new()))
        .search("Build an audience", &loaded.documents)
        .unwrap();
    let heading = response
        .results()
        .iter()
        .find(|r| r.match_kind == MatchKind::Heading)
        .expect("heading match");
    assert_eq!(heading.title, "Audiences");
    assert_eq!(heading.excerpt, "Heading Match: Build an audience");
}
