//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use docs_scout::config::{parse_config, Config, SiteEntry, UserAgentConfig};
use docs_scout::crawler::{crawl_sites, FetchCause, SelectorExtractor};
use docs_scout::events::{Event, RecordingSink};
use docs_scout::storage::{DocumentStore, JsonFileStore};
use docs_scout::{CrawlState, Crawler, PageFetcher, ScoutError, UrlState};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

fn test_crawler(sink: Arc<RecordingSink>, timeout: Duration) -> Crawler {
    let fetcher = PageFetcher::new(&user_agent(), timeout).expect("client builds");
    let extractor = SelectorExtractor::with_defaults().expect("default selectors parse");
    Crawler::new("test", fetcher, Arc::new(extractor), sink)
}

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html")
}

fn page(title: &str, body: &str, links: &[String]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<a href="{}">{}</a>"#, l, l))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><nav>{}</nav>\
         <main><h1>{}</h1><p>{}</p></main></body></html>",
        title, anchors, title, body
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_page_budget_of_one_leaves_frontier_pending() {
    let server = MockServer::start().await;
    let links: Vec<String> = (0..10).map(|i| format!("/docs/page-{}", i)).collect();
    mount_page(&server, "/docs/", page("Docs", "Start here", &links)).await;

    let sink = Arc::new(RecordingSink::new());
    let mut crawler = test_crawler(Arc::clone(&sink), Duration::from_secs(5));
    let seed = format!("{}/docs/", server.uri());

    let report = crawler.crawl(&seed, 1, 5).await.unwrap();

    assert_eq!(report.state, CrawlState::Done);
    assert_eq!(report.processed, 1);
    assert_eq!(report.documents().len(), 1);
    assert_eq!(report.documents()[0].title, "Docs");
    assert_eq!(report.pending_remaining, 10);
    assert!(crawler.frontier().unwrap().has_pending());
}

#[tokio::test]
async fn test_crawl_follows_same_site_links_in_take_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/docs/",
        page(
            "Home",
            "Welcome",
            &[
                "/docs/track".to_string(),
                "identify".to_string(),
                "https://other.example.com/docs/".to_string(),
                "/pricing".to_string(),
                "/docs/track#usage".to_string(),
            ],
        ),
    )
    .await;
    let back = ["/docs/".to_string()];
    mount_page(&server, "/docs/track", page("Track", "Track events", &back)).await;
    mount_page(&server, "/docs/identify", page("Identify", "Identify users", &[])).await;

    let sink = Arc::new(RecordingSink::new());
    let mut crawler = test_crawler(Arc::clone(&sink), Duration::from_secs(5));
    let report = crawler.crawl(&format!("{}/docs/", base), 100, 5).await.unwrap();

    let urls: Vec<_> = report.documents().iter().map(|d| d.url.clone()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/docs/", base),
            format!("{}/docs/track", base),
            format!("{}/docs/identify", base),
        ]
    );
    assert_eq!(report.processed, 3);
    assert_eq!(report.batches, 2);
    assert!(report.failures.is_empty());
    assert_eq!(report.pending_remaining, 0);

    let frontier = crawler.frontier().unwrap();
    assert_eq!(frontier.visited_len(), 3);
    assert_eq!(frontier.state_of(&format!("{}/pricing", base)), None);
    assert_eq!(
        frontier.state_of(&format!("{}/docs/track", base)),
        Some(UrlState::Visited)
    );
    assert_eq!(sink.count(|e| matches!(e, Event::PageStored { .. })), 3);
}

#[tokio::test]
async fn test_timeout_is_contained_and_counted() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/docs/",
        page("Home", "Welcome", &["/docs/slow".to_string(), "/docs/fast".to_string()]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/docs/slow"))
        .respond_with(html(page("Slow", "Too late", &[])).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    mount_page(&server, "/docs/fast", page("Fast", "Quick answer", &[])).await;

    let sink = Arc::new(RecordingSink::new());
    let mut crawler = test_crawler(Arc::clone(&sink), Duration::from_secs(1));
    let report = crawler.crawl(&format!("{}/docs/", base), 10, 5).await.unwrap();

    assert_eq!(report.processed, 3);
    let titles: Vec<_> = report.documents().iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["Home", "Fast"]);

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].url, format!("{}/docs/slow", base));
    assert_eq!(report.failures[0].cause, FetchCause::Timeout);
    assert!(crawler
        .frontier()
        .unwrap()
        .is_visited(&format!("{}/docs/slow", base)));
    assert_eq!(sink.count(|e| matches!(e, Event::PageFailed { .. })), 1);
}

#[tokio::test]
async fn test_http_errors_and_non_html_are_failures() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/docs/",
        page(
            "Home",
            "Welcome",
            &["/docs/missing".to_string(), "/docs/guide.pdf".to_string()],
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/docs/guide.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"),
        )
        .mount(&server)
        .await;

    let mut crawler = test_crawler(Arc::new(RecordingSink::new()), Duration::from_secs(5));
    let report = crawler.crawl(&format!("{}/docs/", base), 10, 5).await.unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.documents().len(), 1);

    let causes: Vec<_> = report.failures.iter().map(|f| f.cause.clone()).collect();
    assert!(causes.contains(&FetchCause::Status(404)));
    assert!(causes
        .iter()
        .any(|c| matches!(c, FetchCause::NotHtml(ct) if ct.starts_with("application/pdf"))));
}

#[tokio::test]
async fn test_mutual_links_fetch_each_page_once() {
    let server = MockServer::start().await;
    let all = vec![
        "/docs/".to_string(),
        "/docs/a".to_string(),
        "/docs/b".to_string(),
    ];

    mount_page(&server, "/docs/", page("Home", "Home", &all)).await;
    mount_page(&server, "/docs/a", page("A", "Page A", &all)).await;
    mount_page(&server, "/docs/b", page("B", "Page B", &all)).await;

    let mut crawler = test_crawler(Arc::new(RecordingSink::new()), Duration::from_secs(5));
    let report = crawler
        .crawl(&format!("{}/docs/", server.uri()), 50, 2)
        .await
        .unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.documents().len(), 3);
    // Each mock expects exactly one request; verified when the server drops
}

#[tokio::test]
async fn test_concurrency_bound_sets_batch_size() {
    let server = MockServer::start().await;
    let links: Vec<String> = (0..6).map(|i| format!("/docs/p{}", i)).collect();
    mount_page(&server, "/docs/", page("Home", "Home", &links)).await;
    for link in &links {
        mount_page(&server, link, page(link, "Leaf", &[])).await;
    }

    let sink = Arc::new(RecordingSink::new());
    let mut crawler = test_crawler(Arc::clone(&sink), Duration::from_secs(5));
    let report = crawler
        .crawl(&format!("{}/docs/", server.uri()), 100, 2)
        .await
        .unwrap();

    assert_eq!(report.processed, 7);
    // 1 seed batch + 3 batches of 2
    assert_eq!(report.batches, 4);
    let batch_events: Vec<_> = sink
        .events()
        .into_iter()
        .filter_map(|e| match e {
            Event::BatchCompleted { processed, .. } => Some(processed),
            _ => None,
        })
        .collect();
    assert_eq!(batch_events, vec![1, 3, 5, 7]);
}

#[tokio::test]
async fn test_batch_pages_are_fetched_in_parallel() {
    let server = MockServer::start().await;
    let delay = Duration::from_millis(800);
    let links: Vec<String> = (0..5).map(|i| format!("/docs/slow-{}", i)).collect();
    mount_page(&server, "/docs/", page("Home", "Home", &links)).await;
    for link in &links {
        Mock::given(method("GET"))
            .and(path(link.as_str()))
            .respond_with(html(page(link, "Leaf", &[])).set_delay(delay))
            .expect(1)
            .mount(&server)
            .await;
    }

    let mut crawler = test_crawler(Arc::new(RecordingSink::new()), Duration::from_secs(5));
    let started = Instant::now();
    let report = crawler
        .crawl(&format!("{}/docs/", server.uri()), 100, 5)
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(report.documents().len(), 6);
    assert_eq!(report.batches, 2);
    // Sequential fetching would need five delays
    assert!(elapsed < delay * 2, "leaf batch took {:?}", elapsed);
}

#[tokio::test]
async fn test_robots_disallowed_links_are_not_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /docs/private"),
        )
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/docs/",
        page(
            "Home",
            "Welcome",
            &["/docs/private/keys".to_string(), "/docs/public".to_string()],
        ),
    )
    .await;
    mount_page(&server, "/docs/public", page("Public", "Open", &[])).await;
    Mock::given(method("GET"))
        .and(path("/docs/private/keys"))
        .respond_with(html(page("Private", "Secret", &[])))
        .expect(0)
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::new());
    let mut crawler =
        test_crawler(Arc::clone(&sink), Duration::from_secs(5)).with_robots("TestBot");
    let report = crawler.crawl(&format!("{}/docs/", base), 10, 5).await.unwrap();

    assert_eq!(report.documents().len(), 2);
    let disallowed = sink.count(|e| {
        matches!(e, Event::RobotsDisallowed { url, .. } if url.ends_with("/docs/private/keys"))
    });
    assert_eq!(disallowed, 1);
}

#[tokio::test]
async fn test_robots_disallowed_seed_yields_empty_collection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /"))
        .mount(&server)
        .await;

    let mut crawler = test_crawler(Arc::new(RecordingSink::new()), Duration::from_secs(5))
        .with_robots("TestBot");
    let report = crawler
        .crawl(&format!("{}/docs/", server.uri()), 10, 5)
        .await
        .unwrap();

    assert_eq!(report.state, CrawlState::Done);
    assert_eq!(report.processed, 0);
    assert!(report.collection.is_empty());
}

fn two_site_config(base: &str) -> Config {
    parse_config(&format!(
        r#"
[crawler]
max-pages = 5
request-timeout-secs = 5
respect-robots = false

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"
contact-email = "test@example.com"

[output]
summary-path = "summary.md"

[[site]]
id = "a"
base-url = "{base}/a/"

[[site]]
id = "b"
base-url = "{base}/b/"
max-pages = 1
"#
    ))
    .unwrap()
}

#[tokio::test]
async fn test_crawl_sites_from_config() {
    let server = MockServer::start().await;

    mount_page(&server, "/a/", page("A home", "Site A", &["/a/more".to_string()])).await;
    mount_page(&server, "/a/more", page("A more", "More A", &[])).await;
    mount_page(&server, "/b/", page("B home", "Site B", &["/b/more".to_string()])).await;

    let config = two_site_config(&server.uri());
    let mut seen = Vec::new();
    let reports = crawl_sites(&config, &config.sites, Arc::new(RecordingSink::new()), |r| {
        seen.push(r.site_id.clone());
        Ok(())
    })
    .await
    .unwrap();

    assert_eq!(seen, vec!["a", "b"]);

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].site_id, "a");
    assert_eq!(reports[0].documents().len(), 2);
    assert_eq!(reports[1].site_id, "b");
    assert_eq!(reports[1].documents().len(), 1);
    assert_eq!(reports[1].pending_remaining, 1);
}

#[tokio::test]
async fn test_finished_sites_are_saved_before_a_later_site_fails() {
    let server = MockServer::start().await;
    mount_page(&server, "/a/", page("A home", "Site A", &["/a/more".to_string()])).await;
    mount_page(&server, "/a/more", page("A more", "More A", &[])).await;

    let config = two_site_config(&server.uri());
    let sites = vec![
        config.sites[0].clone(),
        SiteEntry {
            id: "broken".to_string(),
            base_url: "not a url".to_string(),
            max_pages: None,
        },
    ];

    let dir = TempDir::new().unwrap();
    let mut store = JsonFileStore::new(dir.path());
    let result = crawl_sites(&config, &sites, Arc::new(RecordingSink::new()), |report| {
        store.save(&report.site_id, report.documents())?;
        Ok(())
    })
    .await;

    assert!(matches!(result, Err(ScoutError::Url(_))));
    let saved = store.load("a").unwrap();
    assert_eq!(saved.warning, None);
    assert_eq!(saved.documents.len(), 2);
    assert!(store.load("broken").unwrap().warning.is_some());
}
