use serde::Deserialize;

/// Content containers tried in order when extracting a page body
pub const DEFAULT_CONTENT_SELECTORS: &[&str] = &[
    "article",
    ".content",
    ".documentation-content",
    "main",
    ".main-content",
];

/// Main configuration structure for Docs-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default, rename = "site")]
    pub sites: Vec<SiteEntry>,
}

impl Config {
    /// Looks up a configured site by its identifier
    pub fn site(&self, id: &str) -> Option<&SiteEntry> {
        self.sites.iter().find(|site| site.id == id)
    }

    /// Page budget for a site, falling back to the crawler default
    pub fn page_budget(&self, site: &SiteEntry) -> usize {
        site.max_pages.unwrap_or(self.crawler.max_pages)
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Default maximum number of pages processed per site
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Maximum number of concurrent page fetches per batch
    #[serde(rename = "max-concurrent-pages-open", default = "default_concurrency")]
    pub max_concurrent_pages_open: usize,

    /// Per-page request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Whether robots.txt is consulted before following links
    #[serde(rename = "respect-robots", default = "default_true")]
    pub respect_robots: bool,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the identity header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Which document store backs the collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One pretty-printed JSON file per site
    Json,
    /// A single SQLite database holding every site
    Sqlite,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,

    /// Directory for `<site>_docs.json` files (json backend)
    #[serde(rename = "docs-dir", default = "default_docs_dir")]
    pub docs_dir: String,

    /// Path to the SQLite database file (sqlite backend)
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,

    /// Path to the markdown crawl summary
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}

/// Content extraction heuristics
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// CSS selectors for the main content container, in priority order
    #[serde(rename = "content-selectors", default = "default_selectors")]
    pub content_selectors: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            content_selectors: default_selectors(),
        }
    }
}

/// Search tuning
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Minimum partial-ratio score (0-100) for a fuzzy match
    #[serde(rename = "fuzzy-threshold", default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: u8,

    /// Number of body characters in a result excerpt
    #[serde(rename = "excerpt-chars", default = "default_excerpt_chars")]
    pub excerpt_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
            excerpt_chars: default_excerpt_chars(),
        }
    }
}

/// A documentation site to crawl
#[derive(Debug, Clone, Deserialize)]
pub struct SiteEntry {
    /// Collection identifier (e.g. "segment")
    pub id: String,

    /// Seed URL, also the same-site prefix
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Per-site page budget override
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<usize>,
}

fn default_concurrency() -> usize {
    crate::crawler::DEFAULT_MAX_CONCURRENCY
}

fn default_timeout_secs() -> u64 {
    crate::crawler::DEFAULT_TIMEOUT.as_secs()
}

fn default_true() -> bool {
    true
}

fn default_backend() -> StorageBackend {
    StorageBackend::Json
}

fn default_docs_dir() -> String {
    "cdp_docs".to_string()
}

fn default_database_path() -> String {
    "docs.db".to_string()
}

fn default_selectors() -> Vec<String> {
    DEFAULT_CONTENT_SELECTORS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_fuzzy_threshold() -> u8 {
    crate::search::DEFAULT_FUZZY_THRESHOLD
}

fn default_excerpt_chars() -> usize {
    300
}
