//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the batch loop that turns a seed URL into a
//! collection of documents:
//! - Seeding the frontier (subject to robots.txt)
//! - Taking bounded batches of URLs in FIFO order
//! - Running fetch, extract, link discovery and completion per URL in
//!   concurrent worker tasks
//! - Recording documents and failures until the frontier empties or the
//!   page budget is spent

use crate::config::{Config, SiteEntry};
use crate::crawler::extractor::{extract_same_site_links, ContentExtractor, SelectorExtractor};
use crate::crawler::fetcher::{FetchCause, FetchFailure, PageFetcher};
use crate::crawler::frontier::CrawlFrontier;
use crate::document::{Collection, Document};
use crate::events::{Event, EventSink};
use crate::robots::{fetch_robots, is_allowed, ParsedRobots};
use crate::state::CrawlState;
use crate::url::normalize_url;
use crate::ScoutError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use url::Url;

/// Default number of pages fetched in parallel per batch
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

/// Outcome of one site crawl
///
/// Always carries whatever was collected, even when pages failed.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub site_id: String,
    pub seed: String,
    pub state: CrawlState,
    pub collection: Collection,
    /// Pages that consumed budget, failed or not
    pub processed: usize,
    pub failures: Vec<FetchFailure>,
    /// URLs still pending when the crawl stopped
    pub pending_remaining: usize,
    pub batches: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    pub fn documents(&self) -> &[Document] {
        &self.collection.documents
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Result of processing one URL inside a worker
#[derive(Debug)]
enum PageOutcome {
    Stored(Document),
    Failed(FetchFailure),
}

/// Everything a worker task needs, shared across the batch
struct PageContext {
    site_id: String,
    fetcher: PageFetcher,
    extractor: Arc<dyn ContentExtractor>,
    frontier: Arc<CrawlFrontier>,
    robots: ParsedRobots,
    robots_agent: String,
    sink: Arc<dyn EventSink>,
}

impl PageContext {
    fn allows(&self, url: &str) -> bool {
        is_allowed(&self.robots, url, &self.robots_agent)
    }
}

/// Crawls one documentation site: Idle -> Crawling -> Done
pub struct Crawler {
    site_id: String,
    fetcher: PageFetcher,
    extractor: Arc<dyn ContentExtractor>,
    sink: Arc<dyn EventSink>,
    robots_agent: Option<String>,
    state: CrawlState,
    frontier: Option<Arc<CrawlFrontier>>,
}

impl Crawler {
    /// Creates an idle crawler for a site; robots.txt is not consulted
    pub fn new(
        site_id: impl Into<String>,
        fetcher: PageFetcher,
        extractor: Arc<dyn ContentExtractor>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            site_id: site_id.into(),
            fetcher,
            extractor,
            sink,
            robots_agent: None,
            state: CrawlState::Idle,
            frontier: None,
        }
    }

    /// Consults the site's robots.txt for `agent` before following links
    pub fn with_robots(mut self, agent: impl Into<String>) -> Self {
        self.robots_agent = Some(agent.into());
        self
    }

    /// Builds a crawler for `site_id` from configuration
    pub fn from_config(
        config: &Config,
        site_id: &str,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, ScoutError> {
        let fetcher = PageFetcher::new(
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout_secs),
        )?;
        let extractor = SelectorExtractor::new(&config.extraction.content_selectors)?;

        let crawler = Self::new(site_id, fetcher, Arc::new(extractor), sink);
        if config.crawler.respect_robots {
            Ok(crawler.with_robots(config.user_agent.crawler_name.clone()))
        } else {
            Ok(crawler)
        }
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// The frontier of the current or finished crawl
    pub fn frontier(&self) -> Option<&Arc<CrawlFrontier>> {
        self.frontier.as_ref()
    }

    /// Crawls from `seed_url`, staying under it, until the frontier is empty
    /// or `max_pages` pages have been processed
    ///
    /// # Batch Loop
    ///
    /// 1. Take up to `min(max_concurrency, max_pages - processed)` URLs
    /// 2. Run each in its own task: fetch, extract, record, offer links, complete
    /// 3. Wait for the whole batch, then append its documents in take order
    ///
    /// A failed page still consumes one unit of budget and is never retried.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Partial or full results
    /// * `Err(ScoutError::Url)` - The seed URL is invalid
    /// * `Err(ScoutError::InvalidTransition)` - This crawler already ran
    pub async fn crawl(
        &mut self,
        seed_url: &str,
        max_pages: usize,
        max_concurrency: usize,
    ) -> Result<CrawlReport, ScoutError> {
        let seed = normalize_url(seed_url)?;
        self.state = self.state.transition(CrawlState::Crawling)?;

        let started_at = Utc::now();
        let max_concurrency = max_concurrency.max(1);
        let frontier = Arc::new(CrawlFrontier::new(seed.as_str()));
        self.frontier = Some(Arc::clone(&frontier));

        let (robots, robots_agent) = match &self.robots_agent {
            Some(agent) => (fetch_robots(self.fetcher.client(), &seed).await, agent.clone()),
            None => (ParsedRobots::allow_all(), String::new()),
        };

        let ctx = Arc::new(PageContext {
            site_id: self.site_id.clone(),
            fetcher: self.fetcher.clone(),
            extractor: Arc::clone(&self.extractor),
            frontier: Arc::clone(&frontier),
            robots,
            robots_agent,
            sink: Arc::clone(&self.sink),
        });

        self.sink.record(&Event::CrawlStarted {
            site_id: self.site_id.clone(),
            seed: seed.to_string(),
            max_pages,
        });

        if ctx.allows(seed.as_str()) {
            frontier.offer(seed.as_str());
        } else {
            self.sink.record(&Event::RobotsDisallowed {
                site_id: self.site_id.clone(),
                url: seed.to_string(),
            });
        }

        let mut collection = Collection::new(self.site_id.clone());
        let mut failures = Vec::new();
        let mut processed = 0;
        let mut batches = 0;

        while frontier.has_pending() && processed < max_pages {
            let urls = frontier.take(max_concurrency.min(max_pages - processed));
            batches += 1;

            for (url, outcome) in run_batch(&ctx, &urls).await {
                processed += 1;
                match outcome {
                    PageOutcome::Stored(document) => collection.push(document),
                    PageOutcome::Failed(failure) => failures.push(failure),
                }
                // No-op unless the worker died before completing it
                frontier.complete(&url);
            }

            self.sink.record(&Event::BatchCompleted {
                site_id: self.site_id.clone(),
                batch: batches,
                processed,
                pending: frontier.pending_len(),
            });
        }

        self.state = self.state.transition(CrawlState::Done)?;

        self.sink.record(&Event::CrawlFinished {
            site_id: self.site_id.clone(),
            processed,
            documents: collection.len(),
            failures: failures.len(),
        });

        Ok(CrawlReport {
            site_id: self.site_id.clone(),
            seed: seed.to_string(),
            state: self.state,
            collection,
            processed,
            failures,
            pending_remaining: frontier.pending_len(),
            batches,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

/// Runs one batch concurrently and returns outcomes in take order
async fn run_batch(ctx: &Arc<PageContext>, urls: &[String]) -> Vec<(String, PageOutcome)> {
    let mut tasks = JoinSet::new();
    for (index, url) in urls.iter().enumerate() {
        let ctx = Arc::clone(ctx);
        let url = url.clone();
        tasks.spawn(async move { (index, process_page(&ctx, url).await) });
    }

    let mut outcomes: Vec<Option<PageOutcome>> = urls.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, outcome)) => outcomes[index] = Some(outcome),
            Err(e) => tracing::error!("Crawl worker failed: {}", e),
        }
    }

    urls.iter()
        .cloned()
        .zip(outcomes)
        .map(|(url, outcome)| {
            let outcome = outcome.unwrap_or_else(|| {
                PageOutcome::Failed(FetchFailure::new(
                    url.clone(),
                    FetchCause::Request("worker task aborted".to_string()),
                ))
            });
            (url, outcome)
        })
        .collect()
}

/// Fetches one page, records its document and offers its links
///
/// Failures are contained here: they become a `Failed` outcome with zero
/// documents and zero links.
async fn process_page(ctx: &PageContext, url: String) -> PageOutcome {
    let outcome = match ctx.fetcher.fetch(&url).await {
        Ok(page) => {
            let document = ctx.extractor.extract(&page.body, &url);

            let links = match Url::parse(&page.final_url) {
                Ok(page_url) => {
                    extract_same_site_links(&page.body, &page_url, ctx.frontier.site_prefix())
                }
                Err(_) => Vec::new(),
            };

            let mut links_offered = 0;
            for link in &links {
                if !ctx.allows(link) {
                    ctx.sink.record(&Event::RobotsDisallowed {
                        site_id: ctx.site_id.clone(),
                        url: link.clone(),
                    });
                    continue;
                }
                if ctx.frontier.offer(link) {
                    links_offered += 1;
                }
            }

            ctx.sink.record(&Event::PageStored {
                site_id: ctx.site_id.clone(),
                url: url.clone(),
                title: document.title.clone(),
                links_offered,
            });
            PageOutcome::Stored(document)
        }
        Err(failure) => {
            ctx.sink.record(&Event::PageFailed {
                site_id: ctx.site_id.clone(),
                failure: failure.clone(),
            });
            PageOutcome::Failed(failure)
        }
    };

    ctx.frontier.complete(&url);
    outcome
}

/// Crawls each site in order with its configured page budget
///
/// `on_report` sees each report as soon as its site finishes, so earlier
/// sites can be persisted before a later one fails. A site whose seed is
/// invalid aborts the run, as does an error from `on_report`; page failures
/// never do.
pub async fn crawl_sites<F>(
    config: &Config,
    sites: &[SiteEntry],
    sink: Arc<dyn EventSink>,
    mut on_report: F,
) -> Result<Vec<CrawlReport>, ScoutError>
where
    F: FnMut(&CrawlReport) -> Result<(), ScoutError>,
{
    let mut reports = Vec::with_capacity(sites.len());

    for site in sites {
        let mut crawler = Crawler::from_config(config, &site.id, Arc::clone(&sink))?;
        let report = crawler
            .crawl(
                &site.base_url,
                config.page_budget(site),
                config.crawler.max_concurrent_pages_open,
            )
            .await?;
        on_report(&report)?;
        reports.push(report);
    }

    Ok(reports)
}
