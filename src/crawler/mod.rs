//! Crawler module for documentation site crawling
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with typed, non-fatal failures
//! - HTML content and link extraction
//! - The frontier of pending, in-flight and visited URLs
//! - Batch crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;

pub use coordinator::{crawl_sites, CrawlReport, Crawler, DEFAULT_MAX_CONCURRENCY};
pub use extractor::{extract_links, extract_same_site_links, ContentExtractor, SelectorExtractor};
pub use fetcher::{
    build_http_client, FetchCause, FetchFailure, FetchedPage, PageFetcher, DEFAULT_TIMEOUT,
};
pub use frontier::CrawlFrontier;
