//! Observation sink for crawl and search events
//!
//! The crawler and the search engine report what happens through an
//! [`EventSink`] they are handed at construction, instead of logging
//! directly. [`TracingSink`] forwards events to `tracing`; [`RecordingSink`]
//! keeps them in memory.

use crate::crawler::FetchFailure;
use crate::search::MatchKind;
use std::sync::Mutex;

/// Something observable that happened during a crawl or a search
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CrawlStarted {
        site_id: String,
        seed: String,
        max_pages: usize,
    },
    PageStored {
        site_id: String,
        url: String,
        title: String,
        links_offered: usize,
    },
    PageFailed {
        site_id: String,
        failure: FetchFailure,
    },
    RobotsDisallowed {
        site_id: String,
        url: String,
    },
    BatchCompleted {
        site_id: String,
        batch: usize,
        processed: usize,
        pending: usize,
    },
    CrawlFinished {
        site_id: String,
        processed: usize,
        documents: usize,
        failures: usize,
    },
    SearchStarted {
        query: String,
        documents: usize,
    },
    SearchMatched {
        title: String,
        url: String,
        kind: MatchKind,
    },
    SearchNoMatches {
        query: String,
    },
}

/// Capability for observing crawl and search events
///
/// Implementations must be safe to call from concurrent crawl workers.
pub trait EventSink: Send + Sync {
    fn record(&self, event: &Event);
}

/// Forwards events to the `tracing` subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &Event) {
        match event {
            Event::CrawlStarted {
                site_id,
                seed,
                max_pages,
            } => {
                tracing::info!(site = %site_id, %seed, max_pages, "Crawling documentation")
            }
            Event::PageStored {
                site_id,
                url,
                title,
                links_offered,
            } => {
                tracing::debug!(site = %site_id, %url, %title, links_offered, "Stored page")
            }
            Event::PageFailed { site_id, failure } => {
                tracing::warn!(
                    site = %site_id,
                    url = %failure.url,
                    cause = %failure.cause,
                    "Page failed"
                )
            }
            Event::RobotsDisallowed { site_id, url } => {
                tracing::debug!(site = %site_id, %url, "Disallowed by robots.txt")
            }
            Event::BatchCompleted {
                site_id,
                batch,
                processed,
                pending,
            } => {
                tracing::debug!(site = %site_id, batch, processed, pending, "Batch completed")
            }
            Event::CrawlFinished {
                site_id,
                processed,
                documents,
                failures,
            } => {
                tracing::info!(
                    site = %site_id,
                    processed,
                    documents,
                    failures,
                    "Processed {} pages for {}",
                    processed,
                    site_id
                )
            }
            Event::SearchStarted { query, documents } => {
                tracing::info!(%query, documents, "Searching for query")
            }
            Event::SearchMatched { title, url, kind } => {
                tracing::info!(%title, %url, kind = %kind, "Match found")
            }
            Event::SearchNoMatches { query } => {
                tracing::info!(%query, "No matches found")
            }
        }
    }
}

/// Keeps every event in memory, in arrival order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the events recorded so far
    pub fn events(&self) -> Vec<Event> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Counts recorded events matching a predicate
    pub fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &Event) {
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push(event.clone());
    }
}
