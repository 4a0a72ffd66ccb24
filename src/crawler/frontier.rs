//! Crawl frontier: discovered, in-flight and visited URLs
//!
//! This module handles:
//! - FIFO queue of discovered-but-unprocessed URLs
//! - Deduplication across pending, in-flight and visited sets
//! - Same-site restriction by string prefix
//! - Atomic take/offer/complete transitions shared by concurrent workers

use crate::state::UrlState;
use crate::url::is_same_site;
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct FrontierSets {
    pending: VecDeque<String>,
    pending_set: HashSet<String>,
    in_flight: HashSet<String>,
    visited: HashSet<String>,
}

impl FrontierSets {
    fn state_of(&self, url: &str) -> Option<UrlState> {
        if self.visited.contains(url) {
            Some(UrlState::Visited)
        } else if self.in_flight.contains(url) {
            Some(UrlState::InFlight)
        } else if self.pending_set.contains(url) {
            Some(UrlState::Pending)
        } else {
            None
        }
    }
}

/// Set of URLs a crawl has discovered, restricted to one site
///
/// A URL is in at most one of {pending, in-flight, visited}; once visited it
/// never re-enters pending, so no URL is fetched twice in one run. All
/// transitions happen under one mutex and never across an await point.
#[derive(Debug)]
pub struct CrawlFrontier {
    site_prefix: String,
    sets: Mutex<FrontierSets>,
}

impl CrawlFrontier {
    /// Creates an empty frontier accepting URLs that contain `site_prefix`
    pub fn new(site_prefix: impl Into<String>) -> Self {
        Self {
            site_prefix: site_prefix.into(),
            sets: Mutex::new(FrontierSets::default()),
        }
    }

    pub fn site_prefix(&self) -> &str {
        &self.site_prefix
    }

    fn lock(&self) -> MutexGuard<'_, FrontierSets> {
        // The sets stay consistent even if a holder panicked mid-call: every
        // transition is a handful of infallible collection operations
        match self.sets.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Adds a URL to the back of the pending queue
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and same-site, and is now pending
    /// * `false` - Already pending, in flight or visited, or off-site (no-op)
    pub fn offer(&self, url: &str) -> bool {
        if !is_same_site(url, &self.site_prefix) {
            return false;
        }

        let mut sets = self.lock();
        if sets.state_of(url).is_some() {
            return false;
        }

        sets.pending_set.insert(url.to_string());
        sets.pending.push_back(url.to_string());
        true
    }

    /// Offers several URLs, returning how many became pending
    pub fn offer_all<I, S>(&self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        urls.into_iter()
            .filter(|url| self.offer(url.as_ref()))
            .count()
    }

    /// Moves up to `n` URLs from pending to in-flight, in FIFO order
    ///
    /// Returns fewer than `n` when pending runs out.
    pub fn take(&self, n: usize) -> Vec<String> {
        let mut sets = self.lock();
        let count = n.min(sets.pending.len());
        let taken: Vec<String> = sets.pending.drain(..count).collect();

        for url in &taken {
            sets.pending_set.remove(url);
            sets.in_flight.insert(url.clone());
        }

        taken
    }

    /// Moves a URL from in-flight to visited
    ///
    /// # Returns
    ///
    /// * `true` - The URL was in flight and is now visited
    /// * `false` - The URL was not in flight (no-op)
    pub fn complete(&self, url: &str) -> bool {
        let mut sets = self.lock();
        if sets.in_flight.remove(url) {
            sets.visited.insert(url.to_string());
            true
        } else {
            false
        }
    }

    /// Where a URL currently sits, if the frontier knows it
    pub fn state_of(&self, url: &str) -> Option<UrlState> {
        self.lock().state_of(url)
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.state_of(url) == Some(UrlState::Visited)
    }

    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn in_flight_len(&self) -> usize {
        self.lock().in_flight.len()
    }

    pub fn visited_len(&self) -> usize {
        self.lock().visited.len()
    }

    pub fn has_pending(&self) -> bool {
        self.pending_len() > 0
    }
}
