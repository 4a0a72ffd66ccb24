//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: lifecycle of one site crawl (Idle, Crawling, Done)
//! - `UrlState`: where a URL sits in the frontier (Pending, InFlight, Visited)

mod crawl_state;
mod url_state;

pub use crawl_state::CrawlState;
pub use url_state::UrlState;
