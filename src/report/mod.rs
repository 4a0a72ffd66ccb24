//! Report module for crawl summaries and collection statistics
//!
//! This module handles:
//! - Generating a markdown summary of a crawl run
//! - Computing and printing statistics over stored collections

mod stats;
mod summary;

pub use stats::{load_statistics, print_statistics, CollectionStatistics};
pub use summary::{format_markdown_summary, generate_markdown_summary, CrawlSummary, SiteSummary};
