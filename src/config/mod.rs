//! Configuration module for Docs-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use docs_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("docs-scout.toml")).unwrap();
//! println!("Crawler will fetch at most {} pages per site", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ExtractionConfig, OutputConfig, SearchConfig, SiteEntry,
    StorageBackend, UserAgentConfig, DEFAULT_CONTENT_SELECTORS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
