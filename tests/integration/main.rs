//! Integration tests for Docs-Scout

mod crawl_tests;
mod search_tests;
mod store_tests;
