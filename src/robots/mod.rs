//! Robots.txt handling module
//!
//! This module fetches and parses the robots.txt of the site being crawled.
//! A missing or unreachable robots.txt allows everything.

mod parser;

pub use parser::ParsedRobots;

use reqwest::Client;
use url::Url;

/// Fetches robots.txt from the origin of `site_url`
///
/// # Arguments
///
/// * `client` - The HTTP client to use (carries the crawler's user agent)
/// * `site_url` - Any URL on the site; only its origin is used
///
/// # Returns
///
/// The parsed rules. Network errors and non-2xx responses yield
/// [`ParsedRobots::allow_all`].
pub async fn fetch_robots(client: &Client, site_url: &Url) -> ParsedRobots {
    let robots_url = match site_url.join("/robots.txt") {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Cannot build robots.txt URL for {}: {}", site_url, e);
            return ParsedRobots::allow_all();
        }
    };

    let response = match client.get(robots_url.as_str()).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Failed to fetch {}: {}", robots_url, e);
            return ParsedRobots::allow_all();
        }
    };

    if !response.status().is_success() {
        tracing::debug!(
            "No robots.txt at {} (HTTP {})",
            robots_url,
            response.status().as_u16()
        );
        return ParsedRobots::allow_all();
    }

    match response.text().await {
        Ok(content) => ParsedRobots::from_content(&content),
        Err(e) => {
            tracing::debug!("Failed to read {}: {}", robots_url, e);
            ParsedRobots::allow_all()
        }
    }
}

/// Checks if a URL is allowed by robots.txt
pub fn is_allowed(robots: &ParsedRobots, url: &str, user_agent: &str) -> bool {
    robots.is_allowed(url, user_agent)
}
