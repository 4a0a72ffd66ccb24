//! URL handling module for Docs-Scout
//!
//! This module provides URL normalization, link resolution and the same-site
//! test that keeps a crawl inside one documentation site.

mod normalize;

pub use normalize::normalize_url;

use url::Url;

/// Resolves an href to a normalized absolute URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links (same page anchors)
/// - invalid URLs
/// - non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    normalize_url(absolute.as_str()).ok()
}

/// Same-site test: the absolute URL contains the site prefix as a substring
///
/// Query-string variants of one page pass this test, and mirrors of the same
/// docs on another domain fail it.
pub fn is_same_site(url: &str, site_prefix: &str) -> bool {
    url.contains(site_prefix)
}
