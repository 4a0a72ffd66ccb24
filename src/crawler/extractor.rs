//! HTML content extraction
//!
//! This module turns raw page markup into a structured [`Document`] and
//! extracts the same-site links to follow:
//! - Page title
//! - Main content text, located by a prioritized list of CSS selectors
//! - h1/h2/h3 headings in document order
//! - Same-site outbound anchor links

use crate::config::DEFAULT_CONTENT_SELECTORS;
use crate::document::{Document, Heading};
use crate::url::{is_same_site, resolve_link};
use crate::ScoutError;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Elements whose text never counts as page content
const NON_CONTENT_ELEMENTS: &[&str] = &["script", "style", "noscript"];

/// Turns raw markup into a [`Document`]
///
/// Locating the main content block is a site-specific heuristic, so the
/// crawler takes it as a pluggable strategy.
pub trait ContentExtractor: Send + Sync {
    fn extract(&self, raw: &str, url: &str) -> Document;
}

/// Extracts the body from the first non-empty match of a selector list
#[derive(Debug, Clone)]
pub struct SelectorExtractor {
    content_selectors: Vec<Selector>,
    title_selector: Selector,
    heading_selector: Selector,
}

impl SelectorExtractor {
    /// Creates an extractor trying `content_selectors` in order
    ///
    /// # Returns
    ///
    /// * `Ok(SelectorExtractor)` - All selectors parsed
    /// * `Err(ScoutError::InvalidSelector)` - A selector is not valid CSS
    pub fn new<S: AsRef<str>>(content_selectors: &[S]) -> Result<Self, ScoutError> {
        let content_selectors = content_selectors
            .iter()
            .map(|s| parse_selector(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            content_selectors,
            title_selector: parse_selector("title")?,
            heading_selector: parse_selector("h1, h2, h3")?,
        })
    }

    /// Creates an extractor with the default selector list:
    /// article, .content, .documentation-content, main, .main-content
    pub fn with_defaults() -> Result<Self, ScoutError> {
        Self::new(DEFAULT_CONTENT_SELECTORS)
    }

    fn extract_title(&self, document: &Html) -> String {
        document
            .select(&self.title_selector)
            .next()
            .map(element_text)
            .unwrap_or_default()
    }

    fn extract_body(&self, document: &Html) -> String {
        self.content_selectors
            .iter()
            .filter_map(|selector| document.select(selector).next())
            .map(element_text)
            .find(|text| !text.is_empty())
            .unwrap_or_default()
    }

    fn extract_headings(&self, document: &Html) -> Vec<Heading> {
        document
            .select(&self.heading_selector)
            .filter_map(|element| {
                let level = element.value().name().strip_prefix('h')?.parse().ok()?;
                Some(Heading::new(level, element_text(element)))
            })
            .collect()
    }
}

impl ContentExtractor for SelectorExtractor {
    /// Parses markup into a Document
    ///
    /// Script and style text is ignored everywhere. A page with no matching
    /// content container yields an empty body, not an error.
    fn extract(&self, raw: &str, url: &str) -> Document {
        let document = Html::parse_document(raw);

        Document {
            url: url.to_string(),
            title: self.extract_title(&document),
            body: self.extract_body(&document),
            headings: self.extract_headings(&document),
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ScoutError> {
    Selector::parse(selector)
        .map_err(|e| ScoutError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

/// Collects an element's text: pieces trimmed, empty pieces dropped,
/// joined by single spaces
fn element_text(element: ElementRef<'_>) -> String {
    let mut pieces = Vec::new();

    for node in element.descendants() {
        if let Node::Text(text) = node.value() {
            let inside_non_content = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map_or(false, |e| NON_CONTENT_ELEMENTS.contains(&e.name()))
            });
            if inside_non_content {
                continue;
            }

            let piece = text.trim();
            if !piece.is_empty() {
                pieces.push(piece);
            }
        }
    }

    pieces.join(" ")
}

/// Extracts same-site links, resolving and filtering against `base_url`
///
/// # Example
///
/// ```
/// use docs_scout::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/docs/track">Track</a><a href="https://other.com/">Other</a>"#;
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// assert_eq!(extract_links(html, &base), vec!["https://example.com/docs/track"]);
/// ```
pub fn extract_links(raw: &str, base_url: &Url) -> Vec<String> {
    extract_same_site_links(raw, base_url, base_url.as_str())
}

/// Extracts links found on a page, resolved against that page's URL and kept
/// only if they fall under `site_prefix`
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">` anchors whose normalized absolute URL
/// contains `site_prefix`.
///
/// **Exclude:** `download` anchors, `javascript:`, `mailto:`, `tel:` and
/// `data:` hrefs, fragment-only hrefs, non-HTTP(S) targets.
///
/// Each URL appears once, in first-seen order.
pub fn extract_same_site_links(raw: &str, page_url: &Url, site_prefix: &str) -> Vec<String> {
    let document = Html::parse_document(raw);
    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&anchor_selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(absolute) = resolve_link(href, page_url) {
            let absolute = absolute.to_string();
            if is_same_site(&absolute, site_prefix) && seen.insert(absolute.clone()) {
                links.push(absolute);
            }
        }
    }

    links
}
