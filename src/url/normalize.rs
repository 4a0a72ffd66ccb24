use crate::UrlError;
use url::Url;

/// Tracking query parameters dropped during normalization
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid"];

/// Normalizes a URL before it enters the crawl frontier
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an http or https scheme and a host
/// 3. Remove the fragment (everything after #)
/// 4. Remove tracking query parameters (`utm_*`, `fbclid`, `gclid`, `mc_eid`),
///    keeping the remaining parameters in their original order
/// 5. Remove an empty query string (trailing ?)
///
/// Host case and dot segments are already normalized by the parser. Paths
/// keep their trailing slash because the same-site test is a string prefix.
///
/// # Examples
///
/// ```
/// use docs_scout::url::normalize_url;
///
/// let url = normalize_url("https://Docs.Example.com/guide/?utm_source=x#intro").unwrap();
/// assert_eq!(url.as_str(), "https://docs.example.com/guide/");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    if url.query().is_some() {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    Ok(url)
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}
