use crate::config::types::{
    Config, CrawlerConfig, ExtractionConfig, OutputConfig, SearchConfig, SiteEntry,
    StorageBackend, UserAgentConfig,
};
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_extraction_config(&config.extraction)?;
    validate_search_config(&config.search)?;
    validate_sites(&config.sites)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.max_concurrent_pages_open < 1 || config.max_concurrent_pages_open > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_pages_open must be between 1 and 100, got {}",
            config.max_concurrent_pages_open
        )));
    }

    if config.request_timeout_secs < 1 || config.request_timeout_secs > 120 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be between 1 and 120, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    match config.backend {
        StorageBackend::Json if config.docs_dir.is_empty() => {
            return Err(ConfigError::Validation(
                "docs_dir cannot be empty for the json backend".to_string(),
            ));
        }
        StorageBackend::Sqlite if config.database_path.is_empty() => {
            return Err(ConfigError::Validation(
                "database_path cannot be empty for the sqlite backend".to_string(),
            ));
        }
        _ => {}
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_extraction_config(config: &ExtractionConfig) -> Result<(), ConfigError> {
    if config.content_selectors.is_empty() {
        return Err(ConfigError::Validation(
            "content_selectors must list at least one selector".to_string(),
        ));
    }

    for selector in &config.content_selectors {
        if Selector::parse(selector).is_err() {
            return Err(ConfigError::Validation(format!(
                "content selector '{}' is not a valid CSS selector",
                selector
            )));
        }
    }

    Ok(())
}

fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.fuzzy_threshold > 100 {
        return Err(ConfigError::Validation(format!(
            "fuzzy_threshold must be between 0 and 100, got {}",
            config.fuzzy_threshold
        )));
    }

    if config.excerpt_chars < 1 {
        return Err(ConfigError::Validation(
            "excerpt_chars must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates site entries: identifiers name files, so they stay filename-safe
fn validate_sites(sites: &[SiteEntry]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for site in sites {
        validate_site_id(&site.id)?;

        if !seen.insert(site.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "site id '{}' is configured more than once",
                site.id
            )));
        }

        let url = Url::parse(&site.base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid base URL '{}': {}", site.base_url, e))
        })?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ConfigError::Validation(format!(
                "Base URL '{}' must use HTTP or HTTPS",
                site.base_url
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "Base URL '{}' has no host",
                site.base_url
            )));
        }

        if site.max_pages == Some(0) {
            return Err(ConfigError::Validation(format!(
                "max_pages for site '{}' must be >= 1",
                site.id
            )));
        }
    }

    Ok(())
}

fn validate_site_id(id: &str) -> Result<(), ConfigError> {
    if id.is_empty() {
        return Err(ConfigError::Validation("site id cannot be empty".to_string()));
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "site id '{}' may only contain lowercase letters, digits, '-' and '_'",
            id
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
