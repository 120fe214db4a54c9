use crate::config::types::{ClientConfig, Config, CrawlerConfig, EndpointConfig, SearchConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_crawler_config(&config.crawler)?;
    validate_client_config(&config.client)?;
    validate_endpoints(&config.endpoints)?;
    Ok(())
}

/// Validates the search section
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.query.trim().is_empty() {
        return Err(ConfigError::Validation(
            "search query cannot be empty".to_string(),
        ));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

/// Validates crawler pacing and the recency window
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.months_ago < 1 {
        return Err(ConfigError::Validation(format!(
            "months_ago must be >= 1, got {}",
            config.months_ago
        )));
    }

    Ok(())
}

/// Validates client identification and timeouts
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if !config.referer.is_empty() {
        Url::parse(&config.referer)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid referer: {}", e)))?;
    }

    Ok(())
}

/// Validates that every endpoint is an absolute HTTP(S) URL
fn validate_endpoints(config: &EndpointConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("search_url", &config.search_url),
        ("comments_url", &config.comments_url),
        ("detail_url", &config.detail_url),
    ] {
        validate_endpoint(name, value)?;
    }
    Ok(())
}

fn validate_endpoint(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    Ok(())
}
