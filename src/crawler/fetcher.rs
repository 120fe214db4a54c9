//! HTTP fetcher implementation
//!
//! This module handles the HTTP side of every component:
//! - Building the HTTP client from the immutable client configuration
//! - GET requests for HTML pages, classified into a FetchResult
//! - GET requests for JSON endpoints, where any failure is an error

use crate::config::ClientConfig;
use crate::{CrawlError, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONNECTION, COOKIE, REFERER};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Result of an HTML fetch
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// Page body content
        body: String,
    },

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Short description of a failed fetch, for logs and error messages
    pub fn describe_failure(&self) -> Option<String> {
        match self {
            FetchResult::Success { .. } => None,
            FetchResult::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            FetchResult::NetworkError { error } => Some(error.clone()),
        }
    }
}

/// Builds an HTTP client with the configured identity headers
///
/// The user agent, cookie and referer are sent on every request, together
/// with `Connection: keep-alive`.
///
/// # Example
///
/// ```no_run
/// use weibo_comments::config::ClientConfig;
/// use weibo_comments::crawler::build_http_client;
///
/// let config = ClientConfig {
///     user_agent: "Mozilla/5.0".to_string(),
///     cookie: "SUB=...".to_string(),
///     referer: "https://s.weibo.com".to_string(),
///     timeout_secs: 10,
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &ClientConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    if !config.cookie.is_empty() {
        let mut cookie = HeaderValue::from_str(&config.cookie).map_err(|e| {
            CrawlError::Config(crate::ConfigError::Validation(format!(
                "cookie is not a valid header value: {}",
                e
            )))
        })?;
        cookie.set_sensitive(true);
        headers.insert(COOKIE, cookie);
    }

    if !config.referer.is_empty() {
        let referer = HeaderValue::from_str(&config.referer).map_err(|e| {
            CrawlError::Config(crate::ConfigError::Validation(format!(
                "referer is not a valid header value: {}",
                e
            )))
        })?;
        headers.insert(REFERER, referer);
    }

    let client = Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(config.timeout())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches an HTML page, classifying the outcome instead of failing
///
/// Callers decide what a failed fetch means: the search lister gives up on
/// the remaining pages, the detail lookup retries once.
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    match client.get(url.clone()).send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success { final_url, body },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                },
            }
        }
        Err(e) => {
            if e.is_timeout() {
                FetchResult::NetworkError {
                    error: "Request timeout".to_string(),
                }
            } else if e.is_connect() {
                FetchResult::NetworkError {
                    error: "Connection refused".to_string(),
                }
            } else {
                FetchResult::NetworkError {
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Decodes a JSON response body, returning it with the URL it came from
///
/// Transport errors, non-success statuses and undecodable bodies all become
/// errors; there is no recovery path for JSON endpoints.
pub async fn decode_json<T: DeserializeOwned>(
    response: std::result::Result<reqwest::Response, reqwest::Error>,
    url: &Url,
) -> Result<(String, T)> {
    let response = response.map_err(|source| CrawlError::Http {
        url: url.to_string(),
        source,
    })?;

    let final_url = response.url().to_string();
    let status = response.status();
    if !status.is_success() {
        return Err(CrawlError::Status {
            url: final_url,
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|source| CrawlError::Http {
        url: final_url.clone(),
        source,
    })?;

    let decoded = serde_json::from_str(&body).map_err(|source| CrawlError::Decode {
        url: final_url.clone(),
        source,
    })?;

    Ok((final_url, decoded))
}

/// Renders an id-like JSON scalar as a string
///
/// The service sends ids as numbers in some payloads and strings in others.
pub(crate) fn json_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
