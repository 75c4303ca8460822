//! HTTP fetching.
//!
//! Thin wrapper over `reqwest` that applies a timeout, user agent and body
//! size limit, and turns rate limiting and non-success statuses into errors.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited by {host}, retry after {retry_after_secs}s")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Content too large: {size} bytes (max {max_size})")]
    ContentTooLarge { size: usize, max_size: usize },
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Maximum body size to accept (default 20MB)
    pub max_content_size: usize,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_content_size: 20 * 1024 * 1024,
            timeout: Duration::from_secs(30),
            user_agent: format!("chess-profile/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP fetcher.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    config: FetcherConfig,
}

impl Fetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("chess-profile")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// GET `url` and return the body as text.
    pub async fn get_text(&self, url: &Url, accept: &str) -> Result<String, FetchError> {
        info!("Fetching {}", url);

        let response = self
            .client
            .get(url.as_str())
            .header(ACCEPT, accept)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(FetchError::RateLimited {
                host: url.host_str().unwrap_or("unknown").to_string(),
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let content = response.bytes().await?;
        self.check_size(content.len())?;
        debug!("Fetched {} bytes from {}", content.len(), url);

        Ok(String::from_utf8_lossy(&content).into_owned())
    }

    fn check_size(&self, size: usize) -> Result<(), FetchError> {
        if size > self.config.max_content_size {
            return Err(FetchError::ContentTooLarge {
                size,
                max_size: self.config.max_content_size,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> FetcherConfig {
        FetcherConfig {
            max_content_size: 1024,
            timeout: Duration::from_secs(10),
            user_agent: "test-agent".to_string(),
        }
    }

    #[test]
    fn test_fetcher_config_default() {
        let config = FetcherConfig::default();

        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_content_size, 20 * 1024 * 1024);
        assert!(config.user_agent.starts_with("chess-profile/"));
    }

    #[test]
    fn test_size_limit() {
        let fetcher = Fetcher::new(test_config()).unwrap();

        assert!(fetcher.check_size(1024).is_ok());
        assert!(matches!(
            fetcher.check_size(1025),
            Err(FetchError::ContentTooLarge {
                size: 1025,
                max_size: 1024
            })
        ));
    }

    #[test]
    fn test_invalid_user_agent_falls_back() {
        let config = FetcherConfig {
            user_agent: "bad\nagent".to_string(),
            ..test_config()
        };
        assert!(Fetcher::new(config).is_ok());
    }

    #[test]
    fn test_error_messages() {
        let err = FetchError::RateLimited {
            host: "lichess.org".to_string(),
            retry_after_secs: 60,
        };
        assert_eq!(err.to_string(), "Rate limited by lichess.org, retry after 60s");

        let err = FetchError::HttpStatus {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
    }
}
