//! Crawler configuration
//!
//! There is no configuration file: [`CrawlConfig::default`] carries the
//! production values and callers (the CLI, tests) override individual fields
//! with struct update syntax.

use std::time::Duration;

use url::Url;

use crate::urls::DEFAULT_BASE_URL;

/// Fixed parameters shared by every request a crawler instance makes
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Scheme and host every request targets
    pub base_url: Url,

    /// Minimum time between the starts of consecutive requests
    pub min_request_interval: Duration,

    /// Hard timeout for a single request
    pub request_timeout: Duration,

    /// User-Agent header value
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL parses"),
            min_request_interval: Duration::from_millis(500),
            request_timeout: Duration::from_secs(2),
            user_agent: format!("reviewgrab/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets_production_host() {
        let config = CrawlConfig::default();
        assert_eq!(config.base_url.as_str(), "https://www.imdb.com/");
    }

    #[test]
    fn test_default_throttle_and_timeout() {
        let config = CrawlConfig::default();
        assert_eq!(config.min_request_interval, Duration::from_millis(500));
        assert_eq!(config.request_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_field_override() {
        let config = CrawlConfig {
            min_request_interval: Duration::from_millis(10),
            ..CrawlConfig::default()
        };
        assert_eq!(config.min_request_interval, Duration::from_millis(10));
        assert_eq!(config.request_timeout, Duration::from_secs(2));
    }
}
