//! Reviewgrab: an IMDb user-review crawler
//!
//! This crate walks the paginated user-review listing for a title, follows
//! the "load more" continuation token from page to page, and normalizes every
//! review block into a flat [`UserReview`] record. Overlapping pagination
//! windows deduplicate naturally because records are value-equal.

pub mod archive;
pub mod config;
pub mod crawler;
pub mod output;
pub mod record;
pub mod text;
pub mod urls;

use thiserror::Error;

/// Main error type for crawl operations
///
/// HTTP statuses never appear here: a 4xx/5xx response is a normal end of
/// pagination, not an error. Only connectivity-class failures (and local IO
/// while archiving) abort a crawl.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}")]
    Connect { url: String },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{crawl_title_reviews, ReviewCrawler};
pub use record::UserReview;
