//! Crawler module for fetching and normalizing review pages
//!
//! This module contains the core crawling logic:
//! - HTTP fetching with transport-error classification
//! - Page parsing: records, title discovery, continuation data
//! - Per-review field extraction
//! - The sequential pagination loop with its fixed-delay throttle

mod driver;
mod extract;
mod fetcher;
mod parser;

pub use driver::ReviewCrawler;
pub use extract::extract_review;
pub use fetcher::{build_http_client, fetch_page, FetchedPage};
pub use parser::{parse_review_page, Continuation, DiscoveredTitle, ParsedReviewPage};

use std::collections::HashSet;
use std::path::Path;

use crate::config::CrawlConfig;
use crate::record::UserReview;
use crate::Result;

/// Crawls every review for one title with a freshly built crawler.
///
/// Convenience wrapper over [`ReviewCrawler`] for one-shot callers; reuse a
/// crawler instance when fetching several titles.
///
/// # Example
///
/// ```no_run
/// use reviewgrab::{crawl_title_reviews, CrawlConfig};
///
/// # async fn example() -> reviewgrab::Result<()> {
/// let reviews = crawl_title_reviews(CrawlConfig::default(), "tt0012345", true, None).await?;
/// println!("retrieved {} reviews", reviews.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl_title_reviews(
    config: CrawlConfig,
    title_id: &str,
    single_line_content: bool,
    archive_root: Option<&Path>,
) -> Result<HashSet<UserReview>> {
    let crawler = ReviewCrawler::new(config)?;
    crawler
        .crawl_title(title_id, single_line_content, archive_root)
        .await
}
