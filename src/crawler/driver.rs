//! Pagination driver
//!
//! Owns the crawl loop for one title: fetch a page, archive it when asked,
//! parse it, merge its records into the session set, and follow the
//! continuation token until the source stops offering one. Pagination is
//! strictly sequential because every request URL is derived from the page
//! before it.

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use reqwest::Client;
use url::Url;

use crate::archive::PageArchive;
use crate::config::CrawlConfig;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::parser::parse_review_page;
use crate::record::UserReview;
use crate::urls::{ajax_base_url, continuation_url, initial_reviews_url};
use crate::Result;

/// Crawls the paginated review listings of titles.
///
/// One instance holds the HTTP client and the fixed crawl parameters; each
/// [`crawl_title`](Self::crawl_title) call owns its own session state
/// (record set, title info, continuation base, throttle clock), so a single
/// crawler can serve several titles, each crawl independent of the others.
pub struct ReviewCrawler {
    config: CrawlConfig,
    client: Client,
}

impl ReviewCrawler {
    /// Builds the crawler and its HTTP client.
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let client = build_http_client(&config)?;
        Ok(Self { config, client })
    }

    /// Retrieves every publicly visible review for `title_id`.
    ///
    /// An HTTP status in 400-599 ends pagination and returns whatever was
    /// accumulated so far; connectivity failures (timeout, refused
    /// connection) are hard errors for the whole call. When `archive_root`
    /// is set, every fetched page body is stored under a fresh per-session
    /// directory before parsing.
    pub async fn crawl_title(
        &self,
        title_id: &str,
        single_line_content: bool,
        archive_root: Option<&Path>,
    ) -> Result<HashSet<UserReview>> {
        let mut archive = match archive_root {
            Some(root) => Some(PageArchive::create(root, title_id, Utc::now())?),
            None => None,
        };

        let mut reviews: HashSet<UserReview> = HashSet::new();
        let mut title_name: Option<String> = None;
        let mut title_relative_path: Option<String> = None;
        let mut continuation_base: Option<Url> = None;
        let mut last_request: Option<Instant> = None;
        let mut page_index: u32 = 0;

        let mut current_url = initial_reviews_url(&self.config.base_url, title_id);
        tracing::info!("Crawling reviews for {} from {}", title_id, current_url);

        loop {
            self.throttle(last_request).await;
            last_request = Some(Instant::now());

            let page = fetch_page(&self.client, &current_url).await?;

            if (400..600).contains(&page.status) {
                tracing::warn!(
                    "HTTP {} for {}, ending pagination for {}",
                    page.status,
                    current_url,
                    title_id
                );
                break;
            }

            if let Some(archive) = archive.as_mut() {
                let path = archive.write_page(&page.body)?;
                tracing::debug!("Archived page {} to {}", page_index, path.display());
            }

            let parsed = parse_review_page(
                &page.body,
                page.encoding.as_deref(),
                title_id,
                title_name.as_deref(),
                title_relative_path.as_deref(),
                single_line_content,
            );

            tracing::debug!(
                "Page {} of {} yielded {} reviews",
                page_index,
                title_id,
                parsed.reviews.len()
            );
            reviews.extend(parsed.reviews);
            page_index += 1;

            // Title info is stable for a session: first page to expose it
            // wins, later pages never overwrite.
            if let Some(discovered) = parsed.title {
                if title_name.is_none() {
                    title_name = discovered.name;
                }
                if title_relative_path.is_none() {
                    title_relative_path = discovered.relative_path;
                }
            }

            let continuation = match parsed.continuation {
                Some(continuation) => continuation,
                None => {
                    tracing::debug!("No load-more marker for {}, crawl complete", title_id);
                    break;
                }
            };
            let key = match continuation.pagination_key {
                Some(key) => key,
                None => {
                    tracing::debug!("Load-more marker without key for {}", title_id);
                    break;
                }
            };

            if continuation_base.is_none() {
                if let Some(ajax_path) = continuation.ajax_path.as_deref() {
                    continuation_base = Some(ajax_base_url(&self.config.base_url, ajax_path));
                }
            }
            let base = match continuation_base.as_ref() {
                Some(base) => base,
                None => {
                    tracing::debug!("No continuation base path learned for {}", title_id);
                    break;
                }
            };

            current_url = continuation_url(base, &key);
        }

        tracing::info!("Collected {} reviews for {}", reviews.len(), title_id);
        Ok(reviews)
    }

    /// Fixed-delay throttle: wait until at least the configured interval has
    /// passed since the previous request's start. No-op before the first
    /// request of a session.
    async fn throttle(&self, last_request: Option<Instant>) {
        if let Some(last) = last_request {
            let elapsed = last.elapsed();
            if elapsed < self.config.min_request_interval {
                tokio::time::sleep(self.config.min_request_interval - elapsed).await;
            }
        }
    }
}
