//! Page parsing
//!
//! Takes one page of the review listing — the initial full page or a later
//! AJAX fragment — and produces the review records it contains, the title's
//! display name/path when not yet known, and the raw continuation data for
//! the next page. Malformed or partial documents never fail: the worst case
//! is an empty record set with no continuation, which the driver reads as
//! the end of the crawl.

use std::collections::HashSet;

use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::crawler::extract::{attr_token_selector, extract_review, nonempty_attr};
use crate::record::UserReview;
use crate::text::normalize_fragments;
use crate::urls::strip_query;

static TITLE_LINK: Lazy<Selector> = Lazy::new(|| attr_token_selector("a", "itemprop", "url"));
static REVIEW_CONTAINER: Lazy<Selector> =
    Lazy::new(|| attr_token_selector("div", "class", "imdb-user-review"));
static LOAD_MORE: Lazy<Selector> =
    Lazy::new(|| attr_token_selector("div", "class", "load-more-data"));

/// Continuation key attribute on the load-more node
const PAGINATION_KEY_ATTR: &str = "data-key";

/// Attribute carrying the relative path for subsequent AJAX requests
const AJAX_URL_ATTR: &str = "data-ajaxurl";

/// Title display name and relative path discovered from a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredTitle {
    /// Display name of the title
    pub name: Option<String>,

    /// Query-stripped relative path of the title page
    pub relative_path: Option<String>,
}

/// Raw continuation data reported by a page's load-more marker.
///
/// The two attributes are reported individually: the driver stops without a
/// key, while a missing AJAX path only matters until a base was learned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Continuation {
    /// Opaque key addressing the next page
    pub pagination_key: Option<String>,

    /// Relative path the next request should target
    pub ajax_path: Option<String>,
}

/// Everything one page contributes to a crawl session
#[derive(Debug)]
pub struct ParsedReviewPage {
    /// Deduplicated records found on this page
    pub reviews: HashSet<UserReview>,

    /// Title info, populated only while name and path were both unknown
    pub title: Option<DiscoveredTitle>,

    /// Continuation data, absent when the page has no load-more marker
    pub continuation: Option<Continuation>,
}

/// Parses one page of the review listing.
///
/// `declared_encoding` is the charset label from the response headers;
/// unknown or missing labels fall back to UTF-8. Title discovery is only
/// attempted while the session knows neither the name nor the path, and the
/// discovered values also apply to the records of the page that exposed
/// them.
pub fn parse_review_page(
    raw: &[u8],
    declared_encoding: Option<&str>,
    title_id: &str,
    known_title_name: Option<&str>,
    known_title_relative_path: Option<&str>,
    single_line_content: bool,
) -> ParsedReviewPage {
    let text = decode_body(raw, declared_encoding);
    let document = Html::parse_document(&text);

    let title = if known_title_name.is_none() && known_title_relative_path.is_none() {
        discover_title(&document)
    } else {
        None
    };

    let title_name = known_title_name.or_else(|| title.as_ref().and_then(|t| t.name.as_deref()));
    let title_relative_path = known_title_relative_path
        .or_else(|| title.as_ref().and_then(|t| t.relative_path.as_deref()));

    let reviews = document
        .select(&REVIEW_CONTAINER)
        .map(|container| {
            extract_review(
                container,
                title_id,
                title_name,
                title_relative_path,
                single_line_content,
            )
        })
        .collect();

    let continuation = document.select(&LOAD_MORE).next().map(|node| Continuation {
        pagination_key: nonempty_attr(node, PAGINATION_KEY_ATTR),
        ajax_path: nonempty_attr(node, AJAX_URL_ATTR),
    });

    ParsedReviewPage {
        reviews,
        title,
        continuation,
    }
}

/// Decodes the body using the declared charset, defaulting to UTF-8.
fn decode_body(raw: &[u8], declared_encoding: Option<&str>) -> String {
    let encoding = declared_encoding
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(raw);
    text.into_owned()
}

/// First title link of the document, with name and path each optional.
fn discover_title(document: &Html) -> Option<DiscoveredTitle> {
    let node = document.select(&TITLE_LINK).next()?;

    let fragments: Vec<&str> = node.text().collect();
    let name = if fragments.is_empty() {
        None
    } else {
        Some(normalize_fragments(fragments))
    };
    let relative_path = node.value().attr("href").and_then(strip_query);

    Some(DiscoveredTitle {
        name,
        relative_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAGE: &str = r#"
        <html><body>
          <a itemprop="url" href="/title/tt0000001/?ref_=tt_urv">Example Title</a>
          <div class="lister-item imdb-user-review" data-review-id="rv001">
            <span class="review-date">12 March 2020</span>
            <a class="title">Great film</a>
          </div>
          <div class="lister-item imdb-user-review" data-review-id="rv002">
            <span class="review-date">13 March 2020</span>
            <a class="title">Not bad</a>
          </div>
          <div class="load-more-data"
               data-key="abc123"
               data-ajaxurl="/title/tt0000001/reviews/_ajax"></div>
        </body></html>
    "#;

    fn parse(raw: &[u8]) -> ParsedReviewPage {
        parse_review_page(raw, None, "tt0000001", None, None, false)
    }

    #[test]
    fn test_full_page() {
        let parsed = parse(FULL_PAGE.as_bytes());

        assert_eq!(parsed.reviews.len(), 2);

        let title = parsed.title.expect("title link discovered");
        assert_eq!(title.name.as_deref(), Some("Example Title"));
        assert_eq!(title.relative_path.as_deref(), Some("/title/tt0000001/"));

        let continuation = parsed.continuation.expect("load-more marker present");
        assert_eq!(continuation.pagination_key.as_deref(), Some("abc123"));
        assert_eq!(
            continuation.ajax_path.as_deref(),
            Some("/title/tt0000001/reviews/_ajax")
        );
    }

    #[test]
    fn test_discovered_title_applies_to_same_page_records() {
        let parsed = parse(FULL_PAGE.as_bytes());

        for review in &parsed.reviews {
            assert_eq!(review.title_name.as_deref(), Some("Example Title"));
            assert_eq!(
                review.title_relative_path.as_deref(),
                Some("/title/tt0000001/")
            );
        }
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let first = parse(FULL_PAGE.as_bytes());
        let second = parse(FULL_PAGE.as_bytes());
        assert_eq!(first.reviews, second.reviews);
    }

    #[test]
    fn test_known_title_skips_discovery() {
        let parsed = parse_review_page(
            FULL_PAGE.as_bytes(),
            None,
            "tt0000001",
            Some("Known Name"),
            Some("/title/tt0000001/"),
            false,
        );

        assert!(parsed.title.is_none());
        for review in &parsed.reviews {
            assert_eq!(review.title_name.as_deref(), Some("Known Name"));
        }
    }

    #[test]
    fn test_duplicate_blocks_collapse() {
        let html = r#"
            <div class="imdb-user-review" data-review-id="rv001">
              <a class="title">Same review</a>
            </div>
            <div class="imdb-user-review" data-review-id="rv001">
              <a class="title">Same review</a>
            </div>
        "#;
        let parsed = parse(html.as_bytes());
        assert_eq!(parsed.reviews.len(), 1);
    }

    #[test]
    fn test_missing_load_more_means_no_continuation() {
        let html = r#"<div class="imdb-user-review" data-review-id="rv001"></div>"#;
        let parsed = parse(html.as_bytes());

        assert_eq!(parsed.reviews.len(), 1);
        assert!(parsed.continuation.is_none());
    }

    #[test]
    fn test_empty_load_more_attributes_count_as_absent() {
        let html = r#"<div class="load-more-data" data-key="" data-ajaxurl=" "></div>"#;
        let parsed = parse(html.as_bytes());

        let continuation = parsed.continuation.expect("marker node present");
        assert!(continuation.pagination_key.is_none());
        assert!(continuation.ajax_path.is_none());
    }

    #[test]
    fn test_load_more_with_key_only() {
        let html = r#"<div class="load-more-data" data-key="def456"></div>"#;
        let parsed = parse(html.as_bytes());

        let continuation = parsed.continuation.expect("marker node present");
        assert_eq!(continuation.pagination_key.as_deref(), Some("def456"));
        assert!(continuation.ajax_path.is_none());
    }

    #[test]
    fn test_malformed_document_yields_nothing() {
        let parsed = parse(b"\xff\xfe<div<<<>>garbage");
        assert!(parsed.reviews.is_empty());
        assert!(parsed.continuation.is_none());
    }

    #[test]
    fn test_declared_encoding_is_honored() {
        // "café" in ISO-8859-1: the 0xE9 byte is not valid UTF-8.
        let html = b"<div class=\"imdb-user-review\"><a class=\"title\">caf\xe9</a></div>";

        let latin1 = parse_review_page(html, Some("ISO-8859-1"), "tt1", None, None, false);
        let review = latin1.reviews.iter().next().unwrap();
        assert_eq!(review.review_title.as_deref(), Some("café"));
    }

    #[test]
    fn test_unknown_encoding_falls_back_to_utf8() {
        let html = "<div class=\"imdb-user-review\"><a class=\"title\">café</a></div>";
        let parsed = parse_review_page(
            html.as_bytes(),
            Some("no-such-charset"),
            "tt1",
            None,
            None,
            false,
        );
        let review = parsed.reviews.iter().next().unwrap();
        assert_eq!(review.review_title.as_deref(), Some("café"));
    }
}
