//! Review field extraction
//!
//! Turns one review container element into a [`UserReview`]. Every field is
//! independently optional: a missing sub-node, attribute or unparsable value
//! leaves that field `None` and never fails the record. The paired fields
//! (rating/scale, helpful/total) are produced in one step each, so a lone
//! half cannot appear.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

use crate::record::UserReview;
use crate::text::{
    collapse_newlines, normalize_fragments, parse_found_helpful, parse_maximum_rating,
    parse_review_date,
};
use crate::urls::strip_query;

/// Builds a selector matching descendant elements whose whitespace-separated
/// `attribute` value contains `token`.
///
/// CSS `~=` is exactly that token-containment semantics; every extraction
/// site goes through this one primitive instead of re-deriving it.
pub(crate) fn attr_token_selector(element: &str, attribute: &str, token: &str) -> Selector {
    Selector::parse(&format!(r#"{element}[{attribute}~="{token}"]"#))
        .expect("attribute token selector parses")
}

/// Attribute carrying the review identifier on the container node
const REVIEW_ID_ATTR: &str = "data-review-id";

static REVIEW_DATE: Lazy<Selector> =
    Lazy::new(|| attr_token_selector("span", "class", "review-date"));
static REVIEW_TITLE: Lazy<Selector> = Lazy::new(|| attr_token_selector("a", "class", "title"));
static FEEDBACK_ACTIONS: Lazy<Selector> =
    Lazy::new(|| attr_token_selector("div", "class", "actions"));
static SPOILER_WARNING: Lazy<Selector> =
    Lazy::new(|| attr_token_selector("span", "class", "spoiler-warning"));
static POINT_SCALE: Lazy<Selector> =
    Lazy::new(|| attr_token_selector("span", "class", "point-scale"));
static AUTHOR_BLOCK: Lazy<Selector> =
    Lazy::new(|| attr_token_selector("div", "class", "display-name-date"));
static CONTENT_TEXT: Lazy<Selector> = Lazy::new(|| attr_token_selector("div", "class", "text"));
static ANCHOR_WITH_HREF: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("anchor selector parses"));

/// Extracts one normalized review from its container element.
///
/// Pure function of its inputs; the title fields are whatever the crawl
/// session knows at this point and are copied into the record verbatim.
pub fn extract_review(
    container: ElementRef<'_>,
    title_id: &str,
    title_name: Option<&str>,
    title_relative_path: Option<&str>,
    single_line_content: bool,
) -> UserReview {
    let review_id = nonempty_attr(container, REVIEW_ID_ATTR);

    let review_date = text_fragments(container, &REVIEW_DATE)
        .first()
        .and_then(|raw| parse_review_date(raw));

    let review_title = normalized_text(container, &REVIEW_TITLE, false);
    let feedback = feedback_counts(container);
    let has_spoilers = container.select(&SPOILER_WARNING).next().is_some();
    let rating = rating_pair(container);
    let (user_name, user_relative_path) = author_details(container);
    let content = normalized_text(container, &CONTENT_TEXT, single_line_content);

    UserReview {
        review_id,
        review_date,
        review_title,
        title_id: title_id.to_string(),
        title_name: title_name.map(str::to_string),
        title_relative_path: title_relative_path.map(str::to_string),
        total_feedback: feedback.map(|(_, total)| total),
        helpful_feedback: feedback.map(|(helpful, _)| helpful),
        maximum_rating: rating.map(|(_, maximum)| maximum),
        user_rating: rating.map(|(user, _)| user),
        has_spoilers,
        user_name,
        user_relative_path,
        content,
    }
}

/// Attribute value with surrounding whitespace stripped; empty counts as
/// absent.
pub(crate) fn nonempty_attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    let value = element.value().attr(name)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// All text fragments of every descendant matching `selector`, in document
/// order.
fn text_fragments(container: ElementRef<'_>, selector: &Selector) -> Vec<String> {
    container
        .select(selector)
        .flat_map(|element| element.text())
        .map(str::to_string)
        .collect()
}

/// Normalized text of the matching descendants, or `None` when they carry
/// no text at all.
fn normalized_text(
    container: ElementRef<'_>,
    selector: &Selector,
    single_line: bool,
) -> Option<String> {
    let fragments = text_fragments(container, selector);
    if fragments.is_empty() {
        return None;
    }
    let text = normalize_fragments(fragments.iter().map(String::as_str));
    if single_line {
        Some(collapse_newlines(&text))
    } else {
        Some(text)
    }
}

/// Both feedback counts, or neither. The phrase lives in free text inside
/// the actions block.
fn feedback_counts(container: ElementRef<'_>) -> Option<(u64, u64)> {
    let fragments = text_fragments(container, &FEEDBACK_ACTIONS);
    if fragments.is_empty() {
        return None;
    }
    parse_found_helpful(&fragments.concat())
}

/// The user rating and its `/N` scale, or neither.
///
/// The user value is the text of the element immediately preceding the
/// scale node. A scale with no parsable user value (or the reverse) clears
/// the pair: a rating without its scale is meaningless.
fn rating_pair(container: ElementRef<'_>) -> Option<(u32, u32)> {
    let scale = container.select(&POINT_SCALE).next()?;

    let user_rating = scale
        .prev_siblings()
        .find_map(ElementRef::wrap)
        .and_then(|element| {
            let text: String = element.text().collect();
            text.trim().parse::<u32>().ok()
        });

    let scale_text: String = scale.text().collect();
    let maximum_rating = parse_maximum_rating(&scale_text);

    match (user_rating, maximum_rating) {
        (Some(user), Some(maximum)) => Some((user, maximum)),
        _ => None,
    }
}

/// Reviewer name and query-stripped profile path from the first anchor with
/// a non-empty link target inside the author block.
fn author_details(container: ElementRef<'_>) -> (Option<String>, Option<String>) {
    let anchor = container
        .select(&AUTHOR_BLOCK)
        .flat_map(|block| block.select(&ANCHOR_WITH_HREF))
        .find(|a| {
            a.value()
                .attr("href")
                .map_or(false, |href| !href.trim().is_empty())
        });

    let anchor = match anchor {
        Some(anchor) => anchor,
        None => return (None, None),
    };

    let fragments: Vec<&str> = anchor.text().collect();
    let user_name = if fragments.is_empty() {
        None
    } else {
        Some(normalize_fragments(fragments))
    };
    let user_relative_path = anchor.value().attr("href").and_then(strip_query);

    (user_name, user_relative_path)
}
