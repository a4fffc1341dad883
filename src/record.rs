//! The normalized user-review record

use chrono::NaiveDate;
use serde::Serialize;

/// One normalized user review for a title.
///
/// Records are value types: equality and hashing cover every field, and the
/// crawl loop relies on that to collapse duplicates when pagination windows
/// overlap. Every field the source may omit is an `Option`; a record with
/// all optional fields empty is still structurally valid.
///
/// The two paired groups — `user_rating`/`maximum_rating` and
/// `helpful_feedback`/`total_feedback` — are always both present or both
/// absent. The extractor produces each pair in a single step
/// ([`crate::text::parse_found_helpful`] and the rating helper), so a lone
/// half can never reach a record.
///
/// Field declaration order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UserReview {
    /// Source-assigned review identifier
    pub review_id: Option<String>,

    /// Day the review was posted, if the textual date parsed
    pub review_date: Option<NaiveDate>,

    /// Headline of the review
    pub review_title: Option<String>,

    /// Caller-supplied title key, e.g. `tt0012345`
    pub title_id: String,

    /// Display name of the title, discovered once per crawl
    pub title_name: Option<String>,

    /// Relative path of the title page, query-stripped
    pub title_relative_path: Option<String>,

    /// How many readers voted on the review at all
    pub total_feedback: Option<u64>,

    /// How many of those found it helpful
    pub helpful_feedback: Option<u64>,

    /// Upper end of the rating scale, from the `/N` suffix
    pub maximum_rating: Option<u32>,

    /// The reviewer's rating on that scale
    pub user_rating: Option<u32>,

    /// Whether the review carries a spoiler marker
    pub has_spoilers: bool,

    /// Display name of the reviewer
    pub user_name: Option<String>,

    /// Relative path of the reviewer's profile, query-stripped
    pub user_relative_path: Option<String>,

    /// Review body; newline-joined, or single-line when requested
    pub content: Option<String>,
}

impl UserReview {
    /// Column names in declaration order, matching the serialized header.
    pub fn field_names() -> &'static [&'static str] {
        &[
            "review_id",
            "review_date",
            "review_title",
            "title_id",
            "title_name",
            "title_relative_path",
            "total_feedback",
            "helpful_feedback",
            "maximum_rating",
            "user_rating",
            "has_spoilers",
            "user_name",
            "user_relative_path",
            "content",
        ]
    }
}
