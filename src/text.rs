//! Shared text helpers
//!
//! Fragment normalization plus the small textual grammars review pages
//! embed: the day-month-year posting date, the "X out of Y found this
//! helpful" phrase and the "/N" rating-scale suffix. All parsers degrade to
//! `None` on malformed input; nothing here can fail a whole record.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches "7 out of 9 found this helpful" style phrases from the start of
/// the feedback text. Digit groups may carry thousands separators.
static FOUND_HELPFUL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\A\D*(?P<helpful>\d{1,3}(?:,\d{3})*)\s+out\s+of\s+(?P<total>\d{1,3}(?:,\d{3})*)\s+found\s+this\s+helpful",
    )
    .unwrap()
});

/// Matches the "/N" suffix of a rating scale node, e.g. "/10".
static MAXIMUM_RATING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A\D*/(?P<max>\d+)").unwrap());

/// Joins raw text fragments into normalized text: each fragment is trimmed,
/// empty fragments are dropped, and the survivors join with a single
/// newline.
pub fn normalize_fragments<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    fragments
        .into_iter()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapses embedded newlines to single spaces, for single-line output
/// such as CSV cells.
pub fn collapse_newlines(text: &str) -> String {
    text.split('\n').collect::<Vec<_>>().join(" ")
}

/// Parses a textual review date such as `12 March 2020`.
///
/// chrono matches `%B` against its fixed English month-name table, so the
/// result never depends on process locale state and concurrent crawls
/// cannot race on it.
pub fn parse_review_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%d %B %Y").ok()
}

/// Extracts the helpful/total vote counts from the feedback phrase.
///
/// Returns both counts or neither; a phrase that is absent or malformed
/// yields `None` for the pair.
pub fn parse_found_helpful(text: &str) -> Option<(u64, u64)> {
    let captures = FOUND_HELPFUL_RE.captures(text)?;
    let helpful = parse_separated_number(captures.name("helpful")?.as_str())?;
    let total = parse_separated_number(captures.name("total")?.as_str())?;
    Some((helpful, total))
}

/// Extracts the maximum rating from a scale suffix such as `/10`.
pub fn parse_maximum_rating(text: &str) -> Option<u32> {
    MAXIMUM_RATING_RE
        .captures(text)?
        .name("max")?
        .as_str()
        .parse()
        .ok()
}

/// Parses an integer that may carry thousands separators, e.g. `1,234`.
fn parse_separated_number(raw: &str) -> Option<u64> {
    raw.replace(',', "").parse().ok()
}
