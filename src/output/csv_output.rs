//! CSV serialization of review records

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::record::UserReview;

/// Errors that can occur while writing the output file
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes the record set as CSV to `path`.
///
/// The header row is the record's field names; all records share the same
/// schema, so the first record is representative of every other.
///
/// # Arguments
///
/// * `path` - Destination file, created or truncated
/// * `reviews` - The deduplicated record set to serialize
///
/// # Returns
///
/// The number of records written.
pub fn write_reviews_csv(
    path: &Path,
    reviews: &HashSet<UserReview>,
) -> Result<usize, OutputError> {
    let file = std::fs::File::create(path)?;
    write_reviews(file, reviews)
}

/// Writes the record set as CSV to any writer.
///
/// Rows are sorted by title id and review id so repeated crawls produce
/// diffable files.
pub fn write_reviews<W: Write>(
    writer: W,
    reviews: &HashSet<UserReview>,
) -> Result<usize, OutputError> {
    let mut rows: Vec<&UserReview> = reviews.iter().collect();
    rows.sort_by(|a, b| {
        (&a.title_id, &a.review_id).cmp(&(&b.title_id, &b.review_id))
    });

    let mut csv_writer = csv::Writer::from_writer(writer);
    for review in &rows {
        csv_writer.serialize(review)?;
    }
    csv_writer.flush()?;

    Ok(rows.len())
}
