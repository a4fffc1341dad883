//! Output module for serializing the final record set
//!
//! The crawl produces an in-memory set of records; this module is the sink
//! that turns it into a CSV file with a stable header and row order.

mod csv_output;

pub use csv_output::{write_reviews, write_reviews_csv, OutputError};
