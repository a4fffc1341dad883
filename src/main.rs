//! Reviewgrab entry point
//!
//! Retrieves the public user reviews for one or more IMDb titles and saves
//! the deduplicated union as a single CSV file.

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use reviewgrab::output::write_reviews_csv;
use reviewgrab::{CrawlConfig, ReviewCrawler, UserReview};

/// Retrieve IMDb user reviews for titles and save them as a CSV file.
#[derive(Parser, Debug)]
#[command(name = "reviewgrab")]
#[command(version)]
#[command(about = "Retrieve IMDb user reviews for titles and save them as CSV", long_about = None)]
struct Cli {
    /// CSV file to store the retrieved reviews
    #[arg(value_name = "OUTPUT_CSV")]
    output: PathBuf,

    /// IMDb title ids such as tt0012345
    #[arg(value_name = "TITLE_ID", required = true)]
    title_ids: Vec<String>,

    /// Archive raw fetched pages under this directory, one subdirectory per
    /// crawl session
    #[arg(long, value_name = "DIR")]
    archive_dir: Option<PathBuf>,

    /// Preserve line breaks inside review content instead of collapsing
    /// each review to a single line
    #[arg(long)]
    multiline: bool,

    /// Minimum delay between consecutive requests, in milliseconds
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = CrawlConfig {
        min_request_interval: Duration::from_millis(cli.delay_ms),
        ..CrawlConfig::default()
    };
    let crawler = ReviewCrawler::new(config).context("failed to build HTTP client")?;

    // Duplicate ids would only repeat work; the record set would collapse
    // their results anyway.
    let title_ids: BTreeSet<&str> = cli.title_ids.iter().map(String::as_str).collect();

    let mut all_reviews: HashSet<UserReview> = HashSet::new();
    for title_id in title_ids {
        let reviews = crawler
            .crawl_title(title_id, !cli.multiline, cli.archive_dir.as_deref())
            .await
            .with_context(|| format!("crawl failed for {title_id}"))?;
        all_reviews.extend(reviews);
    }

    if all_reviews.is_empty() {
        tracing::warn!("No reviews retrieved, not writing {}", cli.output.display());
        return Ok(());
    }

    let written = write_reviews_csv(&cli.output, &all_reviews)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    tracing::info!("Wrote {} reviews to {}", written, cli.output.display());

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("reviewgrab=info,warn"),
            1 => EnvFilter::new("reviewgrab=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
