//! # minkabu_feed
//!
//! Turns the news listings of [minkabu.jp](https://minkabu.jp) into RSS or
//! JSON feeds.
//!
//! ## Usage
//!
//! ```sh
//! minkabu_feed new-arrivals > new_arrivals.xml
//! minkabu_feed news -f json -o news.json
//! ```
//!
//! ## Architecture
//!
//! Each run is one short pipeline:
//! 1. **Listing**: fetch the listing page (a failure here fails the run)
//! 2. **Extraction**: pull items out of the listing (`new-arrivals`), or
//!    fetch up to 15 linked articles concurrently and read their metadata (`news`)
//! 3. **Output**: render RSS or JSON and write it to a file or stdout

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cache;
mod cli;
mod dates;
mod errors;
mod http;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cache::Memo;
use cli::{Cli, Format, Route};
use errors::FeedError;
use http::Fetcher;
use models::Feed;
use scrapers::{Site, new_arrivals, news};

/// Scrape the listing selected by `route`.
async fn build_feed(route: Route, fetcher: &Fetcher, site: &Site) -> Result<Feed, FeedError> {
    match route {
        Route::NewArrivals => new_arrivals::fetch_new_arrivals(fetcher, site).await,
        Route::News => {
            let cache = Memo::default();
            news::fetch_news(fetcher, site, &cache).await
        }
    }
}

fn render(feed: &Feed, format: Format) -> Result<String, FeedError> {
    match format {
        Format::Rss => outputs::rss::feed_to_rss(feed),
        Format::Json => outputs::json::feed_to_json(feed),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr; stdout may carry the feed itself.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let site = Site::new(&args.base_url)?;
    let fetcher = Fetcher::new(Duration::from_secs(args.timeout_secs))?;

    let feed = match build_feed(args.route, &fetcher, &site).await {
        Ok(feed) => feed,
        Err(e) => {
            error!(route = ?args.route, error = %e, "Feed generation failed");
            return Err(e.into());
        }
    };

    let document = render(&feed, args.format)?;
    outputs::write_feed(&document, args.output.as_deref()).await?;

    let elapsed = start_time.elapsed();
    info!(
        route = ?args.route,
        items = feed.items.len(),
        millis = elapsed.as_millis() as u64,
        "Execution complete"
    );
    Ok(())
}
