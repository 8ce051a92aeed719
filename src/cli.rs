//! Command-line interface definitions for minkabu_feed.
//!
//! All options except the route can also come from environment variables.

use crate::scrapers::DEFAULT_BASE_URL;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Which listing to turn into a feed.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// New arrivals listing, no article pages fetched
    NewArrivals,
    /// News listing, each article page fetched for details
    News,
}

/// Output document format.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Rss,
    Json,
}

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # RSS for the new-arrivals listing on stdout
/// minkabu_feed new-arrivals
///
/// # JSON for the news listing, written to a file
/// minkabu_feed news -f json -o ./feeds/news.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Listing to scrape
    #[arg(value_enum)]
    pub route: Route,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Rss)]
    pub format: Format,

    /// Write the feed here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Site origin; only worth changing to point at a mirror or a mock server
    #[arg(long, env = "MINKABU_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "MINKABU_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}
