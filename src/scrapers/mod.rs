//! minkabu.jp scrapers.
//!
//! Two listings are supported, each turned into a [`Feed`](crate::models::Feed):
//!
//! | Route | Module | Listing | Detail pages |
//! |-------|--------|---------|--------------|
//! | `new-arrivals` | [`new_arrivals`] | `/news/search?category=new_arrivals` | never fetched |
//! | `news` | [`news`] | `/news` | up to [`MAX_ITEMS`], concurrently, memoized |
//!
//! Each module exposes a pure `parse_*` function over HTML text and an async
//! `fetch_*` that performs the network I/O. A failed listing fetch fails the
//! whole run; markup that no longer matches only drops fields or items.

use crate::errors::FeedError;
use url::Url;

pub mod new_arrivals;
pub mod news;

/// Production origin of the site.
pub const DEFAULT_BASE_URL: &str = "https://minkabu.jp";

/// Upper bound on the number of articles the news listing fetches.
pub const MAX_ITEMS: usize = 15;

/// The site every path and relative link is resolved against.
#[derive(Debug, Clone)]
pub struct Site {
    pub base: Url,
}

impl Site {
    pub fn new(base_url: &str) -> Result<Self, FeedError> {
        Ok(Self {
            base: Url::parse(base_url)?,
        })
    }

    /// Absolute URL for a site path such as `/news`.
    pub fn page(&self, path_and_query: &str) -> Result<Url, FeedError> {
        Ok(self.base.join(path_and_query)?)
    }
}
