//! News listing scraper.
//!
//! The listing only gives us links, so every article page is fetched to
//! fill in title, description and publication time. Fetches run
//! concurrently through a [`Memo`] keyed by link; one failing article
//! degrades to a placeholder item instead of failing the feed.

use crate::cache::Memo;
use crate::dates::{normalize_pub_date, tokyo};
use crate::errors::FeedError;
use crate::http::Fetcher;
use crate::models::{Feed, FeedItem};
use crate::scrapers::{MAX_ITEMS, Site};
use crate::utils::{absolute_url, element_text, truncate_for_log};
use futures::future::join_all;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};

const LISTING_PATH: &str = "/news";
const FEED_TITLE: &str = "Minkabu News";
const FEED_DESCRIPTION: &str = "Latest news from minkabu.jp";

static ARTICLE_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href^="/news/"]"#).unwrap());

/// Where a field value may come from on an article page.
#[derive(Debug, Clone, Copy)]
enum Candidate {
    /// Attribute of the first element matching the selector.
    Attr(&'static str, &'static str),
    /// Trimmed text of the first element matching the selector.
    Text(&'static str),
}

const DESCRIPTION_CANDIDATES: &[Candidate] = &[
    Candidate::Attr(r#"meta[property="og:description"]"#, "content"),
    Candidate::Attr(r#"meta[name="description"]"#, "content"),
    Candidate::Text("article p"),
    Candidate::Text("p"),
];

const TITLE_CANDIDATES: &[Candidate] = &[
    Candidate::Attr(r#"meta[property="og:title"]"#, "content"),
    Candidate::Text("title"),
    Candidate::Text("h1"),
];

const PUB_DATE_CANDIDATES: &[Candidate] = &[
    Candidate::Attr(r#"meta[property="article:published_time"]"#, "content"),
    Candidate::Attr(r#"meta[name="pubdate"]"#, "content"),
    Candidate::Attr("time", "datetime"),
    Candidate::Text("time"),
];

impl Candidate {
    fn read(self, document: &Html) -> Option<String> {
        let (css, attr) = match self {
            Candidate::Attr(css, attr) => (css, Some(attr)),
            Candidate::Text(css) => (css, None),
        };
        let selector = Selector::parse(css).ok()?;
        let element = document.select(&selector).next()?;
        let value = match attr {
            Some(name) => element.value().attr(name)?.trim().to_string(),
            None => element_text(element),
        };
        (!value.is_empty()).then_some(value)
    }
}

/// First non-empty value among `candidates`, in order.
fn first_non_empty(document: &Html, candidates: &[Candidate]) -> Option<String> {
    candidates.iter().find_map(|c| c.read(document))
}

/// Result of resolving one article.
#[derive(Debug, Clone)]
pub enum ArticleOutcome {
    Parsed(FeedItem),
    /// The article could not be fetched; `item` is the placeholder record.
    Degraded { item: FeedItem, reason: String },
}

impl ArticleOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, ArticleOutcome::Degraded { .. })
    }

    pub fn into_item(self) -> FeedItem {
        match self {
            ArticleOutcome::Parsed(item) | ArticleOutcome::Degraded { item, .. } => item,
        }
    }
}

/// Collect distinct article links from the listing, in first-seen order,
/// capped at `limit`.
///
/// Links are compared after resolution, so `/news/1 ` and `/news/./1` count
/// as `/news/1`, and unresolvable hrefs never take a slot.
pub fn collect_article_links(html: &str, site: &Site, limit: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&ARTICLE_LINK_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| absolute_url(&site.base, href))
        .unique()
        .take(limit)
        .collect()
}

/// Build a feed item from an article page.
pub fn parse_article(html: &str, link: &str) -> FeedItem {
    let document = Html::parse_document(html);

    let description = first_non_empty(&document, DESCRIPTION_CANDIDATES).unwrap_or_default();
    let title =
        first_non_empty(&document, TITLE_CANDIDATES).unwrap_or_else(|| link.to_string());
    let pub_date = first_non_empty(&document, PUB_DATE_CANDIDATES)
        .map(|raw| normalize_pub_date(&raw, tokyo()));

    debug!(
        %link,
        %title,
        description = %truncate_for_log(&description, 60),
        has_pub_date = pub_date.is_some(),
        "Parsed article"
    );

    FeedItem {
        title,
        link: link.to_string(),
        author: None,
        description: Some(description),
        pub_date,
        guid: Some(link.to_string()),
    }
}

/// Fetch and parse one article, degrading instead of failing.
#[instrument(level = "debug", skip(fetcher))]
pub async fn fetch_article(fetcher: &Fetcher, link: &str) -> ArticleOutcome {
    match fetcher.get_text(link).await {
        Ok(html) => ArticleOutcome::Parsed(parse_article(&html, link)),
        Err(e) => {
            warn!(error = %e, %link, "Article fetch failed; using placeholder");
            ArticleOutcome::Degraded {
                item: FeedItem::placeholder(link),
                reason: e.to_string(),
            }
        }
    }
}

/// Fetch the news listing, then every linked article, and build the feed.
///
/// Articles are fetched concurrently; item order follows the listing.
///
/// # Errors
///
/// Only a failure fetching the listing itself is returned.
#[instrument(level = "info", skip_all)]
pub async fn fetch_news(
    fetcher: &Fetcher,
    site: &Site,
    cache: &Memo<ArticleOutcome>,
) -> Result<Feed, FeedError> {
    let url = site.page(LISTING_PATH)?;
    let html = fetcher.get_text(url.as_str()).await?;
    let links = collect_article_links(&html, site, MAX_ITEMS);
    info!(count = links.len(), source = %url, "Indexed news article links");

    let outcomes = join_all(links.iter().map(|link| {
        let fetcher = fetcher.clone();
        let key = link.clone();
        cache.get_or_insert_with(link, move || async move { fetch_article(&fetcher, &key).await })
    }))
    .await;

    for outcome in &outcomes {
        if let ArticleOutcome::Degraded { item, reason } = outcome {
            debug!(link = %item.link, %reason, "Serving placeholder item");
        }
    }
    let degraded = outcomes.iter().filter(|o| o.is_degraded()).count();
    let items: Vec<FeedItem> = outcomes.into_iter().map(ArticleOutcome::into_item).collect();
    info!(count = items.len(), degraded, "Fetched news articles");

    Ok(Feed {
        title: FEED_TITLE.to_string(),
        link: url.to_string(),
        description: Some(FEED_DESCRIPTION.to_string()),
        language: None,
        items,
    })
}
