//! New-arrivals listing scraper.
//!
//! Everything comes from the listing page itself: one `<li>` per article,
//! with the headline link in `.title_box` and a row of small `<div>`s
//! holding the source (`配信元：`), the author (`著者：`) and the time.
//!
//! # Example entry
//!
//! ```text
//! <li>
//!   <div class="title_box"><a href="/news/4321">日経平均は続伸</a></div>
//!   <div class="flex flex-wrap gap-4 text-left text-sm">
//!     <div>配信元：みんかぶ</div><div>著者：山田</div><div>今日 16:54</div>
//!   </div>
//! </li>
//! ```

use crate::dates::{resolve_jp_datetime, tokyo};
use crate::errors::FeedError;
use crate::http::Fetcher;
use crate::models::{Feed, FeedItem, PubDate};
use crate::scrapers::Site;
use crate::utils::{absolute_url, element_text};
use chrono::{DateTime, FixedOffset, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};

const LISTING_PATH: &str = "/news/search?category=new_arrivals";
const FEED_TITLE: &str = "みんかぶ新着ニュース";

static ITEM_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#v-news-search-ssr ul.md_list > li").unwrap());
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse(".title_box a").unwrap());
static META_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.flex.flex-wrap.gap-4.text-left.text-sm > div").unwrap());
static CLOCK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{1,2}:\d{2}").unwrap());

/// Which metadata slot a classified `<div>` fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Source,
    Author,
    Time,
}

/// Ordered classification rules. For one `<div>` the first rule returning a
/// value claims it; across `<div>`s a later match overwrites an earlier one.
const RULES: &[(Field, fn(&str) -> Option<String>)] = &[
    (Field::Source, source_label),
    (Field::Author, author_label),
    (Field::Time, time_text),
];

fn source_label(text: &str) -> Option<String> {
    text.strip_prefix("配信元：").map(|rest| rest.trim().to_string())
}

fn author_label(text: &str) -> Option<String> {
    text.strip_prefix("著者：").map(|rest| rest.trim().to_string())
}

fn time_text(text: &str) -> Option<String> {
    let looks_like_time =
        CLOCK_RE.is_match(text) || text.starts_with("今日") || text.starts_with("昨日");
    looks_like_time.then(|| text.to_string())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Meta {
    source: Option<String>,
    author: Option<String>,
    time: Option<String>,
}

impl Meta {
    fn classify<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut meta = Self::default();
        for text in texts {
            let hit = RULES
                .iter()
                .find_map(|(field, rule)| rule(text).map(|value| (*field, value)));
            match hit {
                Some((Field::Source, v)) => meta.source = Some(v),
                Some((Field::Author, v)) => meta.author = Some(v),
                Some((Field::Time, v)) => meta.time = Some(v),
                None => {}
            }
        }
        meta
    }

    /// `source / author`, or `None` when neither is present.
    fn description(&self) -> Option<String> {
        let parts: Vec<&str> = [self.source.as_deref(), self.author.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" / "))
    }
}

/// Extract one feed item from a listing `<li>`.
///
/// Returns `None` when the entry has no usable headline link.
fn extract_item(
    li: ElementRef<'_>,
    site: &Site,
    now: DateTime<Utc>,
    tz: FixedOffset,
) -> Option<FeedItem> {
    let anchor = li.select(&TITLE_SELECTOR).next()?;
    let link = absolute_url(&site.base, anchor.value().attr("href")?)?;

    let title = match element_text(anchor) {
        t if t.is_empty() => link.clone(),
        t => t,
    };

    let texts: Vec<String> = li.select(&META_SELECTOR).map(element_text).collect();
    let meta = Meta::classify(texts.iter().map(String::as_str));

    let pub_date = meta
        .time
        .as_deref()
        .and_then(|t| resolve_jp_datetime(t, now, tz))
        .unwrap_or_else(|| now.with_timezone(&tz));

    Some(FeedItem {
        description: meta.description(),
        title,
        link,
        author: meta.author,
        pub_date: Some(PubDate::At(pub_date)),
        guid: None,
    })
}

/// Parse the new-arrivals listing into feed items, in page order.
///
/// `now` is used for `今日`/`昨日` and as the time of entries whose time is
/// missing or unreadable.
pub fn parse_new_arrivals(
    html: &str,
    site: &Site,
    now: DateTime<Utc>,
    tz: FixedOffset,
) -> Vec<FeedItem> {
    let document = Html::parse_document(html);
    let mut items = Vec::new();
    let mut skipped = 0usize;
    for li in document.select(&ITEM_SELECTOR) {
        match extract_item(li, site, now, tz) {
            Some(item) => items.push(item),
            None => skipped += 1,
        }
    }
    debug!(count = items.len(), skipped, "Parsed new-arrivals listing");
    items
}

/// Fetch the new-arrivals listing and build its feed.
///
/// # Errors
///
/// Any failure fetching the listing page is returned as is.
#[instrument(level = "info", skip_all)]
pub async fn fetch_new_arrivals(fetcher: &Fetcher, site: &Site) -> Result<Feed, FeedError> {
    let url = site.page(LISTING_PATH)?;
    let html = fetcher.get_text(url.as_str()).await?;
    let items = parse_new_arrivals(&html, site, Utc::now(), tokyo());

    info!(count = items.len(), source = %url, "Scraped new-arrivals listing");
    Ok(Feed {
        title: FEED_TITLE.to_string(),
        link: url.to_string(),
        description: None,
        language: Some("ja".to_string()),
        items,
    })
}
