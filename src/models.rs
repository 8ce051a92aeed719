//! Data models for the generated feeds.
//!
//! This module defines the structures handed to the output layer:
//! - [`Feed`]: channel metadata plus the ordered item list
//! - [`FeedItem`]: one news entry
//! - [`PubDate`]: a resolved timestamp, or the raw text when it could not be parsed
//!
//! A [`Feed`] is built fresh for every run and is never persisted.

use crate::dates::to_utc_string;
use chrono::{DateTime, FixedOffset};
use serde::{Serialize, Serializer};
use std::fmt;

/// Publication time of a [`FeedItem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PubDate {
    /// A resolved, timezone-qualified instant.
    At(DateTime<FixedOffset>),
    /// A candidate string that no known format could parse, kept verbatim.
    Raw(String),
}

impl fmt::Display for PubDate {
    /// UTC instants use the `GMT` wire form, other offsets RFC 2822.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PubDate::At(dt) if dt.offset().local_minus_utc() == 0 => {
                f.write_str(&to_utc_string(dt))
            }
            PubDate::At(dt) => f.write_str(&dt.to_rfc2822()),
            PubDate::Raw(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for PubDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single entry in a [`Feed`].
///
/// `link` is always absolute and non-empty. `author` is only filled by the
/// new-arrivals listing, `guid` only by the news pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "pubDate", skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<PubDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
}

impl FeedItem {
    /// Minimal record used when an article page could not be fetched or parsed.
    pub fn placeholder(link: &str) -> Self {
        Self {
            title: link.to_string(),
            link: link.to_string(),
            author: None,
            description: Some(String::new()),
            pub_date: None,
            guid: Some(link.to_string()),
        }
    }
}

/// The channel handed to a renderer.
#[derive(Debug, Clone, Serialize)]
pub struct Feed {
    pub title: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(rename = "item")]
    pub items: Vec<FeedItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[test]
    fn test_placeholder_uses_link_everywhere() {
        let item = FeedItem::placeholder("https://minkabu.jp/news/1");
        assert_eq!(item.title, "https://minkabu.jp/news/1");
        assert_eq!(item.guid.as_deref(), Some("https://minkabu.jp/news/1"));
        assert_eq!(item.description.as_deref(), Some(""));
        assert!(item.pub_date.is_none());
    }

    #[test]
    fn test_pub_date_display_keeps_offset() {
        let dt = jst().with_ymd_and_hms(2025, 11, 13, 16, 54, 0).unwrap();
        assert_eq!(
            PubDate::At(dt).to_string(),
            "Thu, 13 Nov 2025 16:54:00 +0900"
        );
    }

    #[test]
    fn test_pub_date_display_utc_uses_gmt() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let dt = utc.with_ymd_and_hms(2025, 11, 3, 7, 54, 0).unwrap();
        assert_eq!(PubDate::At(dt).to_string(), "Mon, 03 Nov 2025 07:54:00 GMT");
    }

    #[test]
    fn test_feed_item_skips_absent_fields() {
        let item = FeedItem {
            title: "見出し".to_string(),
            link: "https://minkabu.jp/news/1".to_string(),
            author: None,
            description: None,
            pub_date: Some(PubDate::Raw("昨日".to_string())),
            guid: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("author").is_none());
        assert!(json.get("description").is_none());
        assert_eq!(json["pubDate"], "昨日");
    }

    #[test]
    fn test_feed_serializes_items_as_item() {
        let feed = Feed {
            title: "Minkabu News".to_string(),
            link: "https://minkabu.jp/news".to_string(),
            description: None,
            language: Some("ja".to_string()),
            items: vec![FeedItem::placeholder("https://minkabu.jp/news/1")],
        };
        let json = serde_json::to_value(&feed).unwrap();
        assert_eq!(json["item"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["language"], "ja");
    }
}
