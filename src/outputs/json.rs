//! JSON rendering.
//!
//! The document mirrors the feed model directly: channel fields at the top
//! level, entries under `item`, absent optional fields omitted.

use crate::errors::FeedError;
use crate::models::Feed;

/// Serialize `feed` as pretty-printed JSON.
pub fn feed_to_json(feed: &Feed) -> Result<String, FeedError> {
    Ok(serde_json::to_string_pretty(feed)?)
}
