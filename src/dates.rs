//! Date handling for the minkabu listings.
//!
//! The site prints times in three shapes: `今日 16:54` (today), `昨日 08:32`
//! (yesterday) and `2025/11/03 16:54`. All of them are wall-clock times in
//! Japan, so they are resolved against a fixed +09:00 offset. Anything else
//! goes through [`parse_loose`], a format-unaware best effort parser.
//!
//! "Now" and the zone are always passed in, so every function here is
//! deterministic under test.

use crate::models::PubDate;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

/// Offset of Asia/Tokyo. Japan has no daylight saving, so a fixed offset is exact.
pub const JST_OFFSET_SECS: i32 = 9 * 3600;

static FULL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})/(\d{1,2})/(\d{1,2})\s+(\d{1,2}):(\d{2})$").unwrap());
static TODAY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^今日\s+(\d{1,2}):(\d{2})$").unwrap());
static YESTERDAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^昨日\s+(\d{1,2}):(\d{2})$").unwrap());

/// Formats carrying their own offset.
const OFFSET_PATTERNS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S %z",
];

/// Date-times without an offset, read as wall-clock time in the caller's zone.
const NAIVE_DATETIME_PATTERNS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y年%m月%d日 %H:%M",
    "%Y年%m月%d日 %H時%M分",
];

/// Bare dates, pinned to midnight in the caller's zone.
const NAIVE_DATE_PATTERNS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y年%m月%d日",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// The fixed zone every listing time is anchored to.
pub fn tokyo() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).expect("+09:00 is a valid offset")
}

/// Resolve a listing time fragment into an absolute time in `tz`.
///
/// Patterns are tried in a fixed order, first match wins:
///
/// 1. `YYYY/M/D H:mm`
/// 2. `今日 H:mm`, today's date in `tz`
/// 3. `昨日 H:mm`, the calendar day before today in `tz`
/// 4. [`parse_loose`] on the raw text
///
/// A pattern that matches but names an impossible time (`今日 25:00`) falls
/// through to step 4 like any other text. `None` means the time is unknown
/// and the caller picks its own fallback.
pub fn resolve_jp_datetime(
    text: &str,
    now: DateTime<Utc>,
    tz: FixedOffset,
) -> Option<DateTime<FixedOffset>> {
    // Computed once so today and yesterday can never straddle midnight.
    let today = now.with_timezone(&tz).date_naive();
    let m = text.trim();

    let matched = if let Some(c) = FULL_RE.captures(m) {
        full_date(&c).and_then(|date| at(tz, date, &c[4], &c[5]))
    } else if let Some(c) = TODAY_RE.captures(m) {
        at(tz, today, &c[1], &c[2])
    } else if let Some(c) = YESTERDAY_RE.captures(m) {
        today.pred_opt().and_then(|day| at(tz, day, &c[1], &c[2]))
    } else {
        None
    };

    matched.or_else(|| {
        debug!(text = m, "No listing pattern matched; trying generic parse");
        parse_loose(m, tz).map(|dt| dt.with_timezone(&tz))
    })
}

fn full_date(c: &Captures<'_>) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(c[1].parse().ok()?, c[2].parse().ok()?, c[3].parse().ok()?)
}

fn at(tz: FixedOffset, date: NaiveDate, hh: &str, mm: &str) -> Option<DateTime<FixedOffset>> {
    let time = NaiveTime::from_hms_opt(hh.parse().ok()?, mm.parse().ok()?, 0)?;
    tz.from_local_datetime(&date.and_time(time)).single()
}

/// Best-effort parse of a date string in an unknown format.
///
/// Offset-bearing formats keep their own offset; naive ones are read as
/// wall-clock time in `tz`.
pub fn parse_loose(text: &str, tz: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt);
    }
    for pat in OFFSET_PATTERNS {
        if let Ok(dt) = DateTime::parse_from_str(s, pat) {
            return Some(dt);
        }
    }
    for pat in NAIVE_DATETIME_PATTERNS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, pat) {
            return tz.from_local_datetime(&naive).single();
        }
    }
    for pat in NAIVE_DATE_PATTERNS {
        if let Ok(date) = NaiveDate::parse_from_str(s, pat) {
            return date
                .and_hms_opt(0, 0, 0)
                .and_then(|naive| tz.from_local_datetime(&naive).single());
        }
    }

    None
}

/// Format an instant as `Mon, 03 Nov 2025 07:54:00 GMT`.
pub fn to_utc_string<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    dt.with_timezone(&Utc)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// An ISO calendar date (`2025-11-03`) read as UTC midnight, the way web
/// date parsers read date-only ISO strings.
fn parse_iso_date_utc(text: &str) -> Option<DateTime<FixedOffset>> {
    let date = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().fixed_offset())
}

/// Normalize an article's publication candidate.
///
/// Parsable values become a UTC instant; anything else is kept verbatim
/// instead of being thrown away. Bare ISO dates are UTC midnight, other
/// naive values are wall-clock time in `tz`.
pub fn normalize_pub_date(raw: &str, tz: FixedOffset) -> PubDate {
    match parse_iso_date_utc(raw).or_else(|| parse_loose(raw, tz)) {
        Some(dt) => PubDate::At(dt.with_timezone(&Utc).fixed_offset()),
        None => PubDate::Raw(raw.to_string()),
    }
}
