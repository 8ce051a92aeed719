//! RSS 2.0 rendering.
//!
//! # Output shape
//!
//! ```text
//! <rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
//!   <channel>
//!     <title/> <link/> <description/> <language/>
//!     <item> <title/> <link/> <description/> <dc:creator/> <guid/> <pubDate/> </item>
//!   </channel>
//! </rss>
//! ```
//!
//! Absent optional fields produce no element at all. Bylines are plain names,
//! not the email addresses RSS `<author>` requires, so they go in `dc:creator`.

use crate::errors::FeedError;
use crate::models::{Feed, FeedItem};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";

fn write_text_element<W: Write>(w: &mut Writer<W>, name: &str, text: &str) -> Result<(), FeedError> {
    w.write_event(Event::Start(BytesStart::new(name)))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_item<W: Write>(w: &mut Writer<W>, item: &FeedItem) -> Result<(), FeedError> {
    w.write_event(Event::Start(BytesStart::new("item")))?;
    write_text_element(w, "title", &item.title)?;
    write_text_element(w, "link", &item.link)?;
    if let Some(description) = &item.description {
        write_text_element(w, "description", description)?;
    }
    if let Some(author) = &item.author {
        write_text_element(w, "dc:creator", author)?;
    }
    if let Some(guid) = &item.guid {
        let mut start = BytesStart::new("guid");
        start.push_attribute(("isPermaLink", "true"));
        w.write_event(Event::Start(start))?;
        w.write_event(Event::Text(BytesText::new(guid)))?;
        w.write_event(Event::End(BytesEnd::new("guid")))?;
    }
    if let Some(pub_date) = &item.pub_date {
        write_text_element(w, "pubDate", &pub_date.to_string())?;
    }
    w.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

/// Render `feed` as an RSS 2.0 document.
pub fn feed_to_rss(feed: &Feed) -> Result<String, FeedError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:dc", DC_NAMESPACE));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", &feed.title)?;
    write_text_element(&mut writer, "link", &feed.link)?;
    write_text_element(
        &mut writer,
        "description",
        feed.description.as_deref().unwrap_or(&feed.title),
    )?;
    if let Some(language) = &feed.language {
        write_text_element(&mut writer, "language", language)?;
    }
    for item in &feed.items {
        write_item(&mut writer, item)?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| FeedError::Render(e.to_string()))
}
