//! Feed rendering and delivery.
//!
//! # Submodules
//!
//! - [`rss`]: RSS 2.0 via `quick-xml`
//! - [`json`]: the feed model as JSON
//!
//! [`write_feed`] sends the rendered document to a file or to stdout.

use crate::errors::FeedError;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};

pub mod json;
pub mod rss;

/// Write a rendered feed to `path`, or to stdout when no path is given.
#[instrument(level = "info", skip(document))]
pub async fn write_feed(document: &str, path: Option<&Path>) -> Result<(), FeedError> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).await?;
            }
            fs::write(path, document).await?;
            info!(path = %path.display(), bytes = document.len(), "Wrote feed");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(document.as_bytes()).await?;
            if !document.ends_with('\n') {
                stdout.write_all(b"\n").await?;
            }
            stdout.flush().await?;
        }
    }
    Ok(())
}
