//! HTTP fetch primitive shared by both pipelines.

use crate::errors::FeedError;
use reqwest::{Client, ClientBuilder, header};
use std::time::Duration;
use tracing::{debug, instrument};

const USER_AGENT: &str = concat!("minkabu_feed/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper around a shared [`reqwest::Client`].
///
/// Timeouts are the only cancellation mechanism; there are no retries.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, FeedError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static("ja,en;q=0.8"),
        );

        let client = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .default_headers(headers)
            .build()?;
        Ok(Self { client })
    }

    /// GET `url` and return the decoded body.
    ///
    /// # Errors
    ///
    /// Transport failures map to [`FeedError::Request`], non-2xx responses
    /// to [`FeedError::Status`].
    #[instrument(level = "debug", skip(self))]
    pub async fn get_text(&self, url: &str) -> Result<String, FeedError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status,
            });
        }
        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
