//! Error type shared by the fetch primitive, the pipelines and the renderers.

use thiserror::Error;

/// Everything that can stop a feed from being generated.
///
/// Per-article failures in the news pipeline are also expressed with this
/// type, but they are caught and turned into degraded items before they can
/// reach the caller.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("http error {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("render error: {0}")]
    Render(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for FeedError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Render(err.to_string())
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Render(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_names_url() {
        let err = FeedError::Status {
            url: "https://minkabu.jp/news".to_string(),
            status: reqwest::StatusCode::BAD_GATEWAY,
        };
        let msg = err.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("https://minkabu.jp/news"));
    }

    #[test]
    fn test_url_parse_error_converts() {
        let err: FeedError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, FeedError::InvalidUrl(_)));
    }
}
