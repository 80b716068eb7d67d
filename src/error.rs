//! Error types for fetching and refreshing.

use std::time::Duration;

use thiserror::Error;

/// Why a single source produced no data.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RSS parse error: {0}")]
    Rss(#[from] rss::Error),

    #[error("CORS relay returned no contents (upstream status {0:?})")]
    EmptyRelay(Option<u16>),

    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl SourceError {
    /// True when the request never reached the upstream host.
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_connect())
    }
}

/// A refresh that could not produce any state at all.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("no source could be reached, the network appears to be down")]
    Offline,
}
