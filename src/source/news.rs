//! Tech-news source (Hacker News Firebase API).
//!
//! Two steps: the top-stories endpoint returns ranked ids, then each of the
//! first [`NEWS_LIMIT`] ids is fetched on its own.  Detail requests run
//! concurrently; the list is small enough that no cap is needed.

use futures::future::join_all;
use tracing::{debug, warn};

use super::{get_text, DataSource, NewsItem};
use crate::error::SourceError;

/// Maximum number of stories kept per refresh.
pub const NEWS_LIMIT: usize = 10;

/// Top-stories adapter.
pub struct NewsSource {
    client: reqwest::Client,
    /// API root, e.g. `https://hacker-news.firebaseio.com/v0`.
    base_url: String,
}

impl NewsSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn top_story_ids(&self) -> Result<Vec<u64>, SourceError> {
        let url = format!("{}/topstories.json", self.base_url);
        let body = get_text(&self.client, &url).await?;
        let ids: Vec<u64> = serde_json::from_str(&body)?;
        Ok(ids)
    }

    /// Fetch one item.  `Ok(None)` is the API's `null` for deleted or
    /// missing ids.
    async fn item(&self, id: u64) -> Result<Option<NewsItem>, SourceError> {
        let url = format!("{}/item/{id}.json", self.base_url);
        let body = get_text(&self.client, &url).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl DataSource for NewsSource {
    type Item = NewsItem;

    fn name(&self) -> &'static str {
        "news"
    }

    async fn fetch_items(&self) -> Result<Vec<NewsItem>, SourceError> {
        let ids = self.top_story_ids().await?;
        let details = join_all(ids.iter().take(NEWS_LIMIT).map(|&id| self.item(id))).await;

        let items = ids
            .iter()
            .zip(details)
            .filter_map(|(id, detail)| match detail {
                Ok(Some(item)) => Some(item),
                Ok(None) => {
                    debug!(id, "dropping null news item");
                    None
                }
                Err(e) => {
                    warn!(id, error = %e, "dropping news item that failed to load");
                    None
                }
            })
            .collect();

        Ok(items)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
