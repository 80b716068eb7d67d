//! Data source abstraction layer.
//!
//! This module defines the [`DataSource`] trait, the normalised item types
//! and one adapter per upstream:
//!
//! * [`TrendSource`]: daily search trends (RSS, optionally via a CORS relay)
//! * [`SocialSource`]: the social link aggregator's popular listing (JSON)
//! * [`NewsSource`]: tech-news top stories (id list, then one request per id)
//!
//! ## For contributors: adding a new source
//!
//! 1. Create a new file in this directory (e.g. `lobsters.rs`).
//! 2. Add an item struct to [`item`] and implement [`Headline`] for it.
//! 3. Implement [`DataSource`] for your adapter.
//! 4. Give `AggregatedState` a list for it and fan out to it in the aggregator.

mod item;
mod news;
mod social;
mod trend;

pub use item::{Headline, NewsItem, SocialPost, TrendItem};
pub use news::NewsSource;
pub use social::SocialSource;
pub use trend::TrendSource;

use std::future::Future;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::debug;

use crate::error::SourceError;

/// Trait that every upstream adapter implements.
///
/// The aggregator runs all adapters concurrently on the tokio runtime, so the
/// returned future must be [`Send`].
pub trait DataSource {
    /// Normalised item type this source yields.
    type Item;

    /// Short label used in logs and failure reports.
    fn name(&self) -> &'static str;

    /// Fetch the latest items from the fixed upstream, in upstream order.
    fn fetch_items(&self) -> impl Future<Output = Result<Vec<Self::Item>, SourceError>> + Send;
}

/// GET `url` and return the body, treating non-2xx statuses as errors.
async fn get_text(client: &reqwest::Client, url: &str) -> Result<String, SourceError> {
    debug!(url, "GET");
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(body)
}

/// Characters left alone by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode `s` for use as a single query parameter value.
fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}
