//! Normalised item types produced by the source adapters.
//!
//! Each upstream has its own shape, so each gets its own struct.  What they
//! share is the small [`Headline`] interface: a title to filter on and a link
//! to show next to the card.
//!
//! ## For contributors
//!
//! A new source normally adds one struct here and an `impl Headline` for it.
//! The filter engine and the UI only ever go through [`Headline`].

use std::borrow::Cow;

use serde::Deserialize;

/// Minimal view of an item shared by filtering and rendering.
pub trait Headline {
    /// Display title.  `None` when the upstream record had none; such items
    /// never match a non-empty search.
    fn title(&self) -> Option<&str>;

    /// Where the card points to.
    fn link(&self) -> Cow<'_, str>;
}

/// One entry of the search-trend feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendItem {
    pub title: String,
    /// Approximate search volume, e.g. `"200,000+"`.
    pub traffic_label: String,
    pub link: String,
}

/// One post from the social link aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialPost {
    pub title: String,
    /// Prefixed community name, e.g. `"r/rust"`.
    pub community: String,
    pub upvotes: i64,
    pub comment_count: Option<u64>,
    /// Absolute URL of the discussion page.
    pub url: String,
    /// Only ever an absolute URL.
    pub thumbnail: Option<String>,
}

/// One story from the tech-news API.
///
/// Deserialised straight from the item endpoint.  Job postings and polls
/// omit most fields, so everything except `id` is defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewsItem {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "by", default)]
    pub author: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "descendants", default)]
    pub comment_count: Option<u64>,
}

impl NewsItem {
    /// The story's comment page on news.ycombinator.com.
    pub fn discussion_url(&self) -> String {
        format!("https://news.ycombinator.com/item?id={}", self.id)
    }
}

impl Headline for TrendItem {
    fn title(&self) -> Option<&str> {
        Some(&self.title)
    }

    fn link(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.link)
    }
}

impl Headline for SocialPost {
    fn title(&self) -> Option<&str> {
        Some(&self.title)
    }

    fn link(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.url)
    }
}

impl Headline for NewsItem {
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Falls back to the discussion page for text posts (Ask HN etc.).
    fn link(&self) -> Cow<'_, str> {
        match &self.url {
            Some(url) => Cow::Borrowed(url),
            None => Cow::Owned(self.discussion_url()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
