//! Social link-aggregator source (Reddit listing JSON).

use serde::Deserialize;

use super::{get_text, DataSource, SocialPost};
use crate::error::SourceError;

/// Maximum number of posts kept per refresh.
pub const SOCIAL_LIMIT: usize = 12;

const PERMALINK_BASE: &str = "https://reddit.com";

/// Listing wrapper: `{"data": {"children": [{"data": {…}}]}}`.
#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    #[serde(default)]
    title: String,
    #[serde(default)]
    subreddit_name_prefixed: String,
    #[serde(default)]
    ups: i64,
    num_comments: Option<u64>,
    #[serde(default)]
    permalink: String,
    thumbnail: Option<String>,
}

/// Popular-posts listing adapter.
pub struct SocialSource {
    client: reqwest::Client,
    /// Listing endpoint without query, e.g. `https://www.reddit.com/r/popular.json`.
    listing_url: String,
}

impl SocialSource {
    pub fn new(client: reqwest::Client, listing_url: impl Into<String>) -> Self {
        Self {
            client,
            listing_url: listing_url.into(),
        }
    }

    fn request_url(&self) -> String {
        format!("{}?limit={SOCIAL_LIMIT}", self.listing_url)
    }

    /// Decode a listing body into at most [`SOCIAL_LIMIT`] posts.
    pub fn parse_listing(body: &str) -> Result<Vec<SocialPost>, SourceError> {
        let listing: Listing = serde_json::from_str(body)?;
        Ok(listing
            .data
            .children
            .into_iter()
            .take(SOCIAL_LIMIT)
            .map(|child| to_post(child.data))
            .collect())
    }
}

fn to_post(data: PostData) -> SocialPost {
    let url = if data.permalink.starts_with("http") {
        data.permalink
    } else {
        format!("{PERMALINK_BASE}{}", data.permalink)
    };

    // The API uses sentinels like "self", "default" and "nsfw" instead of
    // leaving the field out.
    let thumbnail = data.thumbnail.filter(|t| t.starts_with("http"));

    SocialPost {
        title: data.title,
        community: data.subreddit_name_prefixed,
        upvotes: data.ups,
        comment_count: data.num_comments,
        url,
        thumbnail,
    }
}

impl DataSource for SocialSource {
    type Item = SocialPost;

    fn name(&self) -> &'static str {
        "social"
    }

    async fn fetch_items(&self) -> Result<Vec<SocialPost>, SourceError> {
        let body = get_text(&self.client, &self.request_url()).await?;
        Self::parse_listing(&body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
