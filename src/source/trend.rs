//! Daily search-trend feed source.
//!
//! The feed is plain RSS 2.0 with a vendor namespace (`ht:`) carrying the
//! approximate search volume.  Browsers cannot fetch it cross-origin, so by
//! default the request goes through a CORS relay that wraps the XML in a JSON
//! envelope: `{"contents": "<rss>…</rss>", "status": {…}}`.

use serde::Deserialize;

use super::{encode_component, get_text, DataSource, TrendItem};
use crate::error::SourceError;

/// Maximum number of trends kept per refresh.
pub const TREND_LIMIT: usize = 10;

const DEFAULT_TITLE: &str = "No Title";
const DEFAULT_TRAFFIC: &str = "Trending";
const SEARCH_URL: &str = "https://www.google.com/search?q=";

/// Search-trend RSS adapter.
pub struct TrendSource {
    client: reqwest::Client,
    /// The feed itself, e.g. `…/trendingsearches/daily/rss?geo=IN`.
    feed_url: String,
    /// Relay prefix; the percent-encoded feed URL is appended to it.
    relay: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RelayEnvelope {
    contents: Option<String>,
    #[serde(default)]
    status: Option<RelayStatus>,
}

#[derive(Debug, Deserialize)]
struct RelayStatus {
    http_code: Option<u16>,
}

impl TrendSource {
    pub fn new(client: reqwest::Client, feed_url: impl Into<String>, relay: Option<String>) -> Self {
        Self {
            client,
            feed_url: feed_url.into(),
            relay,
        }
    }

    /// The daily trends feed for a region code such as `IN` or `US`.
    pub fn feed_url_for_region(region: &str) -> String {
        format!(
            "https://trends.google.com/trends/trendingsearches/daily/rss?geo={}",
            encode_component(region)
        )
    }

    /// URL actually requested, accounting for the relay.
    pub fn request_url(&self) -> String {
        match &self.relay {
            Some(prefix) => format!("{prefix}{}", encode_component(&self.feed_url)),
            None => self.feed_url.clone(),
        }
    }

    /// Unwrap the relay envelope, or pass the body through when unrelayed.
    fn extract_xml(&self, body: String) -> Result<String, SourceError> {
        if self.relay.is_none() {
            return Ok(body);
        }
        let envelope: RelayEnvelope = serde_json::from_str(&body)?;
        envelope.contents.ok_or_else(|| {
            SourceError::EmptyRelay(envelope.status.and_then(|s| s.http_code))
        })
    }

    /// Turn a parsed channel into at most [`TREND_LIMIT`] items, in document
    /// order.  No I/O, so tests can feed it XML directly.
    pub fn parse_channel(channel: &rss::Channel) -> Vec<TrendItem> {
        channel
            .items()
            .iter()
            .take(TREND_LIMIT)
            .map(|item| {
                let title = item
                    .title()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .unwrap_or(DEFAULT_TITLE)
                    .to_string();

                let traffic_label = item
                    .extensions()
                    .get("ht")
                    .and_then(|ext| ext.get("approx_traffic"))
                    .and_then(|values| values.first())
                    .and_then(|value| value.value())
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .unwrap_or(DEFAULT_TRAFFIC)
                    .to_string();

                let link = item
                    .link()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from)
                    .unwrap_or_else(|| search_link(&title));

                TrendItem {
                    title,
                    traffic_label,
                    link,
                }
            })
            .collect()
    }
}

/// Web search for a trending term, used when the feed has no `<link>`.
fn search_link(term: &str) -> String {
    format!("{SEARCH_URL}{}", encode_component(term))
}

impl DataSource for TrendSource {
    type Item = TrendItem;

    fn name(&self) -> &'static str {
        "trends"
    }

    async fn fetch_items(&self) -> Result<Vec<TrendItem>, SourceError> {
        let body = get_text(&self.client, &self.request_url()).await?;
        let xml = self.extract_xml(body)?;
        let channel = rss::Channel::read_from(xml.as_bytes())?;
        Ok(Self::parse_channel(&channel))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn feed_with_items(count: usize) -> String {
        let items: String = (1..=count)
            .map(|i| {
                format!(
                    "<item><title>Trend {i}</title><ht:approx_traffic>{i}0,000+</ht:approx_traffic>\
                     <link>https://trends.example/{i}</link></item>"
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:ht="https://trends.google.com/trends/trendingsearches/daily">
  <channel><title>Daily Search Trends</title>{items}</channel>
</rss>"#
        )
    }

    #[test]
    fn parse_channel_extracts_title_traffic_and_link() {
        let xml = feed_with_items(2);
        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        let items = TrendSource::parse_channel(&channel);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Trend 1");
        assert_eq!(items[0].traffic_label, "10,000+");
        assert_eq!(items[0].link, "https://trends.example/1");
        assert_eq!(items[1].traffic_label, "20,000+");
    }

    #[test]
    fn parse_channel_keeps_first_ten_in_document_order() {
        let xml = feed_with_items(15);
        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        let items = TrendSource::parse_channel(&channel);

        assert_eq!(items.len(), 10);
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        let expected: Vec<String> = (1..=10).map(|i| format!("Trend {i}")).collect();
        assert_eq!(titles, expected);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test</title>
    <item><title>ipl auction</title></item>
    <item><description>no title here</description></item>
  </channel>
</rss>"#;

        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        let items = TrendSource::parse_channel(&channel);

        assert_eq!(items[0].traffic_label, "Trending");
        assert_eq!(
            items[0].link,
            "https://www.google.com/search?q=ipl%20auction"
        );
        assert_eq!(items[1].title, "No Title");
    }

    #[test]
    fn feed_url_for_region_sets_geo() {
        assert_eq!(
            TrendSource::feed_url_for_region("US"),
            "https://trends.google.com/trends/trendingsearches/daily/rss?geo=US"
        );
    }

    #[test]
    fn request_url_wraps_feed_in_relay() {
        let src = TrendSource::new(
            reqwest::Client::new(),
            "https://feed.example/rss?geo=IN",
            Some("https://relay.example/get?url=".into()),
        );
        assert_eq!(
            src.request_url(),
            "https://relay.example/get?url=https%3A%2F%2Ffeed.example%2Frss%3Fgeo%3DIN"
        );
    }

    #[test]
    fn name_is_trends() {
        let src = TrendSource::new(reqwest::Client::new(), "http://example.com", None);
        assert_eq!(src.name(), "trends");
    }

    #[tokio::test]
    async fn fetch_items_reads_feed_directly_without_relay() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed_with_items(3)))
            .mount(&server)
            .await;

        let src = TrendSource::new(reqwest::Client::new(), format!("{}/rss", server.uri()), None);
        let items = src.fetch_items().await.unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[2].title, "Trend 3");
    }

    #[tokio::test]
    async fn fetch_items_unwraps_relay_envelope() {
        let server = MockServer::start().await;
        let feed_url = "https://feed.example/rss?geo=IN";
        Mock::given(method("GET"))
            .and(path("/get"))
            .and(query_param("url", feed_url))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "contents": feed_with_items(15),
                "status": { "http_code": 200 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let src = TrendSource::new(
            reqwest::Client::new(),
            feed_url,
            Some(format!("{}/get?url=", server.uri())),
        );
        let items = src.fetch_items().await.unwrap();

        assert_eq!(items.len(), 10);
        assert_eq!(items[0].title, "Trend 1");
    }

    #[tokio::test]
    async fn fetch_items_errors_when_relay_has_no_contents() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "contents": null,
                "status": { "http_code": 404 }
            })))
            .mount(&server)
            .await;

        let src = TrendSource::new(
            reqwest::Client::new(),
            "https://feed.example/rss",
            Some(format!("{}/get?url=", server.uri())),
        );
        let err = src.fetch_items().await.unwrap_err();

        assert!(matches!(err, SourceError::EmptyRelay(Some(404))), "got {err:?}");
    }

    #[tokio::test]
    async fn fetch_items_errors_on_malformed_xml() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not a feed"))
            .mount(&server)
            .await;

        let src = TrendSource::new(reqwest::Client::new(), server.uri(), None);
        let err = src.fetch_items().await.unwrap_err();

        assert!(matches!(err, SourceError::Rss(_)), "got {err:?}");
    }
}
