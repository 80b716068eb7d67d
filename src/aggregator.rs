//! Fan-out to every source and merge the results into one state.
//!
//! A refresh always waits for all sources to settle.  A source that fails or
//! times out contributes an empty list and a [`SourceFailure`]; it never
//! aborts the others.  The one exception is when no source could even be
//! reached, which is reported as [`RefreshError::Offline`] so the caller can
//! keep showing the previous state.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::{RefreshError, SourceError};
use crate::source::{DataSource, NewsSource, SocialSource, TrendSource};
use crate::state::AggregatedState;

/// A source that produced no data during a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub source: &'static str,
    pub message: String,
}

/// Outcome of a refresh that produced a state.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub state: AggregatedState,
    pub failures: Vec<SourceFailure>,
    pub completed_at: DateTime<Utc>,
}

const SOURCE_COUNT: usize = 3;

pub type RefreshResult = Result<RefreshReport, RefreshError>;

pub struct Aggregator {
    trends: TrendSource,
    social: SocialSource,
    news: NewsSource,
    /// Upper bound on each source, including all of its requests.
    timeout: Duration,
}

impl Aggregator {
    pub fn new(
        trends: TrendSource,
        social: SocialSource,
        news: NewsSource,
        timeout: Duration,
    ) -> Self {
        Self {
            trends,
            social,
            news,
            timeout,
        }
    }

    pub async fn refresh(&self) -> RefreshResult {
        let (trends, social, news) = tokio::join!(
            self.settle(&self.trends),
            self.settle(&self.social),
            self.settle(&self.news),
        );

        let mut failures = Vec::new();
        let mut offline = 0;
        let trends = absorb(self.trends.name(), trends, &mut failures, &mut offline);
        let social = absorb(self.social.name(), social, &mut failures, &mut offline);
        let news = absorb(self.news.name(), news, &mut failures, &mut offline);

        if offline == SOURCE_COUNT {
            warn!("refresh failed: no source reachable");
            return Err(RefreshError::Offline);
        }

        let state = AggregatedState {
            trends,
            social,
            news,
        };

        info!(
            trends = state.trends.len(),
            social = state.social.len(),
            news = state.news.len(),
            failed = failures.len(),
            "refresh complete"
        );

        Ok(RefreshReport {
            state,
            failures,
            completed_at: Utc::now(),
        })
    }

    /// Run one source under the timeout, logging a failure.
    async fn settle<S: DataSource>(&self, source: &S) -> Result<Vec<S::Item>, SourceError> {
        let result = match tokio::time::timeout(self.timeout, source.fetch_items()).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(self.timeout)),
        };
        if let Err(e) = &result {
            warn!(source = source.name(), error = %e, "source failed");
        }
        result
    }
}

/// Swap a failed source's result for an empty list, recording why.
fn absorb<T>(
    source: &'static str,
    result: Result<Vec<T>, SourceError>,
    failures: &mut Vec<SourceFailure>,
    offline: &mut usize,
) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            if e.is_offline() {
                *offline += 1;
            }
            failures.push(SourceFailure {
                source,
                message: e.to_string(),
            });
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn aggregator_for(base: &str, timeout: Duration) -> Aggregator {
        let client = reqwest::Client::new();
        Aggregator::new(
            TrendSource::new(client.clone(), format!("{base}/trends/rss"), None),
            SocialSource::new(client.clone(), format!("{base}/r/popular.json")),
            NewsSource::new(client, format!("{base}/v0")),
            timeout,
        )
    }

    fn trend_feed(count: usize) -> String {
        let items: String = (1..=count)
            .map(|i| format!("<item><title>Trend {i}</title></item>"))
            .collect();
        format!(r#"<rss version="2.0"><channel><title>t</title>{items}</channel></rss>"#)
    }

    async fn mount_healthy(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/trends/rss"))
            .respond_with(ResponseTemplate::new(200).set_body_string(trend_feed(15)))
            .mount(server)
            .await;

        let children: Vec<_> = (1..=20)
            .map(|i| json!({ "data": { "title": format!("Post {i}"), "permalink": format!("/r/a/{i}") } }))
            .collect();
        Mock::given(method("GET"))
            .and(path("/r/popular.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "children": children } })),
            )
            .mount(server)
            .await;

        let ids: Vec<u64> = (1..=30).collect();
        Mock::given(method("GET"))
            .and(path("/v0/topstories.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ids))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/v0/item/\d+\.json$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "title": "Story" })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn healthy_refresh_respects_caps() {
        let server = MockServer::start().await;
        mount_healthy(&server).await;

        let report = aggregator_for(&server.uri(), Duration::from_secs(5))
            .refresh()
            .await
            .unwrap();

        assert!(report.failures.is_empty());
        assert_eq!(report.state.trends.len(), 10);
        assert_eq!(report.state.social.len(), 12);
        assert_eq!(report.state.news.len(), 10);
    }

    #[tokio::test]
    async fn all_sources_failing_yields_empty_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let report = aggregator_for(&server.uri(), Duration::from_secs(5))
            .refresh()
            .await
            .unwrap();

        assert!(report.state.is_empty());
        let failed: Vec<&str> = report.failures.iter().map(|f| f.source).collect();
        assert_eq!(failed, vec!["trends", "social", "news"]);
    }

    #[tokio::test]
    async fn one_failing_source_does_not_affect_the_others() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/r/popular.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
            .mount(&server)
            .await;
        mount_healthy(&server).await;

        let report = aggregator_for(&server.uri(), Duration::from_secs(5))
            .refresh()
            .await
            .unwrap();

        assert!(report.state.social.is_empty());
        assert_eq!(report.state.trends.len(), 10);
        assert_eq!(report.state.news.len(), 10);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source, "social");
    }

    #[tokio::test]
    async fn slow_source_times_out_as_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trends/rss"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(trend_feed(3))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;
        mount_healthy(&server).await;

        let report = aggregator_for(&server.uri(), Duration::from_millis(500))
            .refresh()
            .await
            .unwrap();

        assert!(report.state.trends.is_empty());
        assert_eq!(report.state.social.len(), 12);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].message.contains("timed out"));
    }

    #[tokio::test]
    async fn unreachable_network_is_an_error() {
        // Nothing listens on port 1, so every connection is refused.
        let result = aggregator_for("http://127.0.0.1:1", Duration::from_secs(5))
            .refresh()
            .await;

        assert!(matches!(result, Err(RefreshError::Offline)));
    }
}
