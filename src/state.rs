//! The aggregated dashboard state and its published snapshot.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::source::{NewsItem, SocialPost, TrendItem};

/// Everything the dashboard shows, one list per source in upstream order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedState {
    pub trends: Vec<TrendItem>,
    pub social: Vec<SocialPost>,
    pub news: Vec<NewsItem>,
}

impl AggregatedState {
    pub fn len(&self) -> usize {
        self.trends.len() + self.social.len() + self.news.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The currently published state.
///
/// Readers hold the [`Arc`] and never see a half-written value: a refresh
/// builds a whole new [`AggregatedState`] and [`Snapshot::replace`] swaps it
/// in, bumping `version`.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub version: u64,
    /// Completion time of the refresh that produced `state`; `None` before
    /// the first one.
    pub updated_at: Option<DateTime<Utc>>,
    pub state: Arc<AggregatedState>,
}

impl Snapshot {
    pub fn replace(&mut self, state: AggregatedState, updated_at: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = Some(updated_at);
        self.state = Arc::new(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn trend(title: &str) -> TrendItem {
        TrendItem {
            title: title.to_string(),
            traffic_label: "Trending".to_string(),
            link: "#".to_string(),
        }
    }

    #[test]
    fn default_snapshot_is_empty_and_unversioned() {
        let snap = Snapshot::default();
        assert_eq!(snap.version, 0);
        assert!(snap.updated_at.is_none());
        assert!(snap.state.is_empty());
    }

    #[test]
    fn replace_swaps_state_and_bumps_version() {
        let mut snap = Snapshot::default();
        let before = Arc::clone(&snap.state);
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

        snap.replace(
            AggregatedState {
                trends: vec![trend("a")],
                ..Default::default()
            },
            at,
        );

        assert_eq!(snap.version, 1);
        assert_eq!(snap.updated_at, Some(at));
        assert_eq!(snap.state.len(), 1);
        // Earlier readers keep the value they were handed.
        assert!(before.is_empty());
    }
}
