//! Live search over the aggregated state.

use crate::source::Headline;
use crate::state::AggregatedState;

/// Keep only items whose title contains `query`, ignoring case.
///
/// An empty query returns the state unchanged.  Items without a title never
/// match a non-empty query.
pub fn filter(state: &AggregatedState, query: &str) -> AggregatedState {
    if query.is_empty() {
        return state.clone();
    }
    let needle = query.to_lowercase();

    AggregatedState {
        trends: matching(&state.trends, &needle),
        social: matching(&state.social, &needle),
        news: matching(&state.news, &needle),
    }
}

fn matching<T: Headline + Clone>(items: &[T], needle: &str) -> Vec<T> {
    items
        .iter()
        .filter(|item| {
            item.title()
                .is_some_and(|title| title.to_lowercase().contains(needle))
        })
        .cloned()
        .collect()
}
