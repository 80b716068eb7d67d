use std::sync::Arc;

use ratatui::widgets::ListState;

use crate::aggregator::RefreshResult;
use crate::filter::filter;
use crate::source::Headline;
use crate::state::{AggregatedState, Snapshot};

/// Shown when a refresh could not produce any state.
pub const REFRESH_FAILED: &str = "Something went wrong. Press r to refresh.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Keystrokes edit the search query.
    Search,
}

/// One of the three dashboard sections, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Trends,
    Social,
    News,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Trends, Section::Social, Section::News];

    pub fn index(self) -> usize {
        match self {
            Section::Trends => 0,
            Section::Social => 1,
            Section::News => 2,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Trends => "Google Trends",
            Section::Social => "Reddit Popular",
            Section::News => "Hacker News",
        }
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn len_in(self, state: &AggregatedState) -> usize {
        match self {
            Section::Trends => state.trends.len(),
            Section::Social => state.social.len(),
            Section::News => state.news.len(),
        }
    }

    fn link_in(self, state: &AggregatedState, index: usize) -> Option<String> {
        match self {
            Section::Trends => state.trends.get(index).map(|i| i.link().into_owned()),
            Section::Social => state.social.get(index).map(|i| i.link().into_owned()),
            Section::News => state.news.get(index).map(|i| i.link().into_owned()),
        }
    }
}

/// Filtered view cached for one `(snapshot version, query)` pair.
struct CachedView {
    version: u64,
    query: String,
    state: Arc<AggregatedState>,
}

pub struct App {
    /// Last published state.  Only [`App::apply_refresh`] replaces it.
    pub snapshot: Snapshot,
    /// Live search string.
    pub query: String,
    pub mode: Mode,
    /// Section that navigation keys act on.
    pub focus: Section,
    /// Selection per section, indexed by [`Section::index`].
    pub list_states: [ListState; 3],
    /// Mirrors the scheduler phase.
    pub loading: bool,
    /// User-visible error from the last refresh.
    pub error: Option<String>,
    /// Last refresh status message.
    pub status: String,
    /// Whether the user has requested to quit.
    pub quit: bool,
    view: Option<CachedView>,
}

impl App {
    pub fn new() -> Self {
        Self {
            snapshot: Snapshot::default(),
            query: String::new(),
            mode: Mode::Normal,
            focus: Section::Trends,
            list_states: Default::default(),
            loading: true,
            error: None,
            status: "Starting…".into(),
            quit: false,
            view: None,
        }
    }

    /// The snapshot filtered by the current query, recomputed only when
    /// either changes.
    pub fn view(&mut self) -> Arc<AggregatedState> {
        let fresh = self
            .view
            .as_ref()
            .is_some_and(|v| v.version == self.snapshot.version && v.query == self.query);

        if !fresh {
            let state = if self.query.is_empty() {
                Arc::clone(&self.snapshot.state)
            } else {
                Arc::new(filter(&self.snapshot.state, &self.query))
            };
            self.view = Some(CachedView {
                version: self.snapshot.version,
                query: self.query.clone(),
                state,
            });
        }

        match &self.view {
            Some(v) => Arc::clone(&v.state),
            None => Arc::clone(&self.snapshot.state),
        }
    }

    /// Publish the outcome of a refresh.
    ///
    /// A failed refresh keeps the previous snapshot on screen.
    pub fn apply_refresh(&mut self, result: RefreshResult) {
        match result {
            Ok(report) => {
                self.snapshot.replace(report.state, report.completed_at);
                self.error = None;
                self.status = if report.failures.is_empty() {
                    format!("Fetched {} items", self.snapshot.state.len())
                } else {
                    let failed: Vec<&str> = report.failures.iter().map(|f| f.source).collect();
                    format!(
                        "Fetched {} items ({} unavailable)",
                        self.snapshot.state.len(),
                        failed.join(", ")
                    )
                };
            }
            Err(e) => {
                self.error = Some(REFRESH_FAILED.into());
                self.status = format!("Error: {e}");
            }
        }
        self.clamp_selections();
    }

    // -- search --------------------------------------------------------------

    pub fn enter_search(&mut self) {
        self.mode = Mode::Search;
    }

    pub fn leave_search(&mut self) {
        self.mode = Mode::Normal;
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.clamp_selections();
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
        self.clamp_selections();
    }

    // -- navigation ----------------------------------------------------------

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    fn focused_len(&mut self) -> usize {
        let view = self.view();
        self.focus.len_in(&view)
    }

    fn focused_state(&mut self) -> &mut ListState {
        &mut self.list_states[self.focus.index()]
    }

    pub fn select_next(&mut self) {
        let len = self.focused_len();
        if len == 0 {
            return;
        }
        let state = self.focused_state();
        let i = match state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.focused_len() == 0 {
            return;
        }
        let state = self.focused_state();
        let i = match state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if self.focused_len() > 0 {
            self.focused_state().select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.focused_len();
        if len > 0 {
            self.focused_state().select(Some(len - 1));
        }
    }

    /// Link of the selected item in the focused section.
    pub fn selected_link(&mut self) -> Option<String> {
        let index = self.list_states[self.focus.index()].selected()?;
        let view = self.view();
        self.focus.link_in(&view, index)
    }

    /// Keep every selection inside its (possibly shrunk) section.
    fn clamp_selections(&mut self) {
        let view = self.view();
        for section in Section::ALL {
            let len = section.len_in(&view);
            let state = &mut self.list_states[section.index()];
            match state.selected() {
                Some(_) if len == 0 => state.select(None),
                Some(i) if i >= len => state.select(Some(len - 1)),
                _ => {}
            }
        }
    }
}
