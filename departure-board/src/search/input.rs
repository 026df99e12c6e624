//! Headless station search box.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::transit::{LocationSuggestion, TransitApi};

use super::debounce::Debouncer;

/// Tuning for the search box.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a lookup is made.
    pub debounce: Duration,

    /// Suggestions kept from each lookup.
    pub max_suggestions: usize,

    /// Inputs shorter than this (in characters) are never looked up.
    pub min_query_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            max_suggestions: 5,
            min_query_chars: 2,
        }
    }
}

/// What the search box currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    /// Text in the input.
    pub query: String,

    pub suggestions: Vec<LocationSuggestion>,

    /// Whether the suggestion panel is open. It is only drawn when there is
    /// something in it, see [`shows_panel`](Self::shows_panel).
    pub panel_open: bool,

    /// A lookup is scheduled or in flight.
    pub searching: bool,

    /// Bumped on every keystroke.
    pub revision: u64,

    /// Newest revision whose lookup has settled.
    pub resolved: u64,
}

impl SearchSnapshot {
    pub fn shows_panel(&self) -> bool {
        self.panel_open && !self.suggestions.is_empty()
    }
}

/// A search box driven by input events.
///
/// Committed station names (a picked suggestion or Enter) are sent on the
/// channel returned by [`SearchInput::new`].
#[derive(Clone)]
pub struct SearchInput<A> {
    inner: Arc<Inner<A>>,
}

struct Inner<A> {
    api: A,
    config: SearchConfig,
    state: Arc<watch::Sender<SearchSnapshot>>,
    debouncer: Debouncer,
    selections: mpsc::UnboundedSender<String>,
}

impl<A: TransitApi> SearchInput<A> {
    pub fn new(api: A, config: SearchConfig) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (selections, rx) = mpsc::unbounded_channel();
        let (state, _) = watch::channel(SearchSnapshot::default());
        let input = Self {
            inner: Arc::new(Inner {
                api,
                debouncer: Debouncer::new(config.debounce),
                config,
                state: Arc::new(state),
                selections,
            }),
        };
        (input, rx)
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.inner.state.borrow().clone()
    }

    /// The text changed. Returns the new revision.
    ///
    /// Short inputs clear the suggestions at once; anything else is looked up
    /// once typing pauses. A newer keystroke cancels the older lookup, even
    /// one already in flight.
    pub fn on_input(&self, text: &str) -> u64 {
        let query = text.trim().to_string();
        let short = query.chars().count() < self.inner.config.min_query_chars;

        let mut revision = 0;
        self.inner.state.send_modify(|s| {
            s.revision += 1;
            revision = s.revision;
            s.query = text.to_string();
            s.searching = !short;
            if short {
                s.suggestions.clear();
                s.panel_open = false;
                s.resolved = revision;
            }
        });

        if short {
            self.inner.debouncer.cancel();
            return revision;
        }

        let api = self.inner.api.clone();
        let state = self.inner.state.clone();
        let max = self.inner.config.max_suggestions;
        self.inner.debouncer.schedule(async move {
            debug!(query = %query, "looking up suggestions");
            let mut found = api.fetch_locations(&query).await;
            found.truncate(max);
            state.send_modify(|s| {
                s.suggestions = found;
                s.panel_open = true;
                s.searching = false;
                s.resolved = s.resolved.max(revision);
            });
        });

        revision
    }

    /// Wait until the lookup for `revision` settles, a newer keystroke
    /// supersedes it, or `timeout` passes. Returns the state at that point.
    pub async fn wait_resolved(&self, revision: u64, timeout: Duration) -> SearchSnapshot {
        let mut rx = self.inner.state.subscribe();
        let settled = rx.wait_for(|s| s.resolved >= revision || s.revision > revision);
        if tokio::time::timeout(timeout, settled).await.is_err() {
            debug!(revision, "suggestions not ready in time");
        }
        self.snapshot()
    }

    /// A suggestion was picked.
    pub fn select(&self, name: &str) {
        self.inner.debouncer.cancel();
        self.inner.state.send_modify(|s| {
            s.query = name.to_string();
            s.panel_open = false;
            s.searching = false;
        });
        self.commit(name);
    }

    /// Enter was pressed. Commits the current text; blank input is ignored.
    pub fn submit(&self) {
        self.inner.debouncer.cancel();
        let mut query = String::new();
        self.inner.state.send_modify(|s| {
            s.panel_open = false;
            s.searching = false;
            query = s.query.clone();
        });
        self.commit(&query);
    }

    /// Focus moved elsewhere. The text stays.
    pub fn dismiss(&self) {
        self.inner.state.send_modify(|s| s.panel_open = false);
    }

    /// The input regained focus. Reopens the panel if it has suggestions.
    pub fn focus(&self) {
        self.inner.state.send_if_modified(|s| {
            if s.suggestions.is_empty() || s.panel_open {
                return false;
            }
            s.panel_open = true;
            true
        });
    }

    /// The clear button was pressed. Does not change the station.
    pub fn clear(&self) {
        self.inner.debouncer.cancel();
        self.inner.state.send_modify(|s| {
            s.revision += 1;
            s.resolved = s.revision;
            s.query.clear();
            s.suggestions.clear();
            s.panel_open = false;
            s.searching = false;
        });
    }

    fn commit(&self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        if self.inner.selections.send(name.to_string()).is_err() {
            debug!(name, "nobody is listening for station selections");
        }
    }
}
