//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use super::templates::{BoardView, DepartureView, SearchView};

/// Form posted to switch stations.
#[derive(Debug, Deserialize)]
pub struct StationForm {
    /// Station id or name
    pub station: String,
}

/// Keystroke in the search box.
#[derive(Debug, Deserialize)]
pub struct SuggestionsQuery {
    #[serde(default)]
    pub q: String,
}

/// A suggestion was picked.
#[derive(Debug, Deserialize)]
pub struct SelectForm {
    pub name: String,
}

/// Enter was pressed.
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    /// Current text, if the browser has any newer than the last keystroke
    pub q: Option<String>,
}

/// Browser connectivity report.
#[derive(Debug, Deserialize)]
pub struct ConnectivityForm {
    pub online: bool,
}

/// The board, as JSON.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    /// `idle`, `loading`, `loaded` or `error`
    pub status: &'static str,

    /// Requested station (id or name)
    pub station: Option<String>,

    /// Resolved station name
    pub station_name: Option<String>,

    /// Error message, in the error state
    pub error: Option<String>,

    /// Local time of the last successful load
    pub updated_at: Option<String>,

    pub departures: Vec<DepartureResult>,
}

impl BoardResponse {
    pub fn from_view(view: &BoardView) -> Self {
        let status = if view.error.is_some() {
            "error"
        } else if view.loading {
            "loading"
        } else if view.departures.is_some() {
            "loaded"
        } else {
            "idle"
        };

        Self {
            status,
            station: view.station_query.clone(),
            station_name: view.station_name.clone(),
            error: view.error.clone(),
            updated_at: view.updated_at.clone(),
            departures: view
                .departures
                .iter()
                .flatten()
                .map(DepartureResult::from_view)
                .collect(),
        }
    }
}

/// One departure row, as JSON.
#[derive(Debug, Serialize)]
pub struct DepartureResult {
    pub key: String,
    pub badge: String,
    pub background: String,
    pub color: String,
    pub icon: String,
    pub destination: String,
    pub platform: Option<String>,
    pub minutes: i64,
    pub imminent: bool,
    pub delay: Option<String>,
    pub time: Option<String>,
}

impl DepartureResult {
    pub fn from_view(view: &DepartureView) -> Self {
        Self {
            key: view.key.clone(),
            badge: view.badge.clone(),
            background: view.badge_background.to_string(),
            color: view.badge_text_color.to_string(),
            icon: view.icon.to_string(),
            destination: view.destination.clone(),
            platform: view.platform.clone(),
            minutes: view.minutes,
            imminent: view.imminent,
            delay: view.delay.clone(),
            time: view.clock.clone(),
        }
    }
}

/// The search box, as JSON.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub panel_open: bool,
    pub searching: bool,
    pub suggestions: Vec<SuggestionResult>,
}

impl SearchResponse {
    pub fn from_view(view: &SearchView) -> Self {
        Self {
            query: view.query.clone(),
            panel_open: view.panel_open,
            searching: view.searching,
            suggestions: view
                .suggestions
                .iter()
                .map(|s| SuggestionResult {
                    id: s.id.clone(),
                    name: s.name.clone(),
                })
                .collect(),
        }
    }
}

/// A station suggestion.
#[derive(Debug, Serialize)]
pub struct SuggestionResult {
    pub id: Option<String>,
    pub name: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
