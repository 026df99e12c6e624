//! Askama templates for the web frontend.

use askama::Template;
use chrono::{DateTime, Local, Utc};

use crate::board::BoardState;
use crate::domain::{
    badge_text, clean_destination, delay_label, format_clock, is_imminent, minutes_until,
    parse_timestamp, style_for,
};
use crate::search::SearchSnapshot;
use crate::transit::Departure;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// The board page: search box plus departures.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub board: BoardView,
    pub search: SearchView,
    /// How often the page repaints the board, in seconds.
    pub poll_secs: u64,
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Board fragment.
#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate {
    pub board: BoardView,
}

/// Suggestion panel fragment.
#[derive(Template)]
#[template(path = "suggestions.html")]
pub struct SuggestionsTemplate {
    pub search: SearchView,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// One row of the board.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartureView {
    /// Stable identity of the row within the list
    pub key: String,
    pub badge: String,
    pub badge_background: &'static str,
    pub badge_text_color: &'static str,
    /// `xs`, `sm` or `lg`, depending on how long the badge text is
    pub badge_size: &'static str,
    pub icon: &'static str,
    pub destination: String,
    pub platform: Option<String>,
    /// Whole minutes until departure, negative once departed
    pub minutes: i64,
    pub imminent: bool,
    /// Delay readout such as `+3'`
    pub delay: Option<String>,
    /// Scheduled departure as `HH:MM`
    pub clock: Option<String>,
}

impl DepartureView {
    /// Create from a departure at position `index` of its board.
    pub fn from_departure(
        departure: &Departure,
        index: usize,
        now: DateTime<Utc>,
        city_prefix: Option<&str>,
    ) -> Self {
        let style = style_for(&departure.category, &departure.number);
        let badge = badge_text(&departure.category, &departure.number);

        let when = departure
            .stop
            .display_departure()
            .and_then(|ts| parse_timestamp(ts).ok());
        let minutes = minutes_until(when, now);
        let imminent = is_imminent(minutes);
        let scheduled = departure
            .stop
            .departure
            .as_deref()
            .and_then(|ts| parse_timestamp(ts).ok());

        Self {
            key: departure.row_key(index),
            badge_background: style.background,
            badge_text_color: style.text,
            badge_size: badge_size(&badge),
            badge,
            icon: style.icon.as_str(),
            destination: clean_destination(&departure.to, city_prefix).to_string(),
            platform: departure.stop.display_platform().map(str::to_string),
            minutes,
            imminent,
            delay: delay_label(departure.stop.delay, imminent),
            clock: scheduled.as_ref().map(format_clock),
        }
    }

    /// Countdown text: `now` or e.g. `4'`.
    pub fn countdown(&self) -> String {
        if self.imminent {
            "now".to_string()
        } else {
            format!("{}'", self.minutes)
        }
    }
}

/// Size class for a badge: longer texts get a smaller font.
pub fn badge_size(badge: &str) -> &'static str {
    match badge.chars().count() {
        n if n > 3 => "xs",
        3 => "sm",
        _ => "lg",
    }
}

/// Everything the board fragment needs.
#[derive(Debug, Clone, Default)]
pub struct BoardView {
    /// Name of the station, once known
    pub station_name: Option<String>,
    /// What was asked for (id or name)
    pub station_query: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    /// Rows of the displayed snapshot; `None` when there is nothing to show
    pub departures: Option<Vec<DepartureView>>,
    /// Local wall-clock time of the displayed snapshot
    pub updated_at: Option<String>,
}

impl BoardView {
    /// Create from the board's state.
    pub fn from_state(state: &BoardState, now: DateTime<Utc>, city_prefix: Option<&str>) -> Self {
        let snapshot = state.snapshot();

        let departures = snapshot.map(|s| {
            s.board
                .stationboard
                .iter()
                .enumerate()
                .map(|(i, d)| DepartureView::from_departure(d, i, now, city_prefix))
                .collect()
        });

        Self {
            station_name: snapshot.map(|s| s.board.station_name().to_string()),
            station_query: state.station().map(|s| s.to_string()),
            loading: state.is_loading(),
            error: state.error().map(str::to_string),
            departures,
            updated_at: snapshot.map(|s| {
                s.updated_at
                    .with_timezone(&Local)
                    .format("%H:%M:%S")
                    .to_string()
            }),
        }
    }

    /// Heading: the station's name, or what was asked for while loading.
    pub fn title(&self) -> &str {
        self.station_name
            .as_deref()
            .or(self.station_query.as_deref())
            .unwrap_or("Departures")
    }

    pub fn is_idle(&self) -> bool {
        self.station_query.is_none()
    }
}

/// A suggestion in the search panel.
#[derive(Debug, Clone)]
pub struct SuggestionView {
    pub id: Option<String>,
    pub name: String,
}

/// Everything the search box needs.
#[derive(Debug, Clone, Default)]
pub struct SearchView {
    pub query: String,
    pub suggestions: Vec<SuggestionView>,
    pub panel_open: bool,
    pub searching: bool,
}

impl SearchView {
    pub fn from_snapshot(snapshot: &SearchSnapshot) -> Self {
        Self {
            query: snapshot.query.clone(),
            suggestions: snapshot
                .suggestions
                .iter()
                .map(|s| SuggestionView {
                    id: s.id.clone(),
                    name: s.name.clone(),
                })
                .collect(),
            panel_open: snapshot.shows_panel(),
            searching: snapshot.searching,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardMachine, BoardSnapshot};
    use crate::domain::StationQuery;
    use crate::transit::{Prognosis, Station, StationBoardResponse, Stop};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        // 10:00 in Zurich (UTC+1)
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap()
    }

    fn departure(category: &str, number: &str, to: &str, scheduled: &str) -> Departure {
        Departure {
            category: category.into(),
            number: number.into(),
            to: to.into(),
            stop: Stop {
                departure: Some(scheduled.into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn suburban_row_with_delay() {
        let mut dep = departure("S", "5", "Zürich, Stadelhofen", "2024-03-15T10:05:00+0100");
        dep.stop.prognosis = Prognosis {
            departure: Some("2024-03-15T10:08:00+0100".into()),
            platform: Some("4".into()),
            ..Default::default()
        };
        dep.stop.platform = Some("3".into());
        dep.stop.delay = Some(3);

        let view = DepartureView::from_departure(&dep, 0, now(), Some("Zürich"));

        assert_eq!(view.badge, "S5");
        assert_eq!(view.badge_background, "#4338ca");
        assert_eq!(view.badge_size, "lg");
        assert_eq!(view.icon, "train");
        assert_eq!(view.destination, "Stadelhofen");
        assert_eq!(view.platform.as_deref(), Some("4"));
        assert_eq!(view.minutes, 8);
        assert!(!view.imminent);
        assert_eq!(view.delay.as_deref(), Some("+3'"));
        assert_eq!(view.clock.as_deref(), Some("10:05"), "scheduled, not estimated");
        assert_eq!(view.countdown(), "8'");
        assert_eq!(view.key, "2024-03-15T10:05:00+0100-5-0");
    }

    #[test]
    fn intercity_row_departing_now() {
        let mut dep = departure("IC", "1", "Bern, Bahnhof", "2024-03-15T10:00:30+0100");
        dep.stop.delay = Some(2);

        let view = DepartureView::from_departure(&dep, 3, now(), Some("Zürich"));

        assert_eq!(view.badge, "IC1");
        assert_eq!(view.badge_size, "sm");
        assert_eq!(view.badge_background, "#dc002e");
        assert_eq!(view.destination, "Bern");
        assert!(view.imminent);
        assert_eq!(view.countdown(), "now");
        assert!(view.delay.is_none(), "no delay readout when imminent");
        assert!(view.platform.is_none());
        assert_eq!(view.clock.as_deref(), Some("10:00"));
    }

    #[test]
    fn tram_13_has_dark_text() {
        let dep = departure("T", "13", "Albisgütli", "2024-03-15T10:12:00+0100");
        let view = DepartureView::from_departure(&dep, 0, now(), Some("Zürich"));

        assert_eq!(view.badge, "13");
        assert_eq!(view.badge_background, "#f7d300");
        assert_eq!(view.badge_text_color, "#000000");
        assert_eq!(view.icon, "tram");
        assert_eq!(view.minutes, 12);
    }

    #[test]
    fn unparseable_time_counts_as_now() {
        let dep = departure("B", "31", "Hegibachplatz", "garbage");
        let view = DepartureView::from_departure(&dep, 0, now(), None);

        assert_eq!(view.minutes, 0);
        assert!(view.imminent);
        assert!(view.clock.is_none());
    }

    #[test]
    fn badge_sizes() {
        assert_eq!(badge_size("4"), "lg");
        assert_eq!(badge_size("S12"), "sm");
        assert_eq!(badge_size("ICE7"), "xs");
    }

    fn loaded_state(departures: Vec<Departure>) -> BoardState {
        let mut machine = BoardMachine::new();
        let ticket = machine
            .begin_load(StationQuery::parse("8576197").unwrap())
            .unwrap();
        let board = StationBoardResponse {
            station: Station {
                id: Some("8576197".into()),
                name: Some("Zürich, Escher-Wyss-Platz".into()),
                ..Default::default()
            },
            stationboard: departures,
        };
        machine.finish_load(ticket, Ok(BoardSnapshot::new(board, now())));
        machine.state().clone()
    }

    #[test]
    fn board_view_of_loaded_state() {
        let state = loaded_state(vec![
            departure("T", "4", "Zürich, Tiefenbrunnen", "2024-03-15T10:02:00+0100"),
            departure("T", "13", "Zürich, Albisgütli", "2024-03-15T10:04:00+0100"),
        ]);

        let view = BoardView::from_state(&state, now(), Some("Zürich"));

        assert_eq!(view.title(), "Zürich, Escher-Wyss-Platz");
        assert!(!view.loading);
        assert!(view.error.is_none());
        assert!(view.updated_at.is_some());
        let rows = view.departures.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].destination, "Tiefenbrunnen");
        assert_eq!(rows[1].key, "2024-03-15T10:04:00+0100-13-1");
    }

    #[test]
    fn board_view_of_idle_and_error() {
        let idle = BoardView::from_state(&BoardState::Idle, now(), None);
        assert!(idle.is_idle());
        assert!(idle.departures.is_none());

        let error = BoardState::Error {
            station: StationQuery::parse("Atlantis").unwrap(),
            message: "Station not found".into(),
        };
        let view = BoardView::from_state(&error, now(), None);
        assert_eq!(view.error.as_deref(), Some("Station not found"));
        assert_eq!(view.title(), "Atlantis");
        assert!(view.departures.is_none());
    }

    #[test]
    fn board_fragment_renders_each_state() {
        let empty = BoardTemplate {
            board: BoardView::from_state(&loaded_state(vec![]), now(), None),
        };
        assert!(empty.render().unwrap().contains("No departures found soon."));

        let error = BoardTemplate {
            board: BoardView {
                station_query: Some("Bern".into()),
                error: Some("Service unavailable (503)".into()),
                ..Default::default()
            },
        };
        let html = error.render().unwrap();
        assert!(html.contains("Service unavailable (503)"));
        assert!(html.contains("Try again"));

        let list = BoardTemplate {
            board: BoardView::from_state(
                &loaded_state(vec![departure(
                    "S",
                    "12",
                    "Zürich, Stadelhofen",
                    "2024-03-15T10:30:00+0100",
                )]),
                now(),
                Some("Zürich"),
            ),
        };
        let html = list.render().unwrap();
        assert!(html.contains("S12"));
        assert!(html.contains("Stadelhofen"));
        assert!(html.contains("Last updated"));
    }

    #[test]
    fn suggestions_fragment_lists_names() {
        let template = SuggestionsTemplate {
            search: SearchView {
                query: "Zür".into(),
                suggestions: vec![SuggestionView {
                    id: Some("8503000".into()),
                    name: "Zürich HB".into(),
                }],
                panel_open: true,
                searching: false,
            },
        };
        assert!(template.render().unwrap().contains("Zürich HB"));

        let closed = SuggestionsTemplate {
            search: SearchView::default(),
        };
        assert!(!closed.render().unwrap().contains("<li"));
    }
}
