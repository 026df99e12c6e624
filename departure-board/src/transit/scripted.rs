//! Scripted transit double for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::StationQuery;

use super::error::TransitError;
use super::types::{Departure, LocationSuggestion, Station, StationBoardResponse, Stop};
use super::TransitApi;

/// One scripted station board reply.
pub enum Reply {
    Board(StationBoardResponse),
    Fail(TransitError),
}

#[derive(Default)]
struct Script {
    boards: VecDeque<(Duration, Reply)>,
    locations: Vec<LocationSuggestion>,
    board_calls: Vec<StationQuery>,
    location_calls: Vec<String>,
}

/// Answers board requests from a queue, in order, after an optional delay.
///
/// An exhausted queue answers with [`TransitError::NotFound`].
#[derive(Clone, Default)]
pub struct ScriptedApi {
    script: Arc<Mutex<Script>>,
    location_delay: Duration,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location_delay(mut self, delay: Duration) -> Self {
        self.location_delay = delay;
        self
    }

    pub fn push_board(&self, board: StationBoardResponse) {
        self.push_delayed(Duration::ZERO, Reply::Board(board));
    }

    pub fn push_failure(&self, err: TransitError) {
        self.push_delayed(Duration::ZERO, Reply::Fail(err));
    }

    pub fn push_delayed(&self, delay: Duration, reply: Reply) {
        self.script.lock().unwrap().boards.push_back((delay, reply));
    }

    pub fn set_locations(&self, names: &[&str]) {
        self.script.lock().unwrap().locations = names
            .iter()
            .enumerate()
            .map(|(i, name)| LocationSuggestion {
                id: Some(i.to_string()),
                name: (*name).to_string(),
                ..Default::default()
            })
            .collect();
    }

    pub fn board_calls(&self) -> Vec<StationQuery> {
        self.script.lock().unwrap().board_calls.clone()
    }

    pub fn location_calls(&self) -> Vec<String> {
        self.script.lock().unwrap().location_calls.clone()
    }
}

impl TransitApi for ScriptedApi {
    async fn fetch_station_board(
        &self,
        station: &StationQuery,
        _limit: u32,
    ) -> Result<StationBoardResponse, TransitError> {
        let next = {
            let mut script = self.script.lock().unwrap();
            script.board_calls.push(station.clone());
            script.boards.pop_front()
        };

        let Some((delay, reply)) = next else {
            return Err(TransitError::NotFound);
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Reply::Board(board) => Ok(board),
            Reply::Fail(err) => Err(err),
        }
    }

    async fn fetch_locations(&self, query: &str) -> Vec<LocationSuggestion> {
        let locations = {
            let mut script = self.script.lock().unwrap();
            script.location_calls.push(query.to_string());
            script.locations.clone()
        };

        if !self.location_delay.is_zero() {
            tokio::time::sleep(self.location_delay).await;
        }

        locations
    }
}

/// A board for `name` with one tram departure per line number.
pub fn board(name: &str, lines: &[&str]) -> StationBoardResponse {
    StationBoardResponse {
        station: Station {
            id: Some("1".into()),
            name: Some(name.to_string()),
            ..Default::default()
        },
        stationboard: lines
            .iter()
            .map(|line| Departure {
                category: "T".into(),
                number: (*line).to_string(),
                to: "Somewhere".into(),
                stop: Stop {
                    departure: Some("2024-03-15T10:00:00+0100".into()),
                    ..Default::default()
                },
                ..Default::default()
            })
            .collect(),
    }
}
