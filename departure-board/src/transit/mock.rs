//! Mock transit client for working without network access.
//!
//! Loads sample responses from JSON files and serves them as if they were
//! live API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::domain::StationQuery;

use super::client::{MIN_QUERY_CHARS, validate_board};
use super::error::TransitError;
use super::types::{LocationSuggestion, LocationsResponse, RawStationBoard, StationBoardResponse};

/// File holding the `/locations` fixture.
const LOCATIONS_FILE: &str = "locations.json";

/// Mock transit client that serves data from JSON files.
///
/// Expects `{station}.json` station board files (e.g. `8576197.json`,
/// `Bern.json`) and optionally a `locations.json`.
#[derive(Debug, Clone)]
pub struct MockTransitClient {
    /// Station boards keyed by file stem.
    boards: Arc<HashMap<String, RawStationBoard>>,
    locations: Arc<Vec<LocationSuggestion>>,
}

impl MockTransitClient {
    /// Create a new mock client by loading JSON files from a directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, TransitError> {
        let data_dir = data_dir.as_ref();
        let mut boards = HashMap::new();
        let mut locations = Vec::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| TransitError::Fixture {
            message: format!("failed to read mock data directory: {e}"),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| TransitError::Fixture {
                message: format!("failed to read directory entry: {e}"),
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let json = std::fs::read_to_string(&path).map_err(|e| TransitError::Fixture {
                message: format!("failed to read {}: {e}", path.display()),
            })?;

            if path.file_name().and_then(|s| s.to_str()) == Some(LOCATIONS_FILE) {
                let parsed: LocationsResponse =
                    serde_json::from_str(&json).map_err(|e| TransitError::Fixture {
                        message: format!("failed to parse {}: {e}", path.display()),
                    })?;
                locations = parsed.stations.unwrap_or_default();
                continue;
            }

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| TransitError::Fixture {
                    message: format!("invalid filename: {}", path.display()),
                })?;

            let board: RawStationBoard =
                serde_json::from_str(&json).map_err(|e| TransitError::Fixture {
                    message: format!("failed to parse {}: {e}", path.display()),
                })?;

            boards.insert(stem.to_string(), board);
        }

        Ok(Self {
            boards: Arc::new(boards),
            locations: Arc::new(locations),
        })
    }

    /// Number of station boards loaded.
    pub fn board_count(&self) -> usize {
        self.boards.len()
    }

    /// Get a station board by file stem, station id or station name.
    pub fn get_station_board(
        &self,
        station: &StationQuery,
        limit: u32,
    ) -> Result<StationBoardResponse, TransitError> {
        let wanted = station.as_str();

        let raw = self
            .boards
            .get(wanted)
            .or_else(|| {
                self.boards.values().find(|b| {
                    b.station.as_ref().is_some_and(|s| {
                        s.id.as_deref() == Some(wanted)
                            || s.display_name()
                                .is_some_and(|n| n.eq_ignore_ascii_case(wanted))
                    })
                })
            })
            .ok_or(TransitError::NotFound)?;

        let mut board = validate_board(raw.clone())?;
        board.stationboard.truncate(limit as usize);
        Ok(board)
    }

    /// Search the fixture's locations by case-insensitive substring.
    ///
    /// Falls back to the loaded boards' stations without a `locations.json`.
    pub fn get_locations(&self, query: &str) -> Vec<LocationSuggestion> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        let needle = query.to_lowercase();

        if !self.locations.is_empty() {
            return self
                .locations
                .iter()
                .filter(|s| s.name.to_lowercase().contains(&needle))
                .cloned()
                .collect();
        }

        let mut found: Vec<LocationSuggestion> = self
            .boards
            .values()
            .filter_map(|b| b.station.as_ref())
            .filter_map(|s| {
                let name = s.display_name()?;
                name.to_lowercase().contains(&needle).then(|| LocationSuggestion {
                    id: s.id.clone(),
                    name: name.to_string(),
                    score: s.score,
                    coordinate: s.coordinate.clone(),
                    distance: s.distance,
                })
            })
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }
}
