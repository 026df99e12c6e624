//! Transit service response DTOs.
//!
//! These types map directly to the JSON returned by the `/stationboard` and
//! `/locations` endpoints. Nearly everything is optional: the service sends
//! `null` for missing values and omits fields freely.

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A point on the map. `x`/`y` are latitude/longitude for WGS84.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Coordinate {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

/// A station as reported by the service.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Station {
    #[serde(default)]
    pub id: Option<String>,
    /// Empty or missing when the service found no match.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
    #[serde(default)]
    pub distance: Option<f64>,
}

impl Station {
    /// The display name, if the service sent a non-empty one.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

/// Real-time estimates for a stop.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prognosis {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub arrival: Option<String>,
    #[serde(default)]
    pub departure: Option<String>,
    #[serde(default)]
    pub capacity1st: Option<i64>,
    #[serde(default)]
    pub capacity2nd: Option<i64>,
}

/// A departure's stop at the board station.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    #[serde(default, deserialize_with = "null_as_default")]
    pub station: Station,
    /// Scheduled arrival (ISO 8601).
    #[serde(default)]
    pub arrival: Option<String>,
    #[serde(default)]
    pub arrival_timestamp: Option<i64>,
    /// Scheduled departure (ISO 8601).
    #[serde(default)]
    pub departure: Option<String>,
    #[serde(default)]
    pub departure_timestamp: Option<i64>,
    /// Delay in minutes, when known.
    #[serde(default)]
    pub delay: Option<i64>,
    /// Scheduled platform.
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prognosis: Prognosis,
}

impl Stop {
    /// Estimated departure if present, else scheduled.
    pub fn display_departure(&self) -> Option<&str> {
        crate::domain::display_timestamp(
            self.prognosis.departure.as_deref(),
            self.departure.as_deref(),
        )
    }

    /// Estimated platform if present, else scheduled. `None` if both are empty.
    pub fn display_platform(&self) -> Option<&str> {
        self.prognosis
            .platform
            .as_deref()
            .filter(|p| !p.is_empty())
            .or_else(|| self.platform.as_deref().filter(|p| !p.is_empty()))
    }
}

/// An intermediate station on a departure's route.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct PassListEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub station: Station,
    #[serde(default)]
    pub arrival: Option<String>,
    #[serde(default)]
    pub departure: Option<String>,
}

/// One scheduled service leaving the board station.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    #[serde(default, deserialize_with = "null_as_default")]
    pub stop: Stop,
    /// Full journey name, e.g. "T 13".
    #[serde(default)]
    pub name: Option<String>,
    /// Transport category code, e.g. "T", "B", "S", "IC".
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub category_code: Option<i64>,
    /// Raw line number.
    #[serde(default, deserialize_with = "null_as_default")]
    pub number: String,
    #[serde(default)]
    pub operator: Option<String>,
    /// Free-text destination.
    #[serde(default, deserialize_with = "null_as_default")]
    pub to: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pass_list: Vec<PassListEntry>,
    #[serde(default)]
    pub capacity1st: Option<i64>,
    #[serde(default)]
    pub capacity2nd: Option<i64>,
}

impl Departure {
    /// Identity for list rendering: (scheduled departure, line number, position).
    ///
    /// The service issues no identifier that is unique across a board.
    pub fn row_key(&self, index: usize) -> String {
        format!(
            "{}-{}-{}",
            self.stop.departure.as_deref().unwrap_or_default(),
            self.number,
            index
        )
    }
}

/// Raw `/stationboard` response, before the "no match" check.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawStationBoard {
    #[serde(default)]
    pub station: Option<Station>,
    #[serde(default)]
    pub stationboard: Option<Vec<Departure>>,
}

/// A station board: the station and its upcoming departures.
///
/// Departures are in server order (departure time ascending) and are never
/// re-sorted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StationBoardResponse {
    pub station: Station,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stationboard: Vec<Departure>,
}

impl StationBoardResponse {
    /// The station's name. Never empty for a validated board.
    pub fn station_name(&self) -> &str {
        self.station.display_name().unwrap_or_default()
    }
}

/// An autocomplete suggestion from `/locations`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct LocationSuggestion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
    #[serde(default)]
    pub distance: Option<f64>,
}

/// Response from `/locations`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LocationsResponse {
    #[serde(default)]
    pub stations: Option<Vec<LocationSuggestion>>,
}
