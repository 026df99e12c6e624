//! Transit service HTTP client.
//!
//! Wraps the two read-only queries the board needs, `/stationboard` and
//! `/locations`, and turns transport and HTTP failures into [`TransitError`]s.
//! Nothing here retries: retrying is the caller's decision.

use tracing::{debug, warn};

use crate::domain::StationQuery;

use super::error::TransitError;
use super::types::{LocationSuggestion, LocationsResponse, RawStationBoard, StationBoardResponse};

/// Default base URL for the transit service.
pub const DEFAULT_BASE_URL: &str = "https://transport.opendata.ch/v1";

/// Default number of departures requested per board.
pub const DEFAULT_LIMIT: u32 = 15;

/// Location queries shorter than this are never sent.
pub const MIN_QUERY_CHARS: usize = 2;

/// Configuration for the transit client.
#[derive(Debug, Clone)]
pub struct TransitConfig {
    /// Base URL for the API (defaults to the public service)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TransitConfig {
    /// Create a config pointing at the public service.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Transit service client.
#[derive(Debug, Clone)]
pub struct TransitClient {
    http: reqwest::Client,
    base_url: String,
}

impl TransitClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TransitConfig) -> Result<Self, TransitError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the board of upcoming departures for a station.
    ///
    /// Numeric queries go out as `id=`, names as `station=` (URL-encoded).
    ///
    /// # Errors
    ///
    /// * [`TransitError::Service`] for a non-2xx status
    /// * [`TransitError::NotFound`] when the response names no station
    /// * [`TransitError::Network`] when the service is unreachable
    pub async fn get_station_board(
        &self,
        station: &StationQuery,
        limit: u32,
    ) -> Result<StationBoardResponse, TransitError> {
        let url = format!("{}/stationboard", self.base_url);
        let (key, value) = station.query_param();

        debug!(%station, limit, "requesting station board");

        let response = self
            .http
            .get(&url)
            .query(&[(key, value.to_string()), ("limit", limit.to_string())])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            return Err(TransitError::Service {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;

        let raw: RawStationBoard = serde_json::from_str(&body).map_err(|e| TransitError::Json {
            message: e.to_string(),
        })?;

        validate_board(raw)
    }

    /// Search stations by name, surfacing failures.
    ///
    /// Queries shorter than [`MIN_QUERY_CHARS`] return an empty list without
    /// a request.
    pub async fn try_get_locations(
        &self,
        query: &str,
    ) -> Result<Vec<LocationSuggestion>, TransitError> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let url = format!("{}/locations", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("query", query), ("type", "station")])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            return Err(TransitError::Service {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;

        let response: LocationsResponse =
            serde_json::from_str(&body).map_err(|e| TransitError::Json {
                message: e.to_string(),
            })?;

        Ok(response.stations.unwrap_or_default())
    }

    /// Search stations by name for autocomplete.
    ///
    /// Never fails: any error degrades to an empty list.
    pub async fn get_locations(&self, query: &str) -> Vec<LocationSuggestion> {
        match self.try_get_locations(query).await {
            Ok(stations) => stations,
            Err(e) => {
                warn!(query, error = %e, "location search failed");
                Vec::new()
            }
        }
    }
}

/// Turn a raw board into a validated one.
///
/// The service signals "no such station" with a 200 and an empty station
/// name rather than a distinct status.
pub(crate) fn validate_board(raw: RawStationBoard) -> Result<StationBoardResponse, TransitError> {
    let station = raw
        .station
        .filter(|s| s.display_name().is_some())
        .ok_or(TransitError::NotFound)?;

    Ok(StationBoardResponse {
        station,
        stationboard: raw.stationboard.unwrap_or_default(),
    })
}
