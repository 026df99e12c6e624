//! Transit data client.
//!
//! This module provides an HTTP client for the public Swiss transport API
//! (transport.opendata.ch), which provides real-time departure boards and
//! station search.
//!
//! Key characteristics of the service:
//! - Read-only, no authentication
//! - "No such station" is a 200 with an empty station name, not a 404
//! - Timestamps are ISO 8601 with a `+0100`-style offset
//! - Boards come back in departure order and are used as-is

mod cache;
mod client;
mod error;
mod mock;
#[cfg(test)]
pub(crate) mod scripted;
mod types;

use std::future::Future;

pub use cache::{CacheConfig, CachedTransitClient};
pub use client::{DEFAULT_BASE_URL, DEFAULT_LIMIT, MIN_QUERY_CHARS, TransitClient, TransitConfig};
pub use error::{ErrorKind, TransitError};
pub use mock::MockTransitClient;
pub use types::{
    Coordinate, Departure, LocationSuggestion, LocationsResponse, PassListEntry, Prognosis,
    Station, StationBoardResponse, Stop,
};

use crate::domain::StationQuery;

/// The two queries the board and search box make against the transit service.
///
/// The board and search components are generic over this so they can be driven
/// by the live client, the fixture-backed mock, or a scripted test double.
pub trait TransitApi: Clone + Send + Sync + 'static {
    /// Fetch up to `limit` upcoming departures for a station.
    fn fetch_station_board(
        &self,
        station: &StationQuery,
        limit: u32,
    ) -> impl Future<Output = Result<StationBoardResponse, TransitError>> + Send;

    /// Fetch autocomplete suggestions. Never fails; errors yield an empty list.
    fn fetch_locations(&self, query: &str) -> impl Future<Output = Vec<LocationSuggestion>> + Send;
}

impl TransitApi for TransitClient {
    async fn fetch_station_board(
        &self,
        station: &StationQuery,
        limit: u32,
    ) -> Result<StationBoardResponse, TransitError> {
        self.get_station_board(station, limit).await
    }

    async fn fetch_locations(&self, query: &str) -> Vec<LocationSuggestion> {
        self.get_locations(query).await
    }
}

impl TransitApi for CachedTransitClient {
    async fn fetch_station_board(
        &self,
        station: &StationQuery,
        limit: u32,
    ) -> Result<StationBoardResponse, TransitError> {
        self.get_station_board(station, limit).await
    }

    async fn fetch_locations(&self, query: &str) -> Vec<LocationSuggestion> {
        self.get_locations(query).await
    }
}

impl TransitApi for MockTransitClient {
    async fn fetch_station_board(
        &self,
        station: &StationQuery,
        limit: u32,
    ) -> Result<StationBoardResponse, TransitError> {
        self.get_station_board(station, limit)
    }

    async fn fetch_locations(&self, query: &str) -> Vec<LocationSuggestion> {
        self.get_locations(query)
    }
}

/// The backend the binary runs against, chosen at startup.
#[derive(Clone)]
pub enum Backend {
    Live(CachedTransitClient),
    Mock(MockTransitClient),
}

impl TransitApi for Backend {
    async fn fetch_station_board(
        &self,
        station: &StationQuery,
        limit: u32,
    ) -> Result<StationBoardResponse, TransitError> {
        match self {
            Backend::Live(client) => client.get_station_board(station, limit).await,
            Backend::Mock(client) => client.get_station_board(station, limit),
        }
    }

    async fn fetch_locations(&self, query: &str) -> Vec<LocationSuggestion> {
        match self {
            Backend::Live(client) => client.get_locations(query).await,
            Backend::Mock(client) => client.get_locations(query),
        }
    }
}
