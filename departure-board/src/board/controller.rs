//! The live station board: a [`BoardMachine`] driven by a transit backend.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::StationQuery;
use crate::transit::TransitApi;

use super::state::{BoardMachine, BoardSnapshot, BoardState, Ticket};

/// Thread-safe handle to one station board.
///
/// Cloning is cheap; all clones drive the same board. The state lock is never
/// held across a fetch, so reads stay responsive while a request is in flight.
#[derive(Clone)]
pub struct StationBoard<A> {
    inner: Arc<Inner<A>>,
}

struct Inner<A> {
    api: A,
    limit: u32,
    machine: RwLock<BoardMachine>,
}

impl<A: TransitApi> StationBoard<A> {
    /// Create an idle board that fetches up to `limit` departures per load.
    pub fn new(api: A, limit: u32) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                limit,
                machine: RwLock::new(BoardMachine::new()),
            }),
        }
    }

    /// Current state.
    pub async fn state(&self) -> BoardState {
        self.inner.machine.read().await.state().clone()
    }

    /// Show `station`, loading it in the foreground.
    ///
    /// Returns the state once the load has settled (or been superseded).
    /// The fetch runs on its own task, so dropping the returned future
    /// still lets the load finish.
    pub async fn select_station(&self, station: StationQuery) -> BoardState {
        let Some(ticket) = self.begin_load(&station).await else {
            return self.state().await;
        };

        match self.spawn_load(ticket, station).await {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "board load task failed");
                self.state().await
            }
        }
    }

    /// Load every station name received on `selections` until all senders
    /// are gone. Names that do not parse as a station are skipped.
    ///
    /// Each load enters `Loading` in arrival order; the fetches themselves
    /// run concurrently and only the newest one is applied.
    pub fn follow(&self, mut selections: mpsc::UnboundedReceiver<String>) -> JoinHandle<()> {
        let board = self.clone();
        tokio::spawn(async move {
            while let Some(name) = selections.recv().await {
                let station = match StationQuery::parse(&name) {
                    Ok(station) => station,
                    Err(e) => {
                        warn!(name = %name, error = %e, "ignoring station selection");
                        continue;
                    }
                };

                info!(%station, "station selected");
                if let Some(ticket) = board.begin_load(&station).await {
                    board.spawn_load(ticket, station);
                }
            }
        })
    }

    async fn begin_load(&self, station: &StationQuery) -> Option<Ticket> {
        self.inner.machine.write().await.begin_load(station.clone())
    }

    fn spawn_load(&self, ticket: Ticket, station: StationQuery) -> JoinHandle<BoardState> {
        let board = self.clone();
        tokio::spawn(async move { board.run_load(ticket, station).await })
    }

    async fn run_load(&self, ticket: Ticket, station: StationQuery) -> BoardState {
        debug!(%station, "loading board");
        let result = self
            .inner
            .api
            .fetch_station_board(&station, self.inner.limit)
            .await;

        let result = match result {
            Ok(board) => {
                info!(%station, departures = board.stationboard.len(), "board loaded");
                Ok(BoardSnapshot::new(board, Utc::now()))
            }
            Err(e) => {
                info!(%station, error = %e, "board load failed");
                Err(e.to_string())
            }
        };

        let mut machine = self.inner.machine.write().await;
        if !machine.finish_load(ticket, result) {
            debug!(%station, "discarding stale board result");
        }
        machine.state().clone()
    }

    /// Reload the selected station in the foreground.
    ///
    /// Does nothing while no station is selected.
    pub async fn refresh(&self) -> BoardState {
        let current = {
            let machine = self.inner.machine.read().await;
            match machine.state().station() {
                Some(station) => station.clone(),
                None => return machine.state().clone(),
            }
        };
        self.select_station(current).await
    }

    /// Silently reload the selected station.
    ///
    /// Skipped unless the board is showing data and `online` is set. Failures
    /// are logged and leave the board as it was. Returns whether new data
    /// was applied.
    pub async fn background_refresh(&self, online: bool) -> bool {
        let target = self.inner.machine.read().await.begin_background(online);
        let Some((ticket, station)) = target else {
            debug!(online, "skipping background refresh");
            return false;
        };

        let result = self
            .inner
            .api
            .fetch_station_board(&station, self.inner.limit)
            .await;

        let snapshot = match result {
            Ok(board) => BoardSnapshot::new(board, Utc::now()),
            Err(e) => {
                warn!(%station, error = %e, "background refresh failed");
                return false;
            }
        };

        let applied = self
            .inner
            .machine
            .write()
            .await
            .finish_background(ticket, Ok(snapshot));
        if applied {
            debug!(%station, "background refresh applied");
        }
        applied
    }

    /// Tear the board down. Results still in flight are discarded.
    pub async fn close(&self) {
        self.inner.machine.write().await.close();
    }

    pub async fn is_closed(&self) -> bool {
        self.inner.machine.read().await.is_closed()
    }
}
