//! Station board state machine.
//!
//! All state transitions of a board live here, free of IO, so the
//! foreground/background asymmetry can be tested on its own:
//!
//! - A foreground load (mount, manual refresh, new station) that fails
//!   discards any data and shows the error.
//! - A background refresh that fails changes nothing.
//!
//! Every foreground load takes a fresh [`Ticket`]. A result is only applied
//! if its ticket is still the newest, so a slow response can never overwrite
//! the result of a load started after it.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::StationQuery;
use crate::transit::StationBoardResponse;

/// One fetched board and when it arrived.
///
/// Snapshots are replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub board: StationBoardResponse,
    pub updated_at: DateTime<Utc>,
}

impl BoardSnapshot {
    pub fn new(board: StationBoardResponse, updated_at: DateTime<Utc>) -> Self {
        Self { board, updated_at }
    }
}

/// What the board is currently showing.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardState {
    /// No station chosen yet.
    Idle,
    /// A foreground request is in flight.
    ///
    /// `previous` holds the data being refreshed when reloading the same
    /// station, so it can stay on screen until the answer arrives.
    Loading {
        station: StationQuery,
        previous: Option<Arc<BoardSnapshot>>,
    },
    /// The last foreground request succeeded.
    Loaded {
        station: StationQuery,
        snapshot: Arc<BoardSnapshot>,
    },
    /// The last foreground request failed. No data is retained.
    Error {
        station: StationQuery,
        message: String,
    },
}

impl BoardState {
    /// The selected station, if any.
    pub fn station(&self) -> Option<&StationQuery> {
        match self {
            BoardState::Idle => None,
            BoardState::Loading { station, .. }
            | BoardState::Loaded { station, .. }
            | BoardState::Error { station, .. } => Some(station),
        }
    }

    /// Data currently fit to display.
    pub fn snapshot(&self) -> Option<&Arc<BoardSnapshot>> {
        match self {
            BoardState::Loaded { snapshot, .. } => Some(snapshot),
            BoardState::Loading { previous, .. } => previous.as_ref(),
            BoardState::Idle | BoardState::Error { .. } => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, BoardState::Loading { .. })
    }

    /// The error message, in the error state.
    pub fn error(&self) -> Option<&str> {
        match self {
            BoardState::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Proof that a request was started, handed back with its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// The board's state plus the bookkeeping needed to apply results safely.
#[derive(Debug)]
pub struct BoardMachine {
    state: BoardState,
    generation: u64,
    closed: bool,
}

impl Default for BoardMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardMachine {
    pub fn new() -> Self {
        Self {
            state: BoardState::Idle,
            generation: 0,
            closed: false,
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Start a foreground load. Returns `None` once the board is closed.
    ///
    /// Clears any error. Keeps the current data visible only when reloading
    /// the station it belongs to.
    pub fn begin_load(&mut self, station: StationQuery) -> Option<Ticket> {
        if self.closed {
            return None;
        }

        let previous = match &self.state {
            BoardState::Loaded {
                station: current,
                snapshot,
            } if *current == station => Some(snapshot.clone()),
            BoardState::Loading {
                station: current,
                previous,
            } if *current == station => previous.clone(),
            _ => None,
        };

        self.generation += 1;
        self.state = BoardState::Loading { station, previous };
        Some(Ticket(self.generation))
    }

    /// Apply the result of a foreground load.
    ///
    /// Success replaces the data; failure discards it and records the message.
    /// Returns whether the result was applied: results for superseded tickets
    /// and results arriving after [`close`](Self::close) are dropped.
    pub fn finish_load(&mut self, ticket: Ticket, result: Result<BoardSnapshot, String>) -> bool {
        if self.closed || ticket.0 != self.generation {
            return false;
        }

        let BoardState::Loading { station, .. } = &self.state else {
            return false;
        };
        let station = station.clone();

        self.state = match result {
            Ok(snapshot) => BoardState::Loaded {
                station,
                snapshot: Arc::new(snapshot),
            },
            Err(message) => BoardState::Error { station, message },
        };
        true
    }

    /// Decide whether a background refresh may run now.
    ///
    /// Only when a station is selected, no foreground load is in flight, the
    /// last foreground load did not fail, and the network is reported up.
    /// That is exactly the `Loaded` state while online.
    pub fn begin_background(&self, online: bool) -> Option<(Ticket, StationQuery)> {
        if self.closed || !online {
            return None;
        }

        match &self.state {
            BoardState::Loaded { station, .. } => {
                Some((Ticket(self.generation), station.clone()))
            }
            _ => None,
        }
    }

    /// Apply the result of a background refresh.
    ///
    /// Success replaces the data if nothing happened to the board meanwhile.
    /// Failure never changes anything.
    pub fn finish_background(
        &mut self,
        ticket: Ticket,
        result: Result<BoardSnapshot, String>,
    ) -> bool {
        if self.closed || ticket.0 != self.generation {
            return false;
        }

        let Ok(snapshot) = result else {
            return false;
        };

        match &mut self.state {
            BoardState::Loaded { snapshot: current, .. } => {
                *current = Arc::new(snapshot);
                true
            }
            _ => false,
        }
    }

    /// Tear the board down. Later results are ignored and no load can start.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
