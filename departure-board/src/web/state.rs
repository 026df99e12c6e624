//! Application state for the web layer.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::board::{Connectivity, StationBoard};
use crate::config::BoardConfig;
use crate::search::SearchInput;
use crate::transit::Backend;

/// Shared application state.
///
/// The server owns exactly one board and one search box; every browser
/// connected to it sees and drives the same pair.
#[derive(Clone)]
pub struct AppState {
    /// The departure board
    pub board: StationBoard<Backend>,

    /// The station search box
    pub search: SearchInput<Backend>,

    /// Network availability reported by the browser
    pub connectivity: Connectivity,

    pub config: Arc<BoardConfig>,
}

impl AppState {
    /// Create the board and search box over `backend`.
    ///
    /// Stations committed in the search box are loaded on the board by the
    /// returned task, which ends once the state is dropped.
    pub fn new(backend: Backend, config: BoardConfig) -> (Self, JoinHandle<()>) {
        let board = StationBoard::new(backend.clone(), config.limit);
        let (search, selections) = SearchInput::new(backend, config.search.clone());
        let follower = board.follow(selections);

        let state = Self {
            board,
            search,
            connectivity: Connectivity::default(),
            config: Arc::new(config),
        };
        (state, follower)
    }
}
