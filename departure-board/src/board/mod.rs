//! The station board.
//!
//! A board shows the upcoming departures of one station. It is loaded in the
//! foreground when a station is selected or the user asks for a refresh, and
//! silently refreshed in the background by a [`RefreshTimer`] while it has
//! data to show and the browser reports being online.

mod connectivity;
mod controller;
mod state;
mod timer;

pub use connectivity::Connectivity;
pub use controller::StationBoard;
pub use state::{BoardMachine, BoardSnapshot, BoardState, Ticket};
pub use timer::RefreshTimer;
