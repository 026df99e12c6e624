//! Web layer for the departure board.
//!
//! Serves the board page, the fragments it repaints itself with, and the
//! endpoints the browser forwards search box events to.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
