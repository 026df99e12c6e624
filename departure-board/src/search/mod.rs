//! Station search.
//!
//! Keystrokes are debounced and looked up against the transit service;
//! picking a suggestion or pressing Enter hands a station name to whoever
//! listens on the selection channel.

mod debounce;
mod input;

pub use debounce::Debouncer;
pub use input::{SearchConfig, SearchInput, SearchSnapshot};
