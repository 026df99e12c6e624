//! Live departure board server.
//!
//! Shows the next departures from one Swiss public transport station, with a
//! search box to switch stations, backed by transport.opendata.ch.

pub mod board;
pub mod config;
pub mod domain;
pub mod search;
pub mod transit;
pub mod web;
