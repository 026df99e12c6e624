//! Domain types and rules for the departure board.
//!
//! Pure functions and validated types only: nothing in this module performs
//! IO or reads the clock, so callers pass `now` explicitly.

mod destination;
mod line_style;
mod station;
mod time;

pub use destination::clean_destination;
pub use line_style::{LineStyle, TransportIcon, badge_text, icon_for, style_for};
pub use station::{InvalidStationQuery, StationQuery};
pub use time::{
    TimeError, delay_label, display_timestamp, format_clock, is_imminent, minutes_until,
    parse_timestamp,
};
