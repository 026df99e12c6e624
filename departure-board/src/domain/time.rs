//! Departure time handling.
//!
//! The transit service sends ISO 8601 timestamps with a numeric offset, in
//! either `+01:00` or `+0100` form. Everything the board shows about time is
//! derived from two of them per departure: the scheduled departure and the
//! real-time estimate ("prognosis").

use chrono::{DateTime, FixedOffset, Utc};

/// Error returned when parsing an invalid timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp: {value}")]
pub struct TimeError {
    value: String,
}

/// Parse a timestamp as sent by the transit service.
///
/// # Examples
///
/// ```
/// use departure_board::domain::parse_timestamp;
///
/// assert!(parse_timestamp("2024-03-15T10:23:00+0100").is_ok());
/// assert!(parse_timestamp("2024-03-15T10:23:00+01:00").is_ok());
/// assert!(parse_timestamp("10:23").is_err());
/// ```
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, TimeError> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z"))
        .map_err(|_| TimeError {
            value: s.to_string(),
        })
}

/// Pick the timestamp a departure is displayed with.
///
/// The real-time estimate wins whenever it is present, whether or not it
/// differs from the schedule. There is no further fallback.
pub fn display_timestamp<'a>(
    estimated: Option<&'a str>,
    scheduled: Option<&'a str>,
) -> Option<&'a str> {
    estimated.filter(|s| !s.is_empty()).or(scheduled)
}

/// Whole minutes from `now` until `target`, rounded down.
///
/// Negative once the target has passed. An absent target counts as 0.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use departure_board::domain::minutes_until;
///
/// let now = Utc::now();
/// let target = (now + Duration::seconds(89)).fixed_offset();
/// assert_eq!(minutes_until(Some(target), now), 1);
/// assert_eq!(minutes_until(None, now), 0);
/// ```
pub fn minutes_until(target: Option<DateTime<FixedOffset>>, now: DateTime<Utc>) -> i64 {
    let Some(target) = target else {
        return 0;
    };

    let diff_ms = target
        .with_timezone(&Utc)
        .signed_duration_since(now)
        .num_milliseconds();

    diff_ms.div_euclid(60_000)
}

/// Whether a departure is close enough to show as "now" instead of a countdown.
pub fn is_imminent(minutes: i64) -> bool {
    minutes < 1
}

/// Delay readout for a departure, e.g. `+3'`.
///
/// Only shown for a positive delay on a departure that is not imminent.
pub fn delay_label(delay: Option<i64>, imminent: bool) -> Option<String> {
    match delay {
        Some(d) if d > 0 && !imminent => Some(format!("+{d}'")),
        _ => None,
    }
}

/// Wall-clock `HH:MM` in the timestamp's own offset.
pub fn format_clock(ts: &DateTime<FixedOffset>) -> String {
    ts.format("%H:%M").to_string()
}
