//! Station query types.

use std::fmt;

/// Error returned when parsing an invalid station query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station query: {reason}")]
pub struct InvalidStationQuery {
    reason: &'static str,
}

/// What a station board is requested for: a numeric station id or a free-text name.
///
/// The transit service takes ids and names through different query parameters,
/// so the distinction is made once, at parse time.
///
/// # Examples
///
/// ```
/// use departure_board::domain::StationQuery;
///
/// let by_id = StationQuery::parse("8576197").unwrap();
/// assert!(by_id.is_id());
///
/// let by_name = StationQuery::parse("Zürich HB").unwrap();
/// assert!(!by_name.is_id());
/// assert_eq!(by_name.as_str(), "Zürich HB");
///
/// // Blank input is rejected
/// assert!(StationQuery::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum StationQuery {
    /// Purely numeric station identifier.
    Id(String),
    /// Station name, sent URL-encoded.
    Name(String),
}

impl StationQuery {
    /// Parse a station query.
    ///
    /// Surrounding whitespace is trimmed. Input made only of ASCII digits is an id,
    /// anything else non-empty is a name.
    pub fn parse(s: &str) -> Result<Self, InvalidStationQuery> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidStationQuery {
                reason: "must not be empty",
            });
        }

        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok(StationQuery::Id(trimmed.to_string()))
        } else {
            Ok(StationQuery::Name(trimmed.to_string()))
        }
    }

    /// Whether this query addresses a station by id.
    pub fn is_id(&self) -> bool {
        matches!(self, StationQuery::Id(_))
    }

    /// The raw id or name.
    pub fn as_str(&self) -> &str {
        match self {
            StationQuery::Id(s) | StationQuery::Name(s) => s,
        }
    }

    /// The query parameter pair for the station board endpoint.
    pub fn query_param(&self) -> (&'static str, &str) {
        match self {
            StationQuery::Id(id) => ("id", id),
            StationQuery::Name(name) => ("station", name),
        }
    }
}

impl fmt::Debug for StationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationQuery::Id(id) => write!(f, "StationQuery::Id({id})"),
            StationQuery::Name(name) => write!(f, "StationQuery::Name({name:?})"),
        }
    }
}

impl fmt::Display for StationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
