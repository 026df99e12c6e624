//! Transit client error types.

/// Coarse classification of a [`TransitError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The service answered with a non-2xx status.
    Service,
    /// The service answered, but found no matching station.
    NotFound,
    /// The service could not be reached at all.
    Network,
    /// Anything else.
    Unknown,
}

/// Errors from the transit HTTP client.
///
/// The `Display` text is meant for the user: the board shows it verbatim.
#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    /// Service returned an error status code
    #[error("Service unavailable ({status})")]
    Service { status: u16 },

    /// Well-formed response carrying no station name
    #[error("Station not found")]
    NotFound,

    /// Connection could not be established or timed out
    #[error("Network error: Unable to connect to transport service.")]
    Network(#[source] reqwest::Error),

    /// Any other HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Mock backend could not be loaded
    #[error("fixture error: {message}")]
    Fixture { message: String },
}

impl TransitError {
    /// Which of the four failure modes this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransitError::Service { .. } => ErrorKind::Service,
            TransitError::NotFound => ErrorKind::NotFound,
            TransitError::Network(_) => ErrorKind::Network,
            TransitError::Http(_) | TransitError::Json { .. } | TransitError::Fixture { .. } => {
                ErrorKind::Unknown
            }
        }
    }
}

impl From<reqwest::Error> for TransitError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            TransitError::Network(err)
        } else {
            TransitError::Http(err)
        }
    }
}
