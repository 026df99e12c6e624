//! Runtime configuration for the departure board server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::StationQuery;
use crate::search::SearchConfig;
use crate::transit::{
    Backend, CacheConfig, CachedTransitClient, DEFAULT_BASE_URL, DEFAULT_LIMIT, MIN_QUERY_CHARS,
    MockTransitClient, TransitClient, TransitConfig, TransitError,
};

/// Station shown on startup: Zürich, Escher-Wyss-Platz.
pub const DEFAULT_STATION: &str = "8576197";

/// City prefix stripped from destination labels.
pub const DEFAULT_CITY_PREFIX: &str = "Zürich";

/// Configuration for the whole application.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Transit service base URL.
    pub base_url: String,

    /// Station shown on startup.
    pub station: StationQuery,

    /// Departures requested per board.
    pub limit: u32,

    /// Period of the silent background refresh.
    pub refresh_interval: Duration,

    /// Search box tuning.
    pub search: SearchConfig,

    /// Transit request timeout in seconds.
    pub timeout_secs: u64,

    /// Leading city name stripped from destinations, if any.
    pub city_prefix: Option<String>,

    /// Address the HTTP server listens on.
    pub bind: SocketAddr,

    /// Serve fixture files from this directory instead of the live service.
    pub mock_dir: Option<PathBuf>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            station: StationQuery::Id(DEFAULT_STATION.to_string()),
            limit: DEFAULT_LIMIT,
            refresh_interval: Duration::from_secs(60),
            search: SearchConfig {
                debounce: Duration::from_millis(300),
                max_suggestions: 5,
                min_query_chars: MIN_QUERY_CHARS,
            },
            timeout_secs: 30,
            city_prefix: Some(DEFAULT_CITY_PREFIX.to_string()),
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            mock_dir: None,
        }
    }
}

impl BoardConfig {
    /// Defaults overridden by the process environment.
    ///
    /// | Variable             | Overrides          |
    /// |----------------------|--------------------|
    /// | `BOARD_STATION`      | startup station    |
    /// | `BOARD_BIND`         | listen address     |
    /// | `BOARD_REFRESH_SECS` | refresh period     |
    /// | `BOARD_CITY_PREFIX`  | city prefix (empty disables) |
    /// | `TRANSIT_BASE_URL`   | service base URL   |
    /// | `TRANSIT_MOCK_DIR`   | fixture directory  |
    ///
    /// Invalid values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup("BOARD_STATION") {
            match StationQuery::parse(&value) {
                Ok(station) => config.station = station,
                Err(e) => warn!(value = %value, error = %e, "ignoring BOARD_STATION"),
            }
        }

        if let Some(value) = lookup("BOARD_BIND") {
            match value.parse() {
                Ok(addr) => config.bind = addr,
                Err(e) => warn!(value = %value, error = %e, "ignoring BOARD_BIND"),
            }
        }

        if let Some(value) = lookup("BOARD_REFRESH_SECS") {
            match value.parse::<u64>() {
                Ok(secs) if secs > 0 => config.refresh_interval = Duration::from_secs(secs),
                Ok(_) => warn!(value = %value, "ignoring BOARD_REFRESH_SECS: must be positive"),
                Err(e) => warn!(value = %value, error = %e, "ignoring BOARD_REFRESH_SECS"),
            }
        }

        if let Some(value) = lookup("BOARD_CITY_PREFIX") {
            let value = value.trim();
            config.city_prefix = (!value.is_empty()).then(|| value.to_string());
        }

        if let Some(value) = lookup("TRANSIT_BASE_URL") {
            if value.starts_with("http://") || value.starts_with("https://") {
                config.base_url = value;
            } else {
                warn!(value = %value, "ignoring TRANSIT_BASE_URL: not an http(s) URL");
            }
        }

        if let Some(value) = lookup("TRANSIT_MOCK_DIR")
            && !value.is_empty()
        {
            config.mock_dir = Some(PathBuf::from(value));
        }

        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.search.debounce = debounce;
        self
    }

    pub fn with_city_prefix(mut self, prefix: Option<&str>) -> Self {
        self.city_prefix = prefix.map(str::to_string);
        self
    }

    pub fn with_mock_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.mock_dir = Some(dir.into());
        self
    }

    /// Settings for the transit HTTP client.
    pub fn transit(&self) -> TransitConfig {
        TransitConfig::new()
            .with_base_url(&self.base_url)
            .with_timeout(self.timeout_secs)
    }

    /// The backend to serve from: fixtures when `mock_dir` is set, otherwise
    /// the live service behind a location cache.
    pub fn backend(&self) -> Result<Backend, TransitError> {
        if let Some(dir) = &self.mock_dir {
            let mock = MockTransitClient::new(dir)?;
            info!(dir = %dir.display(), boards = mock.board_count(), "using mock transit data");
            return Ok(Backend::Mock(mock));
        }

        let client = TransitClient::new(self.transit())?;
        info!(base_url = %self.base_url, "using live transit service");
        Ok(Backend::Live(CachedTransitClient::new(
            client,
            &CacheConfig::default(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.base_url, "https://transport.opendata.ch/v1");
        assert_eq!(config.station, StationQuery::Id("8576197".into()));
        assert_eq!(config.limit, 15);
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.search.debounce, Duration::from_millis(300));
        assert_eq!(config.search.max_suggestions, 5);
        assert_eq!(config.search.min_query_chars, 2);
        assert_eq!(config.city_prefix.as_deref(), Some("Zürich"));
        assert_eq!(config.bind.to_string(), "127.0.0.1:3000");
        assert!(config.mock_dir.is_none());
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = BoardConfig::from_lookup(lookup(&[]));
        assert_eq!(config.station, BoardConfig::default().station);
        assert_eq!(config.bind, BoardConfig::default().bind);
    }

    #[test]
    fn environment_overrides() {
        let config = BoardConfig::from_lookup(lookup(&[
            ("BOARD_STATION", "Bern"),
            ("BOARD_BIND", "0.0.0.0:8080"),
            ("BOARD_REFRESH_SECS", "30"),
            ("BOARD_CITY_PREFIX", "Bern"),
            ("TRANSIT_BASE_URL", "http://localhost:9000/v1"),
            ("TRANSIT_MOCK_DIR", "fixtures"),
        ]));

        assert_eq!(config.station, StationQuery::Name("Bern".into()));
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.refresh_interval, Duration::from_secs(30));
        assert_eq!(config.city_prefix.as_deref(), Some("Bern"));
        assert_eq!(config.base_url, "http://localhost:9000/v1");
        assert_eq!(config.mock_dir, Some(PathBuf::from("fixtures")));
    }

    #[test]
    fn invalid_values_are_ignored() {
        let config = BoardConfig::from_lookup(lookup(&[
            ("BOARD_STATION", "   "),
            ("BOARD_BIND", "not an address"),
            ("BOARD_REFRESH_SECS", "0"),
            ("TRANSIT_BASE_URL", "ftp://example.com"),
        ]));
        let defaults = BoardConfig::default();

        assert_eq!(config.station, defaults.station);
        assert_eq!(config.bind, defaults.bind);
        assert_eq!(config.refresh_interval, defaults.refresh_interval);
        assert_eq!(config.base_url, defaults.base_url);
    }

    #[test]
    fn blank_city_prefix_disables_stripping() {
        let config = BoardConfig::from_lookup(lookup(&[("BOARD_CITY_PREFIX", "")]));
        assert!(config.city_prefix.is_none());
    }

    #[test]
    fn mock_dir_selects_fixture_backend() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("8576197.json"),
            r#"{"station": {"id": "8576197", "name": "Zürich, Escher-Wyss-Platz"}, "stationboard": []}"#,
        )
        .unwrap();

        let config = BoardConfig::default().with_mock_dir(dir.path());
        assert!(matches!(config.backend().unwrap(), Backend::Mock(_)));
    }

    #[test]
    fn live_backend_by_default() {
        let config = BoardConfig::default();
        assert!(matches!(config.backend().unwrap(), Backend::Live(_)));
    }

    #[test]
    fn builders() {
        let config = BoardConfig::default()
            .with_base_url("http://127.0.0.1:1")
            .with_debounce(Duration::from_millis(10))
            .with_city_prefix(None);

        assert_eq!(config.transit().base_url, "http://127.0.0.1:1");
        assert_eq!(config.transit().timeout_secs, 30);
        assert_eq!(config.search.debounce, Duration::from_millis(10));
        assert!(config.city_prefix.is_none());
    }
}
