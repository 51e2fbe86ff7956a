//! Dashboard configuration.
//!
//! Everything the dashboard needs is read once at startup and passed
//! explicitly to the components that use it.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;

use crate::domain::StationCode;
use crate::poller::PollSchedule;
use crate::reconcile::BusProvider;
use crate::wmata::{DEFAULT_MAX_CONCURRENT, DEFAULT_TIMEOUT_SECS};

/// Default WMATA API root.
const DEFAULT_WMATA_BASE_URL: &str = "https://api.wmata.com";

/// Default GBFS feed root: Capital Bikeshare, GBFS 2.3, English.
const DEFAULT_GBFS_BASE_URL: &str = "https://gbfs.lyft.com/gbfs/2.3/dca-cabi/en";

/// Rail station shown when none is configured (L'Enfant Plaza).
const DEFAULT_RAIL_STATION: &str = "D03";

const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 3000));

/// Errors from building a [`DashboardConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {name}: {message}")]
    Invalid { name: &'static str, message: String },

    #[error("bus stop {stop} is served by BusTime, but BUSTIME_BASE_URL and BUSTIME_API_KEY are not set")]
    BusTimeRequired { stop: String },
}

/// Connection details for the regional BusTime server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusTimeSettings {
    pub base_url: String,
    pub api_key: String,
}

/// Configuration for one dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// WMATA API key
    pub api_key: String,

    /// Rail station codes, one panel each
    pub rail_stations: Vec<String>,

    /// Bus stop ids, one panel each
    pub bus_stops: Vec<String>,

    /// GBFS station ids, one panel each
    pub bikeshare_stations: Vec<String>,

    pub wmata_base_url: String,

    pub gbfs_base_url: String,

    /// Needed only when a 4-character bus stop is configured
    pub bustime: Option<BusTimeSettings>,

    /// Address the HTTP server binds to
    pub listen_addr: SocketAddr,

    /// Timeout applied to every upstream request
    pub request_timeout_secs: u64,

    /// WMATA requests allowed in flight at once, across every panel
    pub wmata_max_concurrent: usize,

    /// Cadence for rail and bus predictions
    pub prediction_schedule: PollSchedule,

    /// Cadence for bikeshare availability
    pub bikeshare_schedule: PollSchedule,
}

impl DashboardConfig {
    /// Create a configuration with the given API key and default selection.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            rail_stations: vec![DEFAULT_RAIL_STATION.to_string()],
            bus_stops: Vec::new(),
            bikeshare_stations: Vec::new(),
            wmata_base_url: DEFAULT_WMATA_BASE_URL.to_string(),
            gbfs_base_url: DEFAULT_GBFS_BASE_URL.to_string(),
            bustime: None,
            listen_addr: DEFAULT_LISTEN_ADDR,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            wmata_max_concurrent: DEFAULT_MAX_CONCURRENT,
            prediction_schedule: PollSchedule::predictions(),
            bikeshare_schedule: PollSchedule::bikeshare(),
        }
    }

    pub fn with_rail_stations(mut self, codes: Vec<String>) -> Self {
        self.rail_stations = codes;
        self
    }

    pub fn with_bus_stops(mut self, stops: Vec<String>) -> Self {
        self.bus_stops = stops;
        self
    }

    pub fn with_bikeshare_stations(mut self, ids: Vec<String>) -> Self {
        self.bikeshare_stations = ids;
        self
    }

    pub fn with_bustime(mut self, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.bustime = Some(BusTimeSettings {
            base_url: base_url.into(),
            api_key: api_key.into(),
        });
        self
    }

    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from any variable lookup.
    ///
    /// Unset and empty variables are treated alike.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut config = Self::new(var("WMATA_API_KEY").unwrap_or_default());

        if let Some(list) = lookup("RAIL_STATIONS") {
            config.rail_stations = parse_list(&list);
        }
        if let Some(list) = var("BUS_STOPS") {
            config.bus_stops = parse_list(&list);
        }
        if let Some(list) = var("BIKESHARE_STATIONS") {
            config.bikeshare_stations = parse_list(&list);
        }
        if let Some(url) = var("WMATA_BASE_URL") {
            config.wmata_base_url = url;
        }
        if let Some(url) = var("GBFS_BASE_URL") {
            config.gbfs_base_url = url;
        }
        if let (Some(base_url), Some(api_key)) = (var("BUSTIME_BASE_URL"), var("BUSTIME_API_KEY"))
        {
            config = config.with_bustime(base_url, api_key);
        }

        if let Some(addr) = var("LISTEN_ADDR") {
            config.listen_addr = parse_var("LISTEN_ADDR", &addr)?;
        }
        if let Some(secs) = var("REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", &secs)?;
        }
        if let Some(n) = var("WMATA_MAX_CONCURRENT") {
            config.wmata_max_concurrent = parse_var("WMATA_MAX_CONCURRENT", &n)?;
        }

        config.validate()
    }

    /// Check the selection and normalize rail codes to upper case.
    ///
    /// Whether a well-formed rail code names a real station is left to the
    /// catalog.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        self.rail_stations = self
            .rail_stations
            .iter()
            .map(|code| {
                StationCode::parse_normalized(code)
                    .map(|c| c.to_string())
                    .map_err(|e| ConfigError::Invalid {
                        name: "RAIL_STATIONS",
                        message: e.to_string(),
                    })
            })
            .collect::<Result<_, _>>()?;

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "REQUEST_TIMEOUT_SECS",
                message: "must be at least 1".into(),
            });
        }
        if self.wmata_max_concurrent == 0 {
            return Err(ConfigError::Invalid {
                name: "WMATA_MAX_CONCURRENT",
                message: "must be at least 1".into(),
            });
        }

        let needs_wmata = !self.rail_stations.is_empty()
            || self
                .bus_stops
                .iter()
                .any(|s| BusProvider::for_stop(s) == BusProvider::Wmata);
        if needs_wmata && self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("WMATA_API_KEY"));
        }

        if self.bustime.is_none() {
            if let Some(stop) = self
                .bus_stops
                .iter()
                .find(|s| BusProvider::for_stop(s) == BusProvider::BusTime)
            {
                return Err(ConfigError::BusTimeRequired { stop: stop.clone() });
            }
        }

        Ok(self)
    }
}

fn parse_var<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e| ConfigError::Invalid {
        name,
        message: format!("{raw}: {e}"),
    })
}

/// Split a comma-separated list, dropping blanks and surrounding space.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
