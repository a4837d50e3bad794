//! Configuration type definitions

use alloc::string::String;
use core::fmt;

use crate::timer::Seconds;
use crate::weather::TemperatureScale;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default periodic wake interval (10 minutes)
pub const DEFAULT_REFRESH_INTERVAL_S: Seconds = 600;

/// Default bound on waiting for a provider confirmation
pub const DEFAULT_LOCATION_TIMEOUT_S: Seconds = 120;

/// Default per-attempt network timeout
pub const DEFAULT_FETCH_TIMEOUT_S: u32 = 5;

/// Default weather endpoint
pub const DEFAULT_ENDPOINT: &str = "http://api.openweathermap.org/data/2.5/weather";

/// Station configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StationConfig {
    /// Interval of the periodic wake that drives weather refresh
    pub refresh_interval_s: Seconds,
    /// Watchdog bound on an enable request
    pub location_timeout_s: Seconds,
    /// Timeout for each network attempt
    pub fetch_timeout_s: u32,
    /// Weather endpoint, without query string
    pub endpoint: String,
    /// API credential appended as `APPID`
    pub api_key: String,
    /// Initial temperature scale
    pub scale: TemperatureScale,
    /// Request the location service once at startup
    pub enable_on_start: bool,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            refresh_interval_s: DEFAULT_REFRESH_INTERVAL_S,
            location_timeout_s: DEFAULT_LOCATION_TIMEOUT_S,
            fetch_timeout_s: DEFAULT_FETCH_TIMEOUT_S,
            endpoint: String::from(DEFAULT_ENDPOINT),
            api_key: String::new(),
            scale: TemperatureScale::Celsius,
            enable_on_start: true,
        }
    }
}

/// Configuration value that cannot be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigIssue {
    /// Refresh interval of zero would wake on every tick
    ZeroRefreshInterval,
    /// Watchdog bound of zero would fire before any confirmation
    ZeroLocationTimeout,
    /// Network timeout of zero
    ZeroFetchTimeout,
    /// Endpoint is empty
    EmptyEndpoint,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigIssue::ZeroRefreshInterval => "refresh_interval_s must be positive",
            ConfigIssue::ZeroLocationTimeout => "location_timeout_s must be positive",
            ConfigIssue::ZeroFetchTimeout => "fetch_timeout_s must be positive",
            ConfigIssue::EmptyEndpoint => "endpoint must not be empty",
        };
        f.write_str(msg)
    }
}

impl StationConfig {
    /// Check the values the scheduler depends on
    pub fn validate(&self) -> Result<(), ConfigIssue> {
        if self.refresh_interval_s == 0 {
            return Err(ConfigIssue::ZeroRefreshInterval);
        }
        if self.location_timeout_s == 0 {
            return Err(ConfigIssue::ZeroLocationTimeout);
        }
        if self.fetch_timeout_s == 0 {
            return Err(ConfigIssue::ZeroFetchTimeout);
        }
        if self.endpoint.trim().is_empty() {
            return Err(ConfigIssue::EmptyEndpoint);
        }
        Ok(())
    }
}
