//! Host configuration loading
//!
//! Reads a TOML file into [`HostConfig`]. Every section and key is
//! optional; anything missing falls back to its default.
//!
//! ```toml
//! tick_interval_ms = 1000
//!
//! [station]
//! refresh_interval_s = 600
//! api_key = "..."
//! scale = "fahrenheit"
//!
//! [location]
//! latitude = 41.2565
//! longitude = -95.9345
//! confirm_after_ticks = 2
//!
//! [network]
//! proxy = "http://proxy.local:3128"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use omaha_core::config::{ConfigIssue, StationConfig};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Default host loop period
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// File is not valid TOML or has mistyped keys
    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),
    /// Station settings are unusable
    #[error("invalid station settings: {0}")]
    Station(ConfigIssue),
    /// Latitude outside [-90, 90]
    #[error("latitude {0} out of range")]
    Latitude(f64),
    /// Longitude outside [-180, 180]
    #[error("longitude {0} out of range")]
    Longitude(f64),
    /// Host loop period of zero
    #[error("tick_interval_ms must be positive")]
    ZeroTickInterval,
}

/// Simulated location settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Reported latitude in degrees
    pub latitude: f64,
    /// Reported longitude in degrees
    pub longitude: f64,
    /// Host ticks between a command and its confirmation
    pub confirm_after_ticks: u32,
    /// Whether commands are ever confirmed
    pub confirms: bool,
    /// Whether the service accepts start commands
    pub supports_start: bool,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: 41.2565,
            longitude: -95.9345,
            confirm_after_ticks: 1,
            confirms: true,
            supports_start: true,
        }
    }
}

/// Network settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Explicit proxy URL; the environment is used when absent
    pub proxy: Option<String>,
}

/// Everything the host runtime needs
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Scheduling and fetch settings
    pub station: StationConfig,
    /// Simulated location service
    pub location: LocationConfig,
    /// HTTP settings
    pub network: NetworkConfig,
    /// Host loop period
    pub tick_interval_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            station: StationConfig::default(),
            location: LocationConfig::default(),
            network: NetworkConfig::default(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl HostConfig {
    /// Parse and validate TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: HostConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.station.validate().map_err(ConfigError::Station)?;
        if !(-90.0..=90.0).contains(&self.location.latitude) {
            return Err(ConfigError::Latitude(self.location.latitude));
        }
        if !(-180.0..=180.0).contains(&self.location.longitude) {
            return Err(ConfigError::Longitude(self.location.longitude));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omaha_core::weather::TemperatureScale;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = HostConfig::from_toml("").unwrap();
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.station.refresh_interval_s, 600);
        assert_eq!(config.tick_interval_ms, 1_000);
    }

    #[test]
    fn test_partial_sections() {
        let config = HostConfig::from_toml(
            r#"
            tick_interval_ms = 250

            [station]
            refresh_interval_s = 30
            api_key = "abc"
            scale = "fahrenheit"

            [location]
            latitude = -33.87
            confirms = false

            [network]
            proxy = "http://proxy.local:3128"
            "#,
        )
        .unwrap();

        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.station.refresh_interval_s, 30);
        assert_eq!(config.station.location_timeout_s, 120);
        assert_eq!(config.station.api_key, "abc");
        assert_eq!(config.station.scale, TemperatureScale::Fahrenheit);
        assert_eq!(config.location.latitude, -33.87);
        assert_eq!(config.location.longitude, -95.9345);
        assert!(!config.location.confirms);
        assert_eq!(config.network.proxy.as_deref(), Some("http://proxy.local:3128"));
    }

    #[test]
    fn test_mistyped_key_rejected() {
        let err = HostConfig::from_toml("[station]\nrefresh_interval_s = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_refresh_rejected() {
        let err = HostConfig::from_toml("[station]\nrefresh_interval_s = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Station(ConfigIssue::ZeroRefreshInterval)));
    }

    #[test]
    fn test_coordinates_range_checked() {
        let err = HostConfig::from_toml("[location]\nlatitude = 91.0").unwrap_err();
        assert!(matches!(err, ConfigError::Latitude(_)));

        let err = HostConfig::from_toml("[location]\nlongitude = -180.5").unwrap_err();
        assert!(matches!(err, ConfigError::Longitude(_)));

        assert!(HostConfig::from_toml("[location]\nlatitude = -90.0\nlongitude = 180.0").is_ok());
    }

    #[test]
    fn test_zero_tick_interval_rejected() {
        let err = HostConfig::from_toml("tick_interval_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTickInterval));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("omaha-config-{}.toml", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[station]\nfetch_timeout_s = 9").unwrap();
        drop(file);

        let config = HostConfig::load(&path).unwrap();
        assert_eq!(config.station.fetch_timeout_s, 9);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let err = HostConfig::load(Path::new("/nonexistent/omaha.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
