//! Location provider trait

use core::fmt;

/// Location service state as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceState {
    /// Service stopped, hardware powered down
    Disabled,
    /// Service running, fixes available
    Enabled,
}

/// A position reading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fix {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Unix time of the reading
    pub timestamp: i64,
}

/// Errors reported by a location provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProviderError {
    /// Requested method or operation not supported on this device
    NotSupported,
    /// Platform refused the command (platform error code)
    Rejected(i32),
    /// Service is running but has no position yet
    NoFix,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::NotSupported => f.write_str("unsupported"),
            ProviderError::Rejected(code) => write!(f, "rejected({})", code),
            ProviderError::NoFix => f.write_str("no fix"),
        }
    }
}

/// Trait for location services
///
/// `start` and `stop` only *request* a state change. The provider confirms
/// each transition later, exactly once, by having the host deliver the new
/// [`ServiceState`] to `WeatherStation::on_provider_state`.
pub trait LocationProvider {
    /// Ask the service to start
    fn start(&mut self) -> Result<(), ProviderError>;

    /// Ask the service to stop
    fn stop(&mut self) -> Result<(), ProviderError>;

    /// Read the current position
    ///
    /// Only meaningful after the provider has confirmed `Enabled`.
    fn position(&mut self) -> Result<Fix, ProviderError>;
}
