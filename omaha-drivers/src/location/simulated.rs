//! Simulated location provider
//!
//! Stands in for platform location hardware on the host. Commands are
//! accepted immediately and confirmed a configurable number of ticks later;
//! the host drains confirmations with [`SimulatedLocationProvider::advance`]
//! and feeds them to the station.

use omaha_core::traits::{Fix, LocationProvider, ProviderError, ServiceState};
use tracing::{debug, trace};

use crate::config::LocationConfig;

/// A command waiting to be confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    state: ServiceState,
    remaining: u32,
}

/// Location provider with scripted confirmation latency
#[derive(Debug, Clone)]
pub struct SimulatedLocationProvider {
    fix: Fix,
    /// Ticks before a command is confirmed; `None` never confirms
    confirm_after: Option<u32>,
    supports_start: bool,
    state: ServiceState,
    pending: Option<Pending>,
}

impl SimulatedLocationProvider {
    /// Create a provider reporting a fixed position
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            fix: Fix {
                latitude,
                longitude,
                timestamp: 0,
            },
            confirm_after: Some(1),
            supports_start: true,
            state: ServiceState::Disabled,
            pending: None,
        }
    }

    /// Create a provider from host settings
    pub fn from_config(config: &LocationConfig) -> Self {
        let mut provider = Self::new(config.latitude, config.longitude);
        provider.confirm_after = config.confirms.then_some(config.confirm_after_ticks);
        provider.supports_start = config.supports_start;
        provider
    }

    /// Confirm commands after `ticks` calls to [`advance`](Self::advance)
    pub fn confirm_after(mut self, ticks: Option<u32>) -> Self {
        self.confirm_after = ticks;
        self
    }

    /// State the simulated service is in
    pub fn state(&self) -> ServiceState {
        self.state
    }

    /// Check whether a confirmation is still outstanding
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Advance one tick, returning a confirmation if one is due
    pub fn advance(&mut self) -> Option<ServiceState> {
        let pending = self.pending.as_mut()?;
        if pending.remaining > 0 {
            pending.remaining -= 1;
        }
        if pending.remaining > 0 {
            return None;
        }

        let state = pending.state;
        self.pending = None;
        self.state = state;
        debug!(?state, "simulated location confirmed");
        Some(state)
    }

    fn command(&mut self, state: ServiceState) {
        match self.confirm_after {
            Some(ticks) => {
                self.pending = Some(Pending {
                    state,
                    remaining: ticks,
                });
            }
            None => {
                trace!(?state, "simulated location will never confirm");
                self.pending = None;
            }
        }
    }
}

impl LocationProvider for SimulatedLocationProvider {
    fn start(&mut self) -> Result<(), ProviderError> {
        if !self.supports_start {
            return Err(ProviderError::NotSupported);
        }
        self.command(ServiceState::Enabled);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ProviderError> {
        self.command(ServiceState::Disabled);
        Ok(())
    }

    fn position(&mut self) -> Result<Fix, ProviderError> {
        if self.state != ServiceState::Enabled {
            return Err(ProviderError::NoFix);
        }
        Ok(self.fix)
    }
}
