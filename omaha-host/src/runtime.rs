//! Host tick loop body
//!
//! One step stands in for one pass of the platform event loop: the
//! simulated provider gets a chance to confirm, then due timers fire.

use std::io::{Stdout, Write};

use omaha_core::link::LinkPhase;
use omaha_core::traits::{Clock, NetworkClient};
use omaha_core::WeatherStation;
use omaha_drivers::config::HostConfig;
use omaha_drivers::decoder::JsonWeatherDecoder;
use omaha_drivers::location::SimulatedLocationProvider;
use omaha_drivers::sink::TerminalSink;
use tracing::{debug, trace};

type Station<N, C, W> =
    WeatherStation<SimulatedLocationProvider, N, JsonWeatherDecoder, C, TerminalSink<W>>;

/// Station wired to the host collaborators
pub struct Runtime<N, C, W = Stdout> {
    station: Station<N, C, W>,
}

impl<N: NetworkClient, C: Clock> Runtime<N, C, Stdout> {
    /// Build a runtime that prints to standard output
    pub fn new(config: &HostConfig, network: N, clock: C) -> Self {
        let sink = TerminalSink::stdout(clock.utc_offset_s());
        Self::with_sink(config, network, clock, sink)
    }
}

impl<N: NetworkClient, C: Clock, W: Write> Runtime<N, C, W> {
    /// Build a runtime around an explicit sink
    pub fn with_sink(config: &HostConfig, network: N, clock: C, sink: TerminalSink<W>) -> Self {
        let provider = SimulatedLocationProvider::from_config(&config.location);
        let station = WeatherStation::new(
            &config.station,
            provider,
            network,
            JsonWeatherDecoder::new(),
            clock,
            sink,
        );
        Self { station }
    }

    /// Arm the periodic wake and issue the startup request
    pub fn start(&mut self) {
        self.station.start();
    }

    /// Run one loop iteration
    ///
    /// Returns the number of timers that fired.
    pub fn step(&mut self) -> usize {
        if let Some(state) = self.station.provider_mut().advance() {
            debug!(?state, "delivering location confirmation");
            self.station.on_provider_state(state);
        }
        let fired = self.station.tick();
        trace!(fired, phase = ?self.station.phase(), "tick");
        fired
    }

    /// Current link phase
    pub fn phase(&self) -> LinkPhase {
        self.station.phase()
    }

    /// Access the station
    pub fn station(&self) -> &Station<N, C, W> {
        &self.station
    }
}
