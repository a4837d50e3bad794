//! Weather station
//!
//! Ties the timer queue, the location link and the fetch orchestrator to
//! the platform collaborators. All entry points run to completion on the
//! caller's thread; the host decides when to call them.

use crate::config::StationConfig;
use crate::diag::ErrorLog;
use crate::link::{LinkContext, LinkPhase, LinkTimer, LocationLink};
use crate::timer::{Seconds, TimerQueue};
use crate::traits::{
    Clock, LocationProvider, NetworkClient, PresentationSink, ServiceState, WeatherDecoder,
};
use crate::weather::{FetchOrchestrator, WeatherDisplay};

/// The scheduling core of the watch face
pub struct WeatherStation<P, N, D, C, S> {
    timers: TimerQueue<LinkTimer>,
    link: LocationLink<P>,
    fetcher: FetchOrchestrator,
    network: N,
    decoder: D,
    clock: C,
    sink: S,
    log: ErrorLog,
    display: WeatherDisplay,
    enable_on_start: bool,
    started: bool,
    shown_revision: u32,
}

impl<P, N, D, C, S> WeatherStation<P, N, D, C, S>
where
    P: LocationProvider,
    N: NetworkClient,
    D: WeatherDecoder,
    C: Clock,
    S: PresentationSink,
{
    /// Assemble a station; nothing is armed until [`start`](Self::start)
    pub fn new(config: &StationConfig, provider: P, network: N, decoder: D, clock: C, sink: S) -> Self {
        Self {
            timers: TimerQueue::new(),
            link: LocationLink::new(
                provider,
                config.location_timeout_s,
                config.refresh_interval_s,
            ),
            fetcher: FetchOrchestrator::from_config(config),
            network,
            decoder,
            clock,
            sink,
            log: ErrorLog::new(),
            display: WeatherDisplay::new(config.scale),
            enable_on_start: config.enable_on_start,
            started: false,
            shown_revision: 0,
        }
    }

    /// Use a custom separator when rendering the error log
    ///
    /// Only takes effect before anything has been logged.
    pub fn with_log_separator(mut self, separator: &'static str) -> Self {
        if self.log.is_empty() {
            self.log = ErrorLog::with_separator(separator);
        }
        self
    }

    /// Arm the periodic wake and optionally request the first fix
    ///
    /// Calling this more than once has no further effect.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        info!("weather station starting");

        let enable_on_start = self.enable_on_start;
        let Self {
            timers, link, log, clock, ..
        } = self;
        let mut cx = LinkContext {
            timers,
            log,
            now: clock.now_s(),
            wall: clock.wall_time(),
        };
        link.arm_periodic_wake(&mut cx);
        if enable_on_start {
            link.request_state(ServiceState::Enabled, &mut cx);
        }
        self.flush_errors();
    }

    /// Run every timer due at the clock's current time
    ///
    /// Returns the number of timers that fired.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now_s();
        let wall = self.clock.wall_time();
        let Self {
            timers, link, log, ..
        } = self;
        let fired = timers.tick(now, |timers, expired| {
            let mut cx = LinkContext {
                timers,
                log: &mut *log,
                now,
                wall,
            };
            link.on_timer(expired, &mut cx)
        });
        self.flush_errors();
        fired
    }

    /// Deliver a state confirmation from the location provider
    ///
    /// An `Enabled` confirmation runs one complete fetch before returning.
    pub fn on_provider_state(&mut self, state: ServiceState) {
        let now = self.clock.now_s();
        let wall = self.clock.wall_time();
        let Self {
            timers,
            link,
            fetcher,
            network,
            decoder,
            sink,
            log,
            display,
            ..
        } = self;
        let mut cx = LinkContext {
            timers,
            log,
            now,
            wall,
        };
        link.on_provider_state(state, &mut cx, |fix, cx| {
            if let Ok(report) = fetcher.run(network, decoder, fix, cx.log, cx.wall) {
                display.apply(report, cx.wall);
                sink.show_weather(display);
            }
        });
        self.flush_errors();
    }

    /// Ask for a location state outside the periodic cycle
    ///
    /// Returns `false` if a transition is already in flight or the provider
    /// refused.
    pub fn request_state(&mut self, target: ServiceState) -> bool {
        let now = self.clock.now_s();
        let wall = self.clock.wall_time();
        let Self {
            timers, link, log, ..
        } = self;
        let mut cx = LinkContext {
            timers,
            log,
            now,
            wall,
        };
        let accepted = link.request_state(target, &mut cx);
        self.flush_errors();
        accepted
    }

    /// Flip the temperature scale and redraw the weather
    pub fn toggle_scale(&mut self) {
        self.display.toggle_scale();
        if self.display.is_ready() {
            self.sink.show_weather(&self.display);
        }
    }

    fn flush_errors(&mut self) {
        let revision = self.log.revision();
        if revision == self.shown_revision {
            return;
        }
        self.shown_revision = revision;
        self.sink.show_errors(&self.log.render());
    }

    /// Current link phase
    pub fn phase(&self) -> LinkPhase {
        self.link.phase()
    }

    /// Weather currently on the face
    pub fn display(&self) -> &WeatherDisplay {
        &self.display
    }

    /// Failure history
    pub fn errors(&self) -> &ErrorLog {
        &self.log
    }

    /// Earliest pending timer, for sleeping until it is due
    pub fn next_deadline(&self) -> Option<Seconds> {
        self.timers.next_fire_time()
    }

    /// Access the location provider
    pub fn provider(&self) -> &P {
        self.link.provider()
    }

    /// Access the location provider mutably
    pub fn provider_mut(&mut self) -> &mut P {
        self.link.provider_mut()
    }

    /// Access the clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Access the presentation sink
    pub fn sink(&self) -> &S {
        &self.sink
    }
}
