//! Location service state machine
//!
//! Owns one location service session. The `(current, requested)` pair is the
//! whole state: a new command is accepted only while the two agree, which
//! keeps enable and disable commands from overlapping. A watchdog timer
//! forces the machine back to `Disabled` if the provider never confirms an
//! enable, and the periodic wake toggles the requested state to drive the
//! enable → fix → fetch → disable cycle.

use crate::diag::ErrorLog;
use crate::error::{LinkOp, WatchError};
use crate::timer::{Expired, Schedule, Seconds, TimerAction, TimerHandle, TimerQueue};
use crate::traits::{Fix, LocationProvider, ServiceState, WallTime};

/// Timer payloads owned by the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkTimer {
    /// One-shot bound on waiting for an enable confirmation
    Watchdog,
    /// Repeating wake that toggles the requested state
    PeriodicWake,
}

/// Observable phase, derived from `(current, requested)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkPhase {
    /// Stopped, nothing in flight
    Disabled,
    /// Start sent, awaiting confirmation
    EnablePending,
    /// Running, confirmed
    Enabled,
    /// Stop sent, awaiting confirmation
    DisablePending,
}

/// Everything a transition may touch besides the link itself
pub struct LinkContext<'a> {
    /// Scheduler the watchdog and wake timers live in
    pub timers: &'a mut TimerQueue<LinkTimer>,
    /// On-face error log
    pub log: &'a mut ErrorLog,
    /// Monotonic time of the current event
    pub now: Seconds,
    /// Wall time of the current event
    pub wall: WallTime,
}

impl LinkContext<'_> {
    fn record(&mut self, err: WatchError) {
        self.log.append(self.wall, err, "");
    }
}

/// Connectivity state machine around a [`LocationProvider`]
#[derive(Debug)]
pub struct LocationLink<P> {
    provider: P,
    current: ServiceState,
    requested: ServiceState,
    watchdog: Option<TimerHandle>,
    wake: Option<TimerHandle>,
    watchdog_s: Seconds,
    refresh_s: Seconds,
}

impl<P: LocationProvider> LocationLink<P> {
    /// Create a link in the `Disabled` state
    pub fn new(provider: P, watchdog_s: Seconds, refresh_s: Seconds) -> Self {
        Self {
            provider,
            current: ServiceState::Disabled,
            requested: ServiceState::Disabled,
            watchdog: None,
            wake: None,
            watchdog_s,
            refresh_s,
        }
    }

    /// Last confirmed state
    pub fn current(&self) -> ServiceState {
        self.current
    }

    /// Last commanded state
    pub fn requested(&self) -> ServiceState {
        self.requested
    }

    /// Combined phase
    pub fn phase(&self) -> LinkPhase {
        match (self.current, self.requested) {
            (ServiceState::Disabled, ServiceState::Disabled) => LinkPhase::Disabled,
            (ServiceState::Disabled, ServiceState::Enabled) => LinkPhase::EnablePending,
            (ServiceState::Enabled, ServiceState::Enabled) => LinkPhase::Enabled,
            (ServiceState::Enabled, ServiceState::Disabled) => LinkPhase::DisablePending,
        }
    }

    /// Check whether a transition is in flight
    pub fn is_busy(&self) -> bool {
        self.current != self.requested
    }

    /// Handle of the armed watchdog, if any
    pub fn watchdog(&self) -> Option<TimerHandle> {
        self.watchdog
    }

    /// Handle of the periodic wake, if armed
    pub fn wake(&self) -> Option<TimerHandle> {
        self.wake
    }

    /// Access the provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Access the provider mutably
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Arm the repeating wake timer
    ///
    /// Idempotent: a second call returns the existing handle.
    pub fn arm_periodic_wake(&mut self, cx: &mut LinkContext<'_>) -> TimerHandle {
        if let Some(handle) = self.wake {
            return handle;
        }
        let handle = cx
            .timers
            .add(cx.now, Schedule::Every(self.refresh_s), LinkTimer::PeriodicWake);
        debug!("periodic wake armed every {}s", self.refresh_s);
        self.wake = Some(handle);
        handle
    }

    /// Command the provider towards `target`
    ///
    /// Returns `false` without side effects while another transition is in
    /// flight. A provider that refuses the command is logged and leaves the
    /// state unchanged. Enabling arms the watchdog unless one is armed.
    pub fn request_state(&mut self, target: ServiceState, cx: &mut LinkContext<'_>) -> bool {
        if self.is_busy() {
            warn!(
                "location request {:?} rejected: {:?} still pending",
                target, self.requested
            );
            return false;
        }

        let result = match target {
            ServiceState::Enabled => self.provider.start().map_err(|cause| (LinkOp::Start, cause)),
            ServiceState::Disabled => self.provider.stop().map_err(|cause| (LinkOp::Stop, cause)),
        };
        if let Err((op, cause)) = result {
            warn!("location {:?} refused: {:?}", op, cause);
            cx.record(WatchError::connectivity(op, cause));
            return false;
        }

        if target == ServiceState::Enabled && self.watchdog.is_none() {
            let handle = cx
                .timers
                .add(cx.now, Schedule::Once(self.watchdog_s), LinkTimer::Watchdog);
            self.watchdog = Some(handle);
        }

        debug!("location requested {:?}", target);
        self.requested = target;
        true
    }

    /// Provider confirmed a state change
    ///
    /// On `Enabled`, reads one fix, hands it to `fetch`, and immediately
    /// asks for `Disabled` again whether or not the fix was available.
    pub fn on_provider_state<F>(&mut self, state: ServiceState, cx: &mut LinkContext<'_>, fetch: F)
    where
        F: FnOnce(Fix, &mut LinkContext<'_>),
    {
        if let Some(handle) = self.watchdog.take() {
            cx.timers.delete(handle);
        }

        debug!("location confirmed {:?} (requested {:?})", state, self.requested);
        self.current = state;
        if self.requested != state {
            // Late or unsolicited confirmation: adopt it so the guard in
            // `request_state` cannot wedge.
            warn!("location confirmed {:?} without a matching request", state);
            self.requested = state;
        }

        if state != ServiceState::Enabled {
            return;
        }

        match self.provider.position() {
            Ok(fix) => fetch(fix, cx),
            Err(cause) => {
                warn!("location fix unavailable: {:?}", cause);
                cx.record(WatchError::connectivity(LinkOp::Fix, cause));
            }
        }
        self.request_state(ServiceState::Disabled, cx);
    }

    /// Watchdog expired before the provider confirmed
    ///
    /// Forces both halves of the state to `Disabled` without waiting for the
    /// provider, then asks it to stop so the hardware is not left running.
    pub fn on_timeout(&mut self, cx: &mut LinkContext<'_>) {
        warn!("location confirmation timed out after {}s", self.watchdog_s);
        self.watchdog = None;
        cx.record(WatchError::Timeout);

        self.current = ServiceState::Disabled;
        self.requested = ServiceState::Disabled;

        if let Err(cause) = self.provider.stop() {
            cx.record(WatchError::connectivity(LinkOp::Stop, cause));
        }
    }

    /// Periodic wake: start a cycle if idle, otherwise wind one down
    pub fn on_periodic_wake(&mut self, cx: &mut LinkContext<'_>) {
        let target = match self.current {
            ServiceState::Disabled => ServiceState::Enabled,
            ServiceState::Enabled => ServiceState::Disabled,
        };
        trace!("periodic wake, requesting {:?}", target);
        self.request_state(target, cx);
    }

    /// Dispatch a fired link timer
    pub fn on_timer(&mut self, expired: Expired<'_, LinkTimer>, cx: &mut LinkContext<'_>) -> TimerAction {
        match expired.event {
            LinkTimer::Watchdog => {
                if self.watchdog == Some(expired.handle) {
                    self.on_timeout(cx);
                }
                TimerAction::Stop
            }
            LinkTimer::PeriodicWake => {
                self.on_periodic_wake(cx);
                TimerAction::Repeat
            }
        }
    }
}
