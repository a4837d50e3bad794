//! Sorted timer queue
//!
//! Events are kept in ascending `fire_at` order with FIFO tie-break. The
//! queue knows nothing about what its events mean: the payload type `E` is
//! a closed enum owned by the caller, and [`TimerQueue::tick`] hands each
//! due payload to a dispatch closure that decides whether it repeats.

use alloc::vec::Vec;

/// Absolute time in whole seconds on the host clock
pub type Seconds = u64;

/// Opaque reference to a registered timer
///
/// Handles are never reused, so a stale handle can only ever miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerHandle(u64);

/// When a timer fires and whether it may fire again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Schedule {
    /// Fire once, `delay` seconds after registration
    Once(Seconds),
    /// Fire every `interval` seconds, first at registration + `interval`
    Every(Seconds),
}

impl Schedule {
    /// Delay until the first firing
    pub const fn delay(&self) -> Seconds {
        match *self {
            Schedule::Once(delay) => delay,
            Schedule::Every(interval) => interval,
        }
    }

    /// Repeat interval, `None` for one-shot timers
    pub const fn interval(&self) -> Option<Seconds> {
        match *self {
            Schedule::Once(_) => None,
            Schedule::Every(interval) => Some(interval),
        }
    }
}

/// Verdict returned by a dispatched timer callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerAction {
    /// Re-arm at `scheduled_at + interval` (ignored for one-shot timers)
    Repeat,
    /// Discard the timer
    Stop,
}

/// A due timer as seen by the dispatch closure
#[derive(Debug)]
pub struct Expired<'a, E> {
    /// Handle of the firing timer
    pub handle: TimerHandle,
    /// Time the timer was scheduled for (not the time of the tick)
    pub scheduled_at: Seconds,
    /// Caller payload
    pub event: &'a E,
}

#[derive(Debug)]
struct Entry<E> {
    handle: TimerHandle,
    fire_at: Seconds,
    interval: Option<Seconds>,
    /// Insertion order among equal `fire_at`
    seq: u64,
    /// Tick pass during which the timer was registered
    armed_pass: u64,
    event: E,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    handle: TimerHandle,
    cancelled: bool,
}

/// Ordered collection of scheduled callbacks
///
/// Owned by whoever drives the tick; handed by `&mut` to anything that
/// needs to arm or cancel timers.
#[derive(Debug)]
pub struct TimerQueue<E> {
    entries: Vec<Entry<E>>,
    next_id: u64,
    next_seq: u64,
    /// Number of `tick` calls so far
    pass: u64,
    /// Timer currently executing its callback, removed from `entries`
    in_flight: Option<InFlight>,
    ticking: bool,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerQueue<E> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            next_seq: 0,
            pass: 0,
            in_flight: None,
            ticking: false,
        }
    }

    /// Register a timer relative to `now`
    ///
    /// Always succeeds. A timer added from inside a callback with a fire
    /// time at or before the tick's `now` still fires within that tick.
    pub fn add(&mut self, now: Seconds, schedule: Schedule, event: E) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;

        let entry = Entry {
            handle,
            fire_at: now.saturating_add(schedule.delay()),
            interval: schedule.interval(),
            seq: self.bump_seq(),
            armed_pass: self.pass,
            event,
        };
        trace!("timer {:?} armed for {}", handle, entry.fire_at);
        self.insert(entry);
        handle
    }

    /// Cancel a timer
    ///
    /// Returns `true` if a pending (or currently executing) timer was
    /// cancelled. Deleting a timer from inside its own callback prevents it
    /// from being re-armed; deleting any other timer during a tick prevents
    /// it from firing in that same tick.
    pub fn delete(&mut self, handle: TimerHandle) -> bool {
        if let Some(flight) = self.in_flight.as_mut() {
            if flight.handle == handle {
                let was_live = !flight.cancelled;
                flight.cancelled = true;
                return was_live;
            }
        }

        match self.position(handle) {
            Some(index) => {
                self.entries.remove(index);
                trace!("timer {:?} deleted", handle);
                true
            }
            None => false,
        }
    }

    /// Fire every timer due at `now`
    ///
    /// Timers due when the tick starts fire in ascending `fire_at` order,
    /// FIFO among equals. Timers registered by those callbacks that are
    /// already due fire afterwards in one extra scan; anything registered
    /// during that scan, and every re-armed repeat, waits for the next tick.
    ///
    /// Each timer is removed from the queue before its callback runs, so a
    /// callback always sees a consistent queue and may freely add or delete
    /// timers, including itself. Nested calls to `tick` from inside a
    /// callback are ignored.
    ///
    /// Returns the number of callbacks invoked.
    pub fn tick<F>(&mut self, now: Seconds, mut dispatch: F) -> usize
    where
        F: FnMut(&mut Self, Expired<'_, E>) -> TimerAction,
    {
        if self.ticking {
            warn!("timer tick re-entered from a callback, ignored");
            return 0;
        }
        self.ticking = true;
        self.pass += 1;
        let pass = self.pass;

        let due = self.collect_due(now, |_| true);
        let mut fired = self.fire(&due, &mut dispatch);

        let late = self.collect_due(now, |entry| entry.armed_pass == pass);
        if !late.is_empty() {
            trace!("{} timers armed during tick already due", late.len());
            fired += self.fire(&late, &mut dispatch);
        }

        self.ticking = false;
        fired
    }

    /// Check whether a timer is still waiting to fire
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.position(handle).is_some()
    }

    /// Scheduled fire time of a pending timer
    pub fn fire_time(&self, handle: TimerHandle) -> Option<Seconds> {
        self.position(handle).map(|index| self.entries[index].fire_at)
    }

    /// Earliest pending fire time
    pub fn next_fire_time(&self) -> Option<Seconds> {
        self.entries.first().map(|entry| entry.fire_at)
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no timers are pending
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn fire<F>(&mut self, handles: &[TimerHandle], dispatch: &mut F) -> usize
    where
        F: FnMut(&mut Self, Expired<'_, E>) -> TimerAction,
    {
        let mut fired = 0;

        for &handle in handles {
            // Deleted by an earlier callback in this pass
            let Some(index) = self.position(handle) else {
                continue;
            };
            let mut entry = self.entries.remove(index);

            self.in_flight = Some(InFlight {
                handle,
                cancelled: false,
            });
            let action = dispatch(
                self,
                Expired {
                    handle,
                    scheduled_at: entry.fire_at,
                    event: &entry.event,
                },
            );
            let cancelled = self.in_flight.take().is_some_and(|flight| flight.cancelled);
            fired += 1;

            match (action, entry.interval) {
                (TimerAction::Repeat, Some(interval)) if !cancelled => {
                    // Anchored to the schedule, not to `now`
                    entry.fire_at = entry.fire_at.saturating_add(interval);
                    entry.seq = self.bump_seq();
                    trace!("timer {:?} re-armed for {}", handle, entry.fire_at);
                    self.insert(entry);
                }
                _ => trace!("timer {:?} retired", handle),
            }
        }

        fired
    }

    fn collect_due<P>(&self, now: Seconds, filter: P) -> Vec<TimerHandle>
    where
        P: Fn(&Entry<E>) -> bool,
    {
        self.entries
            .iter()
            .take_while(|entry| entry.fire_at <= now)
            .filter(|entry| filter(entry))
            .map(|entry| entry.handle)
            .collect()
    }

    fn insert(&mut self, entry: Entry<E>) {
        // `seq` only grows, so landing after every equal `fire_at` keeps FIFO
        let index = self
            .entries
            .partition_point(|existing| existing.fire_at <= entry.fire_at);
        self.entries.insert(index, entry);
    }

    fn position(&self, handle: TimerHandle) -> Option<usize> {
        self.entries.iter().position(|entry| entry.handle == handle)
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}
