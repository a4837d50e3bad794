//! Clock trait

use core::fmt;

use crate::timer::Seconds;

/// Local wall-clock time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallTime {
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
}

impl WallTime {
    /// Create a wall time, wrapping out-of-range values
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self {
            hour: hour % 24,
            minute: minute % 60,
        }
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Trait for time sources
pub trait Clock {
    /// Monotonic time in seconds; drives the timer queue
    fn now_s(&self) -> Seconds;

    /// Local time of day, used to stamp log entries and weather updates
    fn wall_time(&self) -> WallTime;

    /// Offset of local time from UTC in seconds
    fn utc_offset_s(&self) -> i32 {
        0
    }
}
