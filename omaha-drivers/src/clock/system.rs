//! Host system clock

use std::time::Instant;

use chrono::{Local, Offset, Timelike};
use omaha_core::timer::Seconds;
use omaha_core::traits::{Clock, WallTime};

/// Monotonic seconds since construction plus the local time of day
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Start counting from now
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_s(&self) -> Seconds {
        self.origin.elapsed().as_secs()
    }

    fn wall_time(&self) -> WallTime {
        let now = Local::now();
        WallTime::new(now.hour() as u8, now.minute() as u8)
    }

    fn utc_offset_s(&self) -> i32 {
        Local::now().offset().fix().local_minus_utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_starts_at_zero() {
        let clock = SystemClock::new();
        assert_eq!(clock.now_s(), 0);
    }

    #[test]
    fn test_wall_time_in_range() {
        let wall = SystemClock::new().wall_time();
        assert!(wall.hour < 24);
        assert!(wall.minute < 60);
    }

    #[test]
    fn test_offset_within_a_day() {
        let offset = SystemClock::new().utc_offset_s();
        assert!(offset.abs() < 86_400);
    }
}
