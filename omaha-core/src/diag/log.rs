//! Bounded error log
//!
//! Fixed-capacity FIFO of short timestamped strings. The oldest entry is
//! evicted when a new one arrives at capacity.

use core::fmt::{self, Write};

use heapless::{Deque, String};

use crate::traits::WallTime;

/// Number of entries kept
pub const ERROR_LOG_CAPACITY: usize = 12;

/// Maximum bytes per entry, including the timestamp
pub const ENTRY_LEN: usize = 64;

/// Longest accepted separator in bytes
pub const MAX_SEPARATOR_LEN: usize = 16;

/// Maximum bytes of rendered text: a full log with the longest separator
pub const RENDER_LEN: usize =
    ERROR_LOG_CAPACITY * ENTRY_LEN + (ERROR_LOG_CAPACITY - 1) * MAX_SEPARATOR_LEN;

/// Separator used by [`ErrorLog::new`]
pub const DEFAULT_SEPARATOR: &str = "\n";

/// One rendered log line
pub type LogEntry = String<ENTRY_LEN>;

/// Writer that silently drops whatever does not fit
struct Truncating<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Ring of the most recent failures
#[derive(Debug, Clone)]
pub struct ErrorLog {
    entries: Deque<LogEntry, ERROR_LOG_CAPACITY>,
    separator: &'static str,
    /// Bumped on every append
    revision: u32,
}

impl Default for ErrorLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorLog {
    /// Create an empty log joined with newlines
    pub const fn new() -> Self {
        Self::with_separator(DEFAULT_SEPARATOR)
    }

    /// Create an empty log with a custom separator (e.g. `"<br/>"`)
    ///
    /// Separators longer than [`MAX_SEPARATOR_LEN`] are replaced by
    /// [`DEFAULT_SEPARATOR`] so a full log always renders completely.
    pub const fn with_separator(separator: &'static str) -> Self {
        let separator = if separator.len() > MAX_SEPARATOR_LEN {
            DEFAULT_SEPARATOR
        } else {
            separator
        };
        Self {
            entries: Deque::new(),
            separator,
            revision: 0,
        }
    }

    /// Record a failure as `HH:MM <code> <context>`
    ///
    /// Never fails: overlong entries are truncated, a full log drops its
    /// oldest entry.
    pub fn append(&mut self, at: WallTime, code: impl fmt::Display, context: &str) {
        let mut entry = LogEntry::new();
        let mut out = Truncating(&mut entry);
        let _ = write!(out, "{} {}", at, code);
        if !context.is_empty() {
            let _ = write!(out, " {}", context);
        }

        if self.entries.is_full() {
            self.entries.pop_front();
        }
        // Cannot fail: a slot was just freed if needed
        let _ = self.entries.push_back(entry);
        self.revision = self.revision.wrapping_add(1);
    }

    /// Concatenate all entries, oldest first
    pub fn render(&self) -> String<RENDER_LEN> {
        let mut text = String::new();
        let mut out = Truncating(&mut text);
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                let _ = out.write_str(self.separator);
            }
            let _ = out.write_str(entry);
        }
        text
    }

    /// Iterate entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.as_str())
    }

    /// Number of entries held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been logged
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Change counter, for redrawing only when something was appended
    pub fn revision(&self) -> u32 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec::Vec;

    #[test]
    fn test_entry_format() {
        let mut log = ErrorLog::new();
        log.append(WallTime::new(9, 5), "net:timeout", "proxy");
        log.append(WallTime::new(23, 59), "loc:t/o", "");
        let entries: Vec<&str> = log.iter().collect();
        assert_eq!(entries, ["09:05 net:timeout proxy", "23:59 loc:t/o"]);
    }

    #[test]
    fn test_oldest_evicted_at_capacity() {
        let mut log = ErrorLog::new();
        for i in 1..=13 {
            log.append(WallTime::new(12, 0), format!("m{:02}", i), "");
        }
        assert_eq!(log.len(), ERROR_LOG_CAPACITY);

        let entries: Vec<&str> = log.iter().collect();
        assert_eq!(entries.first(), Some(&"12:00 m02"));
        assert_eq!(entries.last(), Some(&"12:00 m13"));

        let text = log.render();
        assert!(!text.contains("m01"));
        for i in 2..=13 {
            assert!(text.contains(format!("m{:02}", i).as_str()));
        }
    }

    #[test]
    fn test_render_joins_in_order() {
        let mut log = ErrorLog::with_separator("<br/>");
        log.append(WallTime::new(1, 2), "a", "");
        log.append(WallTime::new(3, 4), "b", "x");
        assert_eq!(log.render().as_str(), "01:02 a<br/>03:04 b x");
    }

    #[test]
    fn test_render_has_no_side_effects() {
        let mut log = ErrorLog::new();
        log.append(WallTime::default(), "a", "");
        let revision = log.revision();
        let first = log.render();
        let second = log.render();
        assert_eq!(first, second);
        assert_eq!(log.revision(), revision);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_long_entry_truncated() {
        let mut log = ErrorLog::new();
        let context = "é".repeat(100);
        log.append(WallTime::default(), "json:name", &context);
        let entry = log.iter().next().unwrap();
        assert!(entry.len() <= ENTRY_LEN);
        assert!(entry.starts_with("00:00 json:name é"));
    }

    #[test]
    fn test_full_log_renders_newest_entry() {
        let separator = "<br/><br/><br/>.";
        assert_eq!(separator.len(), MAX_SEPARATOR_LEN);

        let mut log = ErrorLog::with_separator(separator);
        let context = "x".repeat(ENTRY_LEN);
        for i in 1..=ERROR_LOG_CAPACITY {
            log.append(WallTime::new(12, i as u8), "net:timeout", &context);
        }
        assert!(log.iter().all(|entry| entry.len() == ENTRY_LEN));

        let text = log.render();
        let newest = log.iter().last().unwrap();
        assert!(text.ends_with(newest));
        assert_eq!(
            text.len(),
            ERROR_LOG_CAPACITY * ENTRY_LEN + (ERROR_LOG_CAPACITY - 1) * MAX_SEPARATOR_LEN
        );
    }

    #[test]
    fn test_overlong_separator_falls_back() {
        let mut log = ErrorLog::with_separator("<div class=\"error-separator\"/>");
        log.append(WallTime::new(1, 0), "a", "");
        log.append(WallTime::new(2, 0), "b", "");
        assert_eq!(log.render().as_str(), "01:00 a\n02:00 b");
    }

    #[test]
    fn test_empty_render() {
        let log = ErrorLog::new();
        assert!(log.is_empty());
        assert_eq!(log.render().as_str(), "");
    }
}
