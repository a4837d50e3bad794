//! On-face diagnostics
//!
//! Keeps the short, timestamped failure history the face renders in its
//! error field.

pub mod log;

pub use log::{
    ErrorLog, LogEntry, DEFAULT_SEPARATOR, ENTRY_LEN, ERROR_LOG_CAPACITY, MAX_SEPARATOR_LEN,
    RENDER_LEN,
};
