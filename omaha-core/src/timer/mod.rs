//! Cooperative timer queue
//!
//! Single-threaded scheduling driven by the host's periodic tick. Payloads
//! are typed by the owner, so no callback ever casts an untyped context.

pub mod queue;

pub use queue::{Expired, Schedule, Seconds, TimerAction, TimerHandle, TimerQueue};
