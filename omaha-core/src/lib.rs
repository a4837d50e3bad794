//! Board-agnostic core logic for the Omaha watch face
//!
//! This crate contains everything that decides *when* the watch asks for a
//! location fix and *when* it fetches weather, without depending on a
//! particular platform:
//!
//! - Cooperative timer queue with anchored repetition
//! - Bounded error log rendered on the face
//! - Location service state machine with a liveness watchdog
//! - Weather fetch orchestration with a single proxy fallback
//! - Collaborator traits (location, network, decoder, clock, presentation)
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

// Must come first so the logging macros are visible in every module.
#[macro_use]
mod fmt;

pub mod config;
pub mod diag;
pub mod error;
pub mod link;
pub mod station;
pub mod timer;
pub mod traits;
pub mod weather;

pub use error::WatchError;
pub use station::WeatherStation;
