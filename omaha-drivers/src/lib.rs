//! Host implementations of the collaborator traits
//!
//! This crate provides concrete implementations of the traits defined in
//! omaha-core for running the watch face logic on a desktop host:
//!
//! - Weather payload decoder (JSON)
//! - Network client (blocking HTTP with proxy fallback support)
//! - Location provider (simulated, with configurable confirmation delay)
//! - System clock
//! - Terminal presentation sink
//! - TOML configuration loading

#![deny(unsafe_code)]

pub mod clock;
pub mod config;
pub mod decoder;
pub mod location;
pub mod network;
pub mod sink;
