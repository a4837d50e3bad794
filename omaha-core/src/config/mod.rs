//! Configuration types
//!
//! Board-agnostic station settings. Loading them from a file is the
//! platform's job; the core only defines and validates them.

pub mod types;

pub use types::*;
