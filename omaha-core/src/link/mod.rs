//! Location connectivity
//!
//! Guards the location service so only one enable or disable command is in
//! flight at a time, and bounds how long an enable may go unconfirmed.

pub mod machine;

pub use machine::{LinkContext, LinkPhase, LinkTimer, LocationLink};
