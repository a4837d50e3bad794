//! Location providers

pub mod simulated;

pub use simulated::SimulatedLocationProvider;
