//! Host configuration

pub mod loader;

pub use loader::{ConfigError, HostConfig, LocationConfig, NetworkConfig};
