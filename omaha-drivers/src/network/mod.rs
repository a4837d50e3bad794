//! Network clients

pub mod http;

pub use http::{HttpNetworkClient, HttpSetupError};
