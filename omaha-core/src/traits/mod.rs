//! Collaborator traits
//!
//! These traits define the interface between the scheduling core and the
//! platform services it drives: location hardware, the network stack, the
//! weather payload decoder, the clock, and the face itself.

pub mod clock;
pub mod decoder;
pub mod location;
pub mod network;
pub mod sink;

pub use clock::{Clock, WallTime};
pub use decoder::{DecodeError, WeatherDecoder};
pub use location::{Fix, LocationProvider, ProviderError, ServiceState};
pub use network::{NetworkClient, NetworkError, NetworkErrorKind};
pub use sink::PresentationSink;
