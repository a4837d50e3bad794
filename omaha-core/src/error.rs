//! Error taxonomy
//!
//! Every failure in the core is handled where it happens and recorded in
//! the [`ErrorLog`](crate::diag::ErrorLog) through the compact form produced
//! by `Display`. Nothing here ever propagates out of a tick.

use core::fmt;

use crate::traits::{DecodeError, NetworkError, ProviderError};

/// Location service operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkOp {
    /// Start command
    Start,
    /// Stop command
    Stop,
    /// Position read
    Fix,
}

impl LinkOp {
    fn as_str(&self) -> &'static str {
        match self {
            LinkOp::Start => "start",
            LinkOp::Stop => "stop",
            LinkOp::Fix => "fix",
        }
    }
}

/// Any failure the watch can record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchError {
    /// Location provider rejected a command or has no fix
    Connectivity {
        /// Operation that failed
        op: LinkOp,
        /// Provider's reason
        cause: ProviderError,
    },
    /// Watchdog fired before the provider confirmed
    Timeout,
    /// Network request failed
    Network(NetworkError),
    /// Response body could not be decoded
    Decode(DecodeError),
}

impl WatchError {
    /// Shorthand for a provider failure
    pub const fn connectivity(op: LinkOp, cause: ProviderError) -> Self {
        WatchError::Connectivity { op, cause }
    }
}

impl From<NetworkError> for WatchError {
    fn from(err: NetworkError) -> Self {
        WatchError::Network(err)
    }
}

impl From<DecodeError> for WatchError {
    fn from(err: DecodeError) -> Self {
        WatchError::Decode(err)
    }
}

impl fmt::Display for WatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchError::Connectivity { op, cause } => write!(f, "loc:{} {}", op.as_str(), cause),
            WatchError::Timeout => f.write_str("loc:t/o"),
            WatchError::Network(err) => write!(f, "net:{}", err),
            WatchError::Decode(err) => write!(f, "json:{}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::NetworkErrorKind;
    use alloc::string::ToString;

    #[test]
    fn test_compact_codes() {
        assert_eq!(
            WatchError::connectivity(LinkOp::Start, ProviderError::Rejected(-5)).to_string(),
            "loc:start rejected(-5)"
        );
        assert_eq!(WatchError::Timeout.to_string(), "loc:t/o");
        assert_eq!(
            WatchError::from(NetworkError::new(NetworkErrorKind::Http(503))).to_string(),
            "net:http 503"
        );
        assert_eq!(
            WatchError::from(NetworkError::new(NetworkErrorKind::Connection).with_code(7))
                .to_string(),
            "net:conn(7)"
        );
        assert_eq!(WatchError::from(DecodeError::Icon).to_string(), "json:icon");
    }
}
