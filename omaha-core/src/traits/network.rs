//! Network client trait

use alloc::vec::Vec;
use core::fmt;

/// Broad class of a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetworkErrorKind {
    /// No response within the requested timeout
    Timeout,
    /// Connection could not be set up
    Connection,
    /// Proxy could not be resolved or refused the request
    Proxy,
    /// Server answered with a non-success status
    Http(u16),
    /// Response body could not be read
    Body,
}

/// A failed network request
///
/// Carries the kind the fetch policy acts on, plus the platform's own error
/// code when one is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetworkError {
    /// What went wrong
    pub kind: NetworkErrorKind,
    /// Underlying platform error code
    pub code: Option<i32>,
}

impl NetworkError {
    /// Create an error without a platform code
    pub const fn new(kind: NetworkErrorKind) -> Self {
        Self { kind, code: None }
    }

    /// Attach the platform's error code
    pub const fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    /// Check if the request timed out
    pub fn is_timeout(&self) -> bool {
        self.kind == NetworkErrorKind::Timeout
    }
}

impl From<NetworkErrorKind> for NetworkError {
    fn from(kind: NetworkErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NetworkErrorKind::Timeout => f.write_str("timeout")?,
            NetworkErrorKind::Connection => f.write_str("conn")?,
            NetworkErrorKind::Proxy => f.write_str("proxy")?,
            NetworkErrorKind::Http(status) => write!(f, "http {}", status)?,
            NetworkErrorKind::Body => f.write_str("body")?,
        }
        if let Some(code) = self.code {
            write!(f, "({})", code)?;
        }
        Ok(())
    }
}

/// Trait for blocking HTTP GET
///
/// Implementations must honor `timeout_s` and report an elapsed timeout as
/// [`NetworkErrorKind::Timeout`], distinct from every other failure.
pub trait NetworkClient {
    /// Fetch `url`, routed through the system proxy when `use_proxy` is set
    fn get(&mut self, url: &str, timeout_s: u32, use_proxy: bool) -> Result<Vec<u8>, NetworkError>;
}
