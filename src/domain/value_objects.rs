//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use std::fmt;

/// Transport used to reach a socket endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// Stream socket over IP
    Tcp,
    /// Datagram socket over IP
    Udp,
    /// Unix-domain stream socket
    Unix,
}

impl TransportKind {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
            Self::Unix => "unix",
        }
    }

    fn scheme(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp://",
            Self::Udp => "udp://",
            Self::Unix => "unix://",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved socket endpoint: transport kind plus the residual address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    pub kind: TransportKind,
    pub address: String,
}

impl Address {
    pub fn new(kind: TransportKind, address: impl Into<String>) -> Self {
        Self {
            kind,
            address: address.into(),
        }
    }

    /// Resolve an endpoint string into a transport kind and address.
    ///
    /// Recognised prefixes are stripped; anything else is taken verbatim as
    /// a unix-domain socket path. Resolution never fails: invalid addresses
    /// surface later, when the socket is opened.
    ///
    /// # Examples
    /// ```
    /// use line_relay::domain::value_objects::{Address, TransportKind};
    ///
    /// let addr = Address::resolve("tcp://127.0.0.1:9000");
    /// assert_eq!(addr.kind, TransportKind::Tcp);
    /// assert_eq!(addr.address, "127.0.0.1:9000");
    ///
    /// assert_eq!(Address::resolve("relay.sock").kind, TransportKind::Unix);
    /// ```
    pub fn resolve(input: &str) -> Self {
        for kind in [TransportKind::Tcp, TransportKind::Udp, TransportKind::Unix] {
            if let Some(rest) = input.strip_prefix(kind.scheme()) {
                return Self::new(kind, rest);
            }
        }
        Self::new(TransportKind::Unix, input)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.scheme(), self.address)
    }
}
