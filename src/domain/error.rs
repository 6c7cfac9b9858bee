//! Relay errors
//!
//! Failures raised by sources and destinations. Sources return them to the
//! reader task that owns them; destinations only log them.

use crate::domain::value_objects::TransportKind;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Opening a file endpoint failed
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Binding a listening socket failed
    #[error("failed to listen on {address}: {source}")]
    Listen {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Accepting an inbound connection failed
    #[error("failed to accept connection on {address}: {source}")]
    Accept {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Dialing a remote socket failed
    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Read error on a live handle
    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    /// Write error on a live handle
    #[error("write failed: {0}")]
    Write(#[source] io::Error),

    /// No complete record is available yet
    #[error("end of stream")]
    EndOfStream,

    /// The transport cannot be used in this role
    #[error("{kind} transport cannot be used as a {role}")]
    UnsupportedTransport {
        kind: TransportKind,
        role: &'static str,
    },

    /// The endpoint was explicitly closed
    #[error("endpoint is closed")]
    Closed,
}

impl RelayError {
    /// Whether this error is the expected "nothing more to read" condition.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }
}
