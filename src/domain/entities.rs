//! Domain Entities - Core relay objects
//!
//! These entities represent the core concepts of the relay domain.
//! They have no I/O dependencies and contain only state logic.

use bytes::Bytes;
use std::borrow::Cow;
use std::fmt;

/// Newline delimiter separating records at the source side.
pub const RECORD_DELIMITER: u8 = b'\n';

/// One opaque unit of transported data.
///
/// A record read from a source keeps its trailing delimiter when the source
/// saw one, and its bytes are forwarded unchanged whether or not they are
/// valid UTF-8. Records are immutable and cheap to clone: fan-out hands the
/// same buffer to every destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record(Bytes);

impl Record {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self(data.into())
    }

    /// The record bytes as written to a destination, delimiter included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Text view for logs and assertions; invalid UTF-8 shows as U+FFFD.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the record ends with the newline delimiter.
    pub fn is_terminated(&self) -> bool {
        self.0.last() == Some(&RECORD_DELIMITER)
    }
}

impl From<Vec<u8>> for Record {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for Record {
    fn from(data: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(data))
    }
}

impl From<String> for Record {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for Record {
    fn from(text: &str) -> Self {
        Self(Bytes::copy_from_slice(text.as_bytes()))
    }
}

impl AsRef<[u8]> for Record {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

/// Lifecycle of a lazily acquired endpoint handle.
///
/// Transitions:
/// - `Unacquired -> Acquired` when open/connect/accept succeeds
/// - `Acquired -> Unacquired` when the handle is invalidated after a failure
/// - any state `-> Closed` on close; `Closed` is terminal
#[derive(Debug)]
pub enum EndpointState<T> {
    /// No live handle yet, or the last one was invalidated
    Unacquired,
    /// Live handle ready for I/O
    Acquired(T),
    /// Released by an explicit close
    Closed,
}

impl<T> Default for EndpointState<T> {
    fn default() -> Self {
        Self::Unacquired
    }
}

impl<T> EndpointState<T> {
    pub fn is_acquired(&self) -> bool {
        matches!(self, Self::Acquired(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Store a freshly acquired handle.
    ///
    /// A closed endpoint stays closed and the handle is handed back.
    pub fn acquire(&mut self, handle: T) -> Option<T> {
        if self.is_closed() {
            return Some(handle);
        }
        *self = Self::Acquired(handle);
        None
    }

    /// Borrow the live handle, if any.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Acquired(handle) => Some(handle),
            _ => None,
        }
    }

    /// Drop back to `Unacquired`, returning the broken handle so the caller
    /// can release it. A closed endpoint stays closed.
    pub fn invalidate(&mut self) -> Option<T> {
        if self.is_closed() {
            return None;
        }
        match std::mem::replace(self, Self::Unacquired) {
            Self::Acquired(handle) => Some(handle),
            _ => None,
        }
    }

    /// Move to `Closed`, returning the live handle (if any) for release.
    pub fn close(&mut self) -> Option<T> {
        match std::mem::replace(self, Self::Closed) {
            Self::Acquired(handle) => Some(handle),
            _ => None,
        }
    }
}
