//! Source Port
//!
//! Defines the interface for endpoints that produce records.
//! Implementations may tail a file or listen on a socket.

use crate::domain::entities::Record;
use crate::domain::error::RelayError;
use async_trait::async_trait;

/// Producer of records from one external endpoint.
///
/// This is an inbound port: the importer owns one reader task per source
/// and calls this interface without knowing the transport details. A
/// source acquires its handle lazily on the first read and is owned by
/// exactly one task, hence `&mut self`.
#[async_trait]
pub trait Source: Send {
    /// Read the next record.
    ///
    /// Acquires the underlying handle first if it is not yet acquired.
    /// Failures are returned to the caller, which decides whether to retry.
    async fn read_record(&mut self) -> Result<Record, RelayError>;

    /// Release any held handle.
    ///
    /// Must be idempotent and safe on a source that never acquired one.
    async fn close(&mut self) -> Result<(), RelayError>;

    /// Short label used in log fields.
    fn describe(&self) -> String;
}
