//! Destination Port
//!
//! Defines the interface for endpoints that receive records.

use crate::domain::entities::Record;
use crate::domain::error::RelayError;
use async_trait::async_trait;

/// Consumer delivering records to one external endpoint.
///
/// This is an outbound port called by the exporter for every dequeued
/// record. Implementations swallow their own failures: a write error is
/// logged, the handle is invalidated, and the next call re-acquires it, so
/// one unreachable destination never stops delivery to the others.
#[async_trait]
pub trait Destination: Send {
    /// Deliver one record. Reports success even when delivery failed.
    async fn write_record(&mut self, record: &Record) -> Result<(), RelayError>;

    /// Release any held handle. Must be idempotent.
    async fn close(&mut self) -> Result<(), RelayError>;

    /// Short label used in log fields.
    fn describe(&self) -> String;
}
