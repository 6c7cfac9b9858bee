//! Relay Metrics
//!
//! Lock-free counters updated by the import and export stages.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by the importer reader tasks and the exporter task.
#[derive(Debug, Default)]
pub struct RelayMetrics {
    /// Records read from sources and enqueued
    pub records_imported: AtomicU64,

    /// Failed source reads (end-of-stream included)
    pub read_failures: AtomicU64,

    /// Records dequeued and handed to every destination
    pub records_exported: AtomicU64,

    /// Bytes handed to destinations, counted once per record
    pub bytes_exported: AtomicU64,
}

impl RelayMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            records_imported: AtomicU64::new(0),
            read_failures: AtomicU64::new(0),
            records_exported: AtomicU64::new(0),
            bytes_exported: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_imported(&self) {
        self.records_imported.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_read_failure(&self) {
        self.read_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_exported(&self, byte_count: u64) {
        self.records_exported.fetch_add(1, Ordering::Relaxed);
        self.bytes_exported.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Get snapshot of metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_imported: self.records_imported.load(Ordering::Relaxed),
            read_failures: self.read_failures.load(Ordering::Relaxed),
            records_exported: self.records_exported.load(Ordering::Relaxed),
            bytes_exported: self.bytes_exported.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of relay metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub records_imported: u64,
    pub read_failures: u64,
    pub records_exported: u64,
    pub bytes_exported: u64,
}
