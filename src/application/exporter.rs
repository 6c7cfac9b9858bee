//! Exporter - fan-out stage
//!
//! Single consumer of the shared queue: every dequeued record is written to
//! every destination, one destination after another.

use crate::domain::entities::Record;
use crate::domain::ports::Destination;
use crate::infrastructure::metrics::RelayMetrics;
use crate::infrastructure::shutdown::ShutdownController;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Fan-out stage owning the consuming side of the queue and the destinations.
///
/// Destinations are written sequentially in a fixed order. A slow
/// destination delays the ones after it for that record but never causes
/// it to be dropped, since destinations do not fail their caller.
pub struct Exporter {
    receiver: mpsc::Receiver<Record>,
    destinations: Vec<Box<dyn Destination>>,
    metrics: Arc<RelayMetrics>,
    closed: bool,
}

impl Exporter {
    pub fn new(
        receiver: mpsc::Receiver<Record>,
        destinations: Vec<Box<dyn Destination>>,
        metrics: Arc<RelayMetrics>,
    ) -> Self {
        Self {
            receiver,
            destinations,
            metrics,
            closed: false,
        }
    }

    pub fn destination_count(&self) -> usize {
        self.destinations.len()
    }

    /// Consume the queue until it is closed or shutdown is signalled, then
    /// close every destination.
    ///
    /// Waiting on an empty queue is interrupted by shutdown; a write already
    /// in progress is not.
    pub async fn run(&mut self, shutdown: &ShutdownController) {
        tracing::debug!(destinations = self.destinations.len(), "exporter started");

        while !shutdown.is_shutdown() {
            let record = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                record = self.receiver.recv() => match record {
                    Some(record) => record,
                    None => {
                        tracing::debug!("queue closed, stopping exporter");
                        break;
                    }
                },
            };
            self.export(&record).await;
        }

        self.close().await;
    }

    async fn export(&mut self, record: &Record) {
        for destination in &mut self.destinations {
            if let Err(e) = destination.write_record(record).await {
                tracing::warn!(destination = %destination.describe(), error = %e, "error writing record");
            }
        }
        self.metrics.record_exported(record.len() as u64);
    }

    /// Stop consuming and close every destination. Idempotent.
    ///
    /// Individual close failures are logged, not returned.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        // Producers blocked on a full queue see it closed instead of waiting
        self.receiver.close();

        for destination in &mut self.destinations {
            if let Err(e) = destination.close().await {
                tracing::warn!(destination = %destination.describe(), error = %e, "error closing destination");
            }
        }

        tracing::debug!("exporter closed");
    }
}
