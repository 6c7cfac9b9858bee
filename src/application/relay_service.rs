//! Relay Service - Main application use case
//!
//! Wires sources and destinations together through one bounded queue and
//! runs the import and export stages until shutdown.

use crate::application::exporter::Exporter;
use crate::application::importer::{Importer, DEFAULT_CLOSE_TIMEOUT};
use crate::config::Config;
use crate::domain::ports::{Destination, Source};
use crate::infrastructure::metrics::{MetricsSnapshot, RelayMetrics};
use crate::infrastructure::shutdown::ShutdownController;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Tuning knobs for a relay pipeline.
#[derive(Debug, Clone)]
pub struct RelayOptions {
    /// Capacity of the shared queue (at least 1)
    pub queue_capacity: usize,
    /// Grace period for reader tasks on shutdown
    pub close_timeout: Duration,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            queue_capacity: 10,
            close_timeout: DEFAULT_CLOSE_TIMEOUT,
        }
    }
}

impl From<&Config> for RelayOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            queue_capacity: cfg.queue_capacity,
            close_timeout: cfg.close_timeout(),
        }
    }
}

/// Relay service - main application use case.
///
/// This service:
/// 1. Creates the bounded queue shared by both stages
/// 2. Starts one reader task per source
/// 3. Runs the exporter task until shutdown is signalled
/// 4. Closes the importer, then the exporter
pub struct RelayService {
    importer: Importer,
    exporter: Exporter,
    metrics: Arc<RelayMetrics>,
}

impl RelayService {
    /// Create a new relay service.
    pub fn new(
        sources: Vec<Box<dyn Source>>,
        destinations: Vec<Box<dyn Destination>>,
        options: RelayOptions,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(options.queue_capacity.max(1));
        let metrics = Arc::new(RelayMetrics::new());

        let importer = Importer::new(sender, sources, metrics.clone())
            .with_close_timeout(options.close_timeout);
        let exporter = Exporter::new(receiver, destinations, metrics.clone());

        Self {
            importer,
            exporter,
            metrics,
        }
    }

    /// Shared metrics handle; remains valid after `run` consumes the service.
    pub fn metrics(&self) -> Arc<RelayMetrics> {
        self.metrics.clone()
    }

    /// Run the relay until `shutdown` fires.
    ///
    /// Failures from sources and destinations only show up in logs and
    /// metrics; nothing is returned to the caller but the final counters.
    pub async fn run(self, shutdown: ShutdownController) -> MetricsSnapshot {
        let Self {
            mut importer,
            mut exporter,
            metrics,
        } = self;

        tracing::info!(
            destinations = exporter.destination_count(),
            "relay started"
        );

        importer.start(&shutdown);

        let export_shutdown = shutdown.clone();
        let mut export_task = tokio::spawn(async move {
            exporter.run(&export_shutdown).await;
        });

        let finished_early = tokio::select! {
            _ = shutdown.cancelled() => None,
            result = &mut export_task => Some(result),
        };

        importer.close().await;

        let result = match finished_early {
            Some(result) => result,
            None => export_task.await,
        };
        if let Err(e) = result {
            tracing::error!(error = %e, "exporter task failed");
        }

        let snapshot = metrics.snapshot();
        tracing::info!(
            imported = snapshot.records_imported,
            exported = snapshot.records_exported,
            read_failures = snapshot.read_failures,
            "relay stopped"
        );
        snapshot
    }
}
