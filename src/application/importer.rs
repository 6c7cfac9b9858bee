//! Importer - fan-in stage
//!
//! Runs one reader task per source and multiplexes every record into the
//! shared bounded queue.

use crate::domain::entities::Record;
use crate::domain::ports::Source;
use crate::infrastructure::metrics::RelayMetrics;
use crate::infrastructure::shutdown::{ShutdownController, TaskGuard};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Default grace period for reader tasks to stop on close.
pub const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Fan-in stage owning the sources and the producing side of the queue.
///
/// Each reader task loops: check cancellation, read one record, enqueue it.
/// Enqueueing waits while the queue is full, so a slow exporter holds back
/// every source. A failed read is logged and retried immediately, with no
/// backoff.
///
/// Closing is drain-then-close: every reader task holds its own sender, so
/// the exporter only sees the queue closed once the last task has gone and
/// no task can enqueue after that point.
pub struct Importer {
    sender: Option<mpsc::Sender<Record>>,
    sources: Vec<Box<dyn Source>>,
    tasks: Vec<JoinHandle<()>>,
    stop: ShutdownController,
    metrics: Arc<RelayMetrics>,
    close_timeout: Duration,
    closed: bool,
}

impl Importer {
    /// Create a new importer. No task runs until `start`.
    pub fn new(
        sender: mpsc::Sender<Record>,
        sources: Vec<Box<dyn Source>>,
        metrics: Arc<RelayMetrics>,
    ) -> Self {
        Self {
            sender: Some(sender),
            sources,
            tasks: Vec::new(),
            stop: ShutdownController::new(),
            metrics,
            close_timeout: DEFAULT_CLOSE_TIMEOUT,
            closed: false,
        }
    }

    /// Set how long `close` waits for reader tasks before aborting them.
    #[must_use]
    pub fn with_close_timeout(mut self, timeout: Duration) -> Self {
        self.close_timeout = timeout;
        self
    }

    /// Number of reader tasks still running.
    pub fn active_readers(&self) -> usize {
        self.stop.active_tasks()
    }

    /// Spawn one reader task per source.
    pub fn start(&mut self, shutdown: &ShutdownController) {
        let Some(sender) = &self.sender else {
            tracing::warn!("importer already closed, not starting readers");
            return;
        };

        for source in self.sources.drain(..) {
            let reader = SourceReader {
                label: source.describe(),
                source,
                sender: sender.clone(),
                shutdown: shutdown.clone(),
                stop: self.stop.clone(),
                metrics: self.metrics.clone(),
                _guard: self.stop.task_guard(),
            };
            self.tasks.push(tokio::spawn(reader.run()));
        }

        tracing::debug!(readers = self.tasks.len(), "importer started");
    }

    /// Stop every reader task, close every source and release the queue.
    ///
    /// Reader tasks blocked inside a read past the close timeout are aborted;
    /// dropping such a task releases its source.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        self.stop.shutdown();
        self.sender.take();

        // Sources that never got a reader task
        for mut source in self.sources.drain(..) {
            if let Err(e) = source.close().await {
                tracing::warn!(source = %source.describe(), error = %e, "error closing source");
            }
        }

        if !self.stop.wait_for_drain(self.close_timeout).await {
            for task in &self.tasks {
                task.abort();
            }
        }

        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::error!(error = %e, "reader task failed");
                }
            }
        }

        tracing::debug!("importer closed");
    }
}

/// State owned by one reader task.
struct SourceReader {
    label: String,
    source: Box<dyn Source>,
    sender: mpsc::Sender<Record>,
    shutdown: ShutdownController,
    stop: ShutdownController,
    metrics: Arc<RelayMetrics>,
    _guard: TaskGuard,
}

impl SourceReader {
    fn cancelled(&self) -> bool {
        self.shutdown.is_shutdown() || self.stop.is_shutdown()
    }

    async fn run(mut self) {
        tracing::debug!(source = %self.label, "reader started");

        while !self.cancelled() {
            match self.source.read_record().await {
                Ok(record) => {
                    if self.sender.send(record).await.is_err() {
                        tracing::debug!(source = %self.label, "queue closed, stopping reader");
                        break;
                    }
                    self.metrics.record_imported();
                }
                Err(e) => {
                    self.metrics.record_read_failure();
                    if e.is_end_of_stream() {
                        tracing::trace!(source = %self.label, "no record available");
                    } else {
                        tracing::warn!(source = %self.label, error = %e, "error reading from source");
                    }
                    // Retry at once; only give other tasks a turn first
                    tokio::task::yield_now().await;
                }
            }
        }

        if let Err(e) = self.source.close().await {
            tracing::warn!(source = %self.label, error = %e, "error closing source");
        }
        tracing::debug!(source = %self.label, "reader stopped");
    }
}
