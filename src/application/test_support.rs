//! In-memory sources and destinations for exercising the relay stages.

use crate::domain::entities::Record;
use crate::domain::error::RelayError;
use crate::domain::ports::{Destination, Source};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

/// Yields a fixed list of records, then reports end-of-stream.
pub(crate) struct ScriptedSource {
    label: String,
    records: VecDeque<Record>,
    pub closes: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn new(label: &str, records: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            records: records.iter().map(|r| Record::from(*r)).collect(),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl Source for ScriptedSource {
    async fn read_record(&mut self) -> Result<Record, RelayError> {
        match self.records.pop_front() {
            Some(record) => Ok(record),
            None => {
                tokio::time::sleep(Duration::from_millis(1)).await;
                Err(RelayError::EndOfStream)
            }
        }
    }

    async fn close(&mut self) -> Result<(), RelayError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("scripted:{}", self.label)
    }
}

/// Never produces a record; every read blocks forever.
pub(crate) struct StalledSource {
    pub closes: Arc<AtomicUsize>,
}

impl StalledSource {
    pub fn new() -> Self {
        Self {
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl Source for StalledSource {
    async fn read_record(&mut self) -> Result<Record, RelayError> {
        std::future::pending().await
    }

    async fn close(&mut self) -> Result<(), RelayError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "stalled".to_string()
    }
}

/// Collects every record it receives.
///
/// With a gate, each write waits for one permit first, which lets tests hold
/// the exporter inside a write.
pub(crate) struct MemoryDestination {
    pub received: Arc<Mutex<Vec<Record>>>,
    pub closes: Arc<AtomicUsize>,
    gate: Option<Arc<Semaphore>>,
    fail_close: bool,
}

impl MemoryDestination {
    pub fn new() -> Self {
        Self {
            received: Arc::new(Mutex::new(Vec::new())),
            closes: Arc::new(AtomicUsize::new(0)),
            gate: None,
            fail_close: false,
        }
    }

    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }

    pub fn failing_close() -> Self {
        Self {
            fail_close: true,
            ..Self::new()
        }
    }

    pub fn texts(received: &Arc<Mutex<Vec<Record>>>) -> Vec<String> {
        received
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.to_string_lossy().to_string())
            .collect()
    }
}

#[async_trait]
impl Destination for MemoryDestination {
    async fn write_record(&mut self, record: &Record) -> Result<(), RelayError> {
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        self.received.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), RelayError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(RelayError::Write(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "close failed",
            )));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
