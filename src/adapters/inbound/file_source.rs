//! File Source Adapter
//!
//! Reads newline-delimited records from a file that may still be growing.

use super::read_line_record;
use crate::domain::entities::{EndpointState, Record};
use crate::domain::error::RelayError;
use crate::domain::ports::Source;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::BufReader;

/// File-backed source.
///
/// The file is opened on the first read, not at construction. Reaching the
/// end of the file is reported as `EndOfStream` but keeps the reader, so
/// lines appended later are picked up by the next read.
pub struct FileSource {
    file_path: PathBuf,
    reader: EndpointState<BufReader<File>>,
    pending: Vec<u8>,
}

impl FileSource {
    /// Create a new file source. The file is not opened yet.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            reader: EndpointState::Unacquired,
            pending: Vec::new(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Whether the file is currently open.
    pub fn is_open(&self) -> bool {
        self.reader.is_acquired()
    }

    async fn open(&self) -> Result<BufReader<File>, RelayError> {
        let file = File::open(&self.file_path)
            .await
            .map_err(|source| RelayError::Open {
                path: self.file_path.clone(),
                source,
            })?;

        tracing::debug!(path = %self.file_path.display(), "file source opened");
        Ok(BufReader::new(file))
    }
}

#[async_trait]
impl Source for FileSource {
    async fn read_record(&mut self) -> Result<Record, RelayError> {
        if self.reader.is_closed() {
            return Err(RelayError::Closed);
        }

        if !self.reader.is_acquired() {
            let reader = self.open().await?;
            self.reader.acquire(reader);
        }

        let reader = self.reader.get_mut().ok_or(RelayError::Closed)?;
        read_line_record(reader, &mut self.pending).await
    }

    async fn close(&mut self) -> Result<(), RelayError> {
        if self.reader.close().is_some() {
            tracing::debug!(path = %self.file_path.display(), "file source closed");
        }
        self.pending.clear();
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.file_path.display())
    }
}
