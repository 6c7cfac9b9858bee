//! File Destination Adapter
//!
//! Appends records to a file, optionally terminating each with a newline.

use crate::domain::entities::{EndpointState, Record};
use crate::domain::error::RelayError;
use crate::domain::ports::Destination;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Append-only file destination.
///
/// The file is opened (and created if absent) on the first write. Any
/// failure is logged and swallowed; a failed write drops the handle so the
/// next record reopens the file. A failure part-way through a record leaves
/// whatever was already written in place.
pub struct FileDestination {
    file_path: PathBuf,
    append_newline: bool,
    file: EndpointState<File>,
}

impl FileDestination {
    /// Create a new file destination. The file is not opened yet.
    pub fn new(file_path: impl Into<PathBuf>, append_newline: bool) -> Self {
        Self {
            file_path: file_path.into(),
            append_newline,
            file: EndpointState::Unacquired,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn append_newline(&self) -> bool {
        self.append_newline
    }

    /// Whether the file is currently open.
    pub fn is_open(&self) -> bool {
        self.file.is_acquired()
    }

    async fn open(&self) -> Result<File, RelayError> {
        OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.file_path)
            .await
            .map_err(|source| RelayError::Open {
                path: self.file_path.clone(),
                source,
            })
    }

    async fn write_to(file: &mut File, record: &Record, append_newline: bool) -> std::io::Result<()> {
        file.write_all(record.as_bytes()).await?;
        if append_newline {
            file.write_all(b"\n").await?;
        }
        // tokio hands file writes to a blocking thread; flush waits for them
        file.flush().await
    }
}

#[async_trait]
impl Destination for FileDestination {
    async fn write_record(&mut self, record: &Record) -> Result<(), RelayError> {
        if self.file.is_closed() {
            tracing::warn!(path = %self.file_path.display(), "dropping record for closed file destination");
            return Ok(());
        }

        if !self.file.is_acquired() {
            match self.open().await {
                Ok(file) => {
                    tracing::debug!(path = %self.file_path.display(), "file destination opened");
                    self.file.acquire(file);
                }
                Err(e) => {
                    tracing::warn!(path = %self.file_path.display(), error = %e, "failed to open file destination");
                    return Ok(());
                }
            }
        }

        let Some(file) = self.file.get_mut() else {
            return Ok(());
        };

        if let Err(e) = Self::write_to(file, record, self.append_newline).await {
            tracing::error!(path = %self.file_path.display(), error = %e, "failed to write to file destination");
            self.file.invalidate();
        }

        Ok(())
    }

    async fn close(&mut self) -> Result<(), RelayError> {
        match self.file.close() {
            Some(mut file) => {
                tracing::debug!(path = %self.file_path.display(), "file destination closed");
                file.flush().await.map_err(RelayError::Write)
            }
            None => Ok(()),
        }
    }

    fn describe(&self) -> String {
        format!("file:{}", self.file_path.display())
    }
}
