//! Task log sink trait and implementations.
//!
//! Each task owns one append-only plain-text log. The sink is injected so
//! tests can substitute an in-memory buffer and so concurrent-write safety
//! lives in one place instead of inside every task: the file sink serializes
//! appends through a mutex, and a multi-line record is written as a single
//! `write_all`, so overlapping invocations of the same task interleave at
//! record granularity.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::errors::SinkError;

/// Destination for task log records.
#[async_trait]
pub trait TaskLogSink: Send + Sync {
    /// Append one record. Multi-line records are passed as one string and
    /// must land in the log contiguously, newline-terminated.
    async fn record(&self, entry: &str) -> Result<(), SinkError>;
}

/// Append-only file sink.
///
/// The file is created on first append. No rotation, no size bound.
pub struct FileTaskLogSink {
    path: PathBuf,
    // Serializes writers within this process; the file itself is opened in
    // append mode on every record so external writers stay compatible.
    write_lock: Mutex<()>,
}

impl FileTaskLogSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TaskLogSink for FileTaskLogSink {
    async fn record(&self, entry: &str) -> Result<(), SinkError> {
        let mut buffer = entry.to_string();
        if !buffer.ends_with('\n') {
            buffer.push('\n');
        }

        let _guard = self.write_lock.lock().await;

        let append = async {
            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .await?;
            file.write_all(buffer.as_bytes()).await?;
            file.flush().await
        };

        append.await.map_err(|source| SinkError::AppendFailed {
            path: self.path.display().to_string(),
            source,
        })
    }
}

/// In-memory sink for tests.
#[derive(Default)]
pub struct MemoryTaskLogSink {
    entries: Mutex<Vec<String>>,
}

impl MemoryTaskLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded entries, in append order.
    pub async fn entries(&self) -> Vec<String> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl TaskLogSink for MemoryTaskLogSink {
    async fn record(&self, entry: &str) -> Result<(), SinkError> {
        self.entries.lock().await.push(entry.to_string());
        Ok(())
    }
}

/// Sink that mirrors records to tracing instead of a file.
///
/// Useful for running a task ad hoc without touching the log directory.
pub struct TracingTaskLogSink {
    task_name: &'static str,
}

impl TracingTaskLogSink {
    pub fn new(task_name: &'static str) -> Self {
        Self { task_name }
    }
}

#[async_trait]
impl TaskLogSink for TracingTaskLogSink {
    async fn record(&self, entry: &str) -> Result<(), SinkError> {
        tracing::info!(task = self.task_name, record = %entry.trim_end(), "Task record");
        Ok(())
    }
}
