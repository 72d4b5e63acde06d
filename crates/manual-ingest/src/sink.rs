//! Chunk sinks: where embedded chunks are handed off for storage.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use manual_core::{ChunkSink, ManualError, Result, StoredChunk};

/// In-memory sink, useful for tests and in-process callers.
#[derive(Clone, Default)]
pub struct MemorySink {
    chunks: Arc<Mutex<Vec<StoredChunk>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything persisted so far.
    pub fn chunks(&self) -> Result<Vec<StoredChunk>> {
        let chunks = self
            .chunks
            .lock()
            .map_err(|e| ManualError::internal(format!("Lock poisoned: {}", e)))?;
        Ok(chunks.clone())
    }
}

#[async_trait]
impl ChunkSink for MemorySink {
    async fn persist_chunks(&self, chunks: &[StoredChunk]) -> Result<()> {
        let mut stored = self
            .chunks
            .lock()
            .map_err(|e| ManualError::internal(format!("Lock poisoned: {}", e)))?;
        stored.extend_from_slice(chunks);
        Ok(())
    }
}

/// Appends one JSON record per chunk to a file.
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ChunkSink for JsonlSink {
    async fn persist_chunks(&self, chunks: &[StoredChunk]) -> Result<()> {
        let mut buf = Vec::new();
        for chunk in chunks {
            serde_json::to_writer(&mut buf, chunk)?;
            buf.push(b'\n');
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                ManualError::persist(format!("Failed to open {}: {}", self.path.display(), e))
            })?;
        file.write_all(&buf).await?;
        file.flush().await?;

        debug!(path = %self.path.display(), chunks = chunks.len(), "Wrote chunks");
        Ok(())
    }
}
