//! Interfaces between the chunking core and its collaborators.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Chunk, ChunkMetadata, StoredChunk};

/// Chunking strategy trait.
///
/// Chunking is a pure, total function of its input: it never fails.
pub trait Chunker: Send + Sync {
    /// Split text into ordered chunks, each carrying its own copy of `metadata`.
    fn chunk(&self, text: &str, metadata: &ChunkMetadata) -> Vec<Chunk>;
}

/// Embedding model trait.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, preserving order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    /// Get the embedding dimension.
    fn dimension(&self) -> usize;
}

/// Durable storage for embedded chunks.
#[async_trait]
pub trait ChunkSink: Send + Sync {
    /// Persist chunks, in order.
    async fn persist_chunks(&self, chunks: &[StoredChunk]) -> Result<()>;
}
