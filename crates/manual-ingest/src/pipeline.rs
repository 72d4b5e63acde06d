//! Ingestion pipeline: chunk, embed, persist.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use manual_chunk::ManualChunker;
use manual_core::{
    Chunk, ChunkMetadata, ChunkSink, Embedder, ManualConfig, ManualError, Result,
    SectionHeadings, StoredChunk,
};

/// Summary of one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Manual that was ingested.
    pub manual_id: String,

    /// Pages detected.
    pub pages: usize,

    /// Chunks persisted.
    pub chunks: usize,
}

/// Hands chunks produced by [`ManualChunker`] to an embedder and a sink.
pub struct IngestPipeline<E, S> {
    chunker: ManualChunker,
    embedder: Arc<E>,
    sink: Arc<S>,
    batch_size: usize,
}

impl<E, S> IngestPipeline<E, S>
where
    E: Embedder,
    S: ChunkSink,
{
    /// Create a pipeline from configuration.
    pub fn new(config: &ManualConfig, embedder: Arc<E>, sink: Arc<S>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            chunker: ManualChunker::from_config(config)?,
            embedder,
            sink,
            batch_size: config.embedding.batch_size,
        })
    }

    /// Segment, chunk, embed and persist a whole manual.
    pub async fn ingest_markdown(
        &self,
        manual_id: &str,
        markdown: &str,
        headings: &SectionHeadings,
    ) -> Result<IngestReport> {
        if manual_id.trim().is_empty() {
            return Err(ManualError::invalid_argument("manual_id must not be empty"));
        }

        let start = Instant::now();
        let pages = self.chunker.pages(markdown);
        let chunks = self.chunker.chunk_pages(&pages, manual_id, headings);
        info!(manual_id, pages = pages.len(), chunks = chunks.len(), "Chunked manual");

        let persisted = self.embed_and_persist(chunks).await?;
        info!(
            manual_id,
            chunks = persisted,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Ingested manual"
        );

        Ok(IngestReport {
            manual_id: manual_id.to_string(),
            pages: pages.len(),
            chunks: persisted,
        })
    }

    /// Chunk, embed and persist text that is already split out of its manual.
    pub async fn ingest_text(&self, text: &str, metadata: &ChunkMetadata) -> Result<IngestReport> {
        if metadata.manual_id.trim().is_empty() {
            return Err(ManualError::invalid_argument("manual_id must not be empty"));
        }

        let chunks = self.chunker.chunk_text(text, metadata);
        let persisted = self.embed_and_persist(chunks).await?;

        Ok(IngestReport {
            manual_id: metadata.manual_id.clone(),
            pages: 1,
            chunks: persisted,
        })
    }

    async fn embed_and_persist(&self, chunks: Vec<Chunk>) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let mut stored = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<&str> = batch.iter().map(|c| c.content.as_str()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;

            if embeddings.len() != batch.len() {
                return Err(ManualError::embedding(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    embeddings.len()
                )));
            }
            debug!(batch = batch.len(), "Embedded batch");

            for (chunk, embedding) in batch.iter().zip(embeddings) {
                let index = stored.len() as u32;
                stored.push(StoredChunk::new(chunk.clone(), index, embedding));
            }
        }

        self.sink.persist_chunks(&stored).await?;
        Ok(stored.len())
    }
}
