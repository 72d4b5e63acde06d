//! manual-ingest - Chunk assembly
//!
//! Takes chunks produced by `manual-chunk`, embeds their content and hands
//! them to a [`ChunkSink`] for durable storage keyed by manual and chunk order.
//!
//! # Example
//!
//! ```rust,ignore
//! use manual_ingest::{IngestPipeline, JsonlSink, MockEmbedder};
//! use std::sync::Arc;
//!
//! let pipeline = IngestPipeline::new(&config, Arc::new(MockEmbedder::new()), Arc::new(JsonlSink::new("out.jsonl")))?;
//! let report = pipeline.ingest_markdown("manual-1", &markdown, &headings).await?;
//! ```

mod embed;
mod pipeline;
mod sink;

pub use embed::MockEmbedder;
pub use pipeline::{IngestPipeline, IngestReport};
pub use sink::{JsonlSink, MemorySink};

// Re-export the collaborator traits for convenience
pub use manual_core::{ChunkSink, Embedder};
