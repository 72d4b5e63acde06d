//! manual-chunk - Page segmentation and chunking
//!
//! Turns extracted manual markdown into retrieval-sized chunks.
//!
//! # Components
//!
//! - [`PageSegmenter`]: splits markdown at `### Page N` marker lines.
//!
//! - [`WindowChunker`]: cuts text into overlapping windows, preferring
//!   paragraph and sentence boundaries.
//!
//! - [`ManualChunker`]: segments a manual and chunks each page.
//!
//! # Example
//!
//! ```rust
//! use manual_chunk::{ManualChunker, SectionHeadings};
//!
//! let chunker = ManualChunker::new();
//! let markdown = "### Page 1\nInsert coin.\n### Page 2\nPress start.";
//! let chunks = chunker.chunk_manual(markdown, "manual-1", &SectionHeadings::new());
//! assert_eq!(chunks.len(), 2);
//! ```

mod manual;
mod pages;
mod window;

pub use manual::ManualChunker;
pub use pages::{PageSegmenter, PageSpan};
pub use window::WindowChunker;

// Re-export types for convenience
pub use manual_core::{Chunk, ChunkMetadata, Chunker, ChunkingConfig, Page, SectionHeadings};
