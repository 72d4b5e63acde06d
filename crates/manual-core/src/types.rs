//! Core domain types for manual ingestion.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ulid::Ulid;

/// Optional per-page section headings, keyed by page number.
pub type SectionHeadings = BTreeMap<u32, String>;

/// Associates a chunk with its source manual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Identifier of the owning manual.
    pub manual_id: String,

    /// First page the chunk was drawn from.
    pub page_start: u32,

    /// Last page the chunk was drawn from.
    pub page_end: u32,

    /// Contextual label prefixed onto the chunked text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_heading: Option<String>,

    /// Hierarchical context, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_path: Option<String>,
}

impl ChunkMetadata {
    /// Metadata for text drawn from a single page.
    pub fn for_page(manual_id: impl Into<String>, page: u32) -> Self {
        Self {
            manual_id: manual_id.into(),
            page_start: page,
            page_end: page,
            section_heading: None,
            menu_path: None,
        }
    }

    /// Attach a section heading.
    pub fn with_section_heading(mut self, heading: impl Into<String>) -> Self {
        self.section_heading = Some(heading.into());
        self
    }

    /// Attach a menu path.
    pub fn with_menu_path(mut self, path: impl Into<String>) -> Self {
        self.menu_path = Some(path.into());
        self
    }
}

/// A retrieval unit: a bounded span of manual text plus its own metadata copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Trimmed, non-empty chunk text.
    pub content: String,

    /// Metadata owned by this chunk.
    pub metadata: ChunkMetadata,
}

/// One page of extracted markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page number captured from the page marker.
    pub number: u32,

    /// Page text, starting at its marker line.
    pub text: String,
}

/// A chunk ready for durable storage, with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    /// Unique identifier (ULID).
    pub id: Ulid,

    /// Owning manual.
    pub manual_id: String,

    /// Position within the manual's chunk list (0-based).
    pub chunk_index: u32,

    /// Chunk text content.
    pub content: String,

    /// Blake3 hash of the content.
    #[serde(with = "serde_hash")]
    pub content_hash: [u8; 32],

    /// Page and section metadata.
    pub metadata: ChunkMetadata,

    /// Embedding vector for similarity search.
    pub embedding: Vec<f32>,
}

impl StoredChunk {
    /// Build a stored chunk from a produced chunk and its embedding.
    pub fn new(chunk: Chunk, chunk_index: u32, embedding: Vec<f32>) -> Self {
        let content_hash = blake3::hash(chunk.content.as_bytes());

        Self {
            id: Ulid::new(),
            manual_id: chunk.metadata.manual_id.clone(),
            chunk_index,
            content: chunk.content,
            content_hash: *content_hash.as_bytes(),
            metadata: chunk.metadata,
            embedding,
        }
    }

    /// Check if content differs from this chunk's by comparing hashes.
    pub fn content_changed(&self, new_content: &str) -> bool {
        *blake3::hash(new_content.as_bytes()).as_bytes() != self.content_hash
    }
}

/// Hex serialization for content hashes.
mod serde_hash {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        hex::encode(value).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        let bytes = hex::decode(&hex).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("invalid hash length"))
    }
}
