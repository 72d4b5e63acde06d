//! Configuration types for manual ingestion.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ManualError, Result};

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManualConfig {
    /// Chunking configuration.
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Page segmentation configuration.
    #[serde(default)]
    pub segmenting: SegmentConfig,

    /// Embedding configuration.
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

/// Chunking configuration. All sizes are in characters (Unicode scalar values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Desired chunk length.
    #[serde(default = "default_target_size")]
    pub target_size: usize,

    /// Characters by which the next chunk's start precedes the current chunk's end.
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// Chunks shorter than this are dropped, except the one starting at offset 0.
    #[serde(default = "default_min_size")]
    pub min_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_size: default_target_size(),
            overlap: default_overlap(),
            min_size: default_min_size(),
        }
    }
}

impl ChunkingConfig {
    /// Create a validated chunking configuration.
    pub fn new(target_size: usize, overlap: usize, min_size: usize) -> Result<Self> {
        let config = Self {
            target_size,
            overlap,
            min_size,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings under which the chunking loop cannot make forward progress.
    pub fn validate(&self) -> Result<()> {
        if self.overlap >= self.target_size {
            return Err(ManualError::config(format!(
                "chunking.overlap ({}) must be smaller than chunking.target_size ({})",
                self.overlap, self.target_size
            )));
        }
        // A boundary break can end a chunk min_size + 2 characters after its start.
        if self.overlap > self.min_size {
            return Err(ManualError::config(format!(
                "chunking.overlap ({}) must not exceed chunking.min_size ({})",
                self.overlap, self.min_size
            )));
        }
        Ok(())
    }
}

/// Page segmentation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentConfig {
    /// Treat a document without page markers as a single page 1.
    #[serde(default = "default_true")]
    pub fallback_single_page: bool,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            fallback_single_page: true,
        }
    }
}

/// Embedding configuration for the chunk assembler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Vector dimension produced by the embedder.
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Number of chunks sent to the embedder per call.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            batch_size: default_batch_size(),
        }
    }
}

// Default value functions

fn default_true() -> bool {
    true
}

fn default_target_size() -> usize {
    500
}

fn default_overlap() -> usize {
    135
}

fn default_min_size() -> usize {
    200
}

fn default_dimension() -> usize {
    768
}

fn default_batch_size() -> usize {
    32
}

impl ManualConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        if self.embedding.batch_size == 0 {
            return Err(ManualError::config("embedding.batch_size must be at least 1"));
        }
        Ok(())
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ManualError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from default paths.
    pub fn load_default() -> Result<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("manual-rag").join("config.toml");
            if user_config.exists() {
                return Self::load(&user_config);
            }
        }

        let local_config = PathBuf::from("manual-rag.toml");
        if local_config.exists() {
            return Self::load(&local_config);
        }

        Ok(Self::default())
    }
}
