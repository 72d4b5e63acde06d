//! Page-wise chunking of a whole manual.

use tracing::debug;

use manual_core::{Chunk, ChunkMetadata, Chunker, ManualConfig, Page, Result, SectionHeadings};

use crate::{PageSegmenter, WindowChunker};

/// Segments a manual into pages and chunks each page independently.
///
/// Chunks never span pages, so every chunk has `page_start == page_end`.
pub struct ManualChunker<C = WindowChunker> {
    segmenter: PageSegmenter,
    chunker: C,
}

impl ManualChunker<WindowChunker> {
    /// Create a manual chunker with default segmentation and chunk sizes.
    pub fn new() -> Self {
        Self {
            segmenter: PageSegmenter::default(),
            chunker: WindowChunker::default(),
        }
    }

    /// Build from configuration, validating the chunking section.
    pub fn from_config(config: &ManualConfig) -> Result<Self> {
        Ok(Self {
            segmenter: PageSegmenter::new(config.segmenting),
            chunker: WindowChunker::new(config.chunking)?,
        })
    }
}

impl Default for ManualChunker<WindowChunker> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Chunker> ManualChunker<C> {
    /// Combine a segmenter with any chunking strategy.
    pub fn with_chunker(segmenter: PageSegmenter, chunker: C) -> Self {
        Self { segmenter, chunker }
    }

    /// The page segmenter.
    pub fn segmenter(&self) -> &PageSegmenter {
        &self.segmenter
    }

    /// Split the manual into pages.
    pub fn pages(&self, markdown: &str) -> Vec<Page> {
        self.segmenter.segment(markdown)
    }

    /// Chunk a whole manual, in page order then within-page order.
    pub fn chunk_manual(
        &self,
        markdown: &str,
        manual_id: &str,
        headings: &SectionHeadings,
    ) -> Vec<Chunk> {
        self.chunk_pages(&self.pages(markdown), manual_id, headings)
    }

    /// Chunk already segmented pages.
    pub fn chunk_pages(
        &self,
        pages: &[Page],
        manual_id: &str,
        headings: &SectionHeadings,
    ) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for page in pages {
            let mut metadata = ChunkMetadata::for_page(manual_id, page.number);
            metadata.section_heading = headings.get(&page.number).cloned();

            let page_chunks = self.chunker.chunk(&page.text, &metadata);
            debug!(page = page.number, chunks = page_chunks.len(), "Chunked page");
            chunks.extend(page_chunks);
        }

        chunks
    }

    /// Chunk free text with a caller-supplied metadata template.
    pub fn chunk_text(&self, text: &str, metadata: &ChunkMetadata) -> Vec<Chunk> {
        self.chunker.chunk(text, metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manual_core::{ChunkingConfig, SegmentConfig};

    fn manual() -> String {
        let mut markdown = String::new();
        for page in 1..=3 {
            markdown.push_str(&format!("### Page {}\n", page));
            for step in 0..12 {
                markdown.push_str(&format!(
                    "Step {} on page {}: check the harness and reseat the connector.\n\n",
                    step, page
                ));
            }
        }
        markdown
    }

    #[test]
    fn test_chunks_follow_page_order() {
        let chunker = ManualChunker::new();
        let chunks = chunker.chunk_manual(&manual(), "sf2-cabinet", &SectionHeadings::new());

        assert!(chunks.len() >= 3);
        let pages: Vec<u32> = chunks.iter().map(|c| c.metadata.page_start).collect();
        let mut sorted = pages.clone();
        sorted.sort();
        assert_eq!(pages, sorted);
        assert_eq!(pages.first(), Some(&1));
        assert_eq!(pages.last(), Some(&3));

        for chunk in &chunks {
            assert_eq!(chunk.metadata.page_start, chunk.metadata.page_end);
            assert_eq!(chunk.metadata.manual_id, "sf2-cabinet");
            let page_marker = format!("on page {}", chunk.metadata.page_start);
            assert!(chunk.content.contains(&page_marker));
        }
    }

    #[test]
    fn test_headings_looked_up_by_page() {
        let mut headings = SectionHeadings::new();
        headings.insert(2, "Power Supply".to_string());

        let chunker = ManualChunker::new();
        let chunks = chunker.chunk_manual(&manual(), "m", &headings);

        let page_two: Vec<&Chunk> = chunks.iter().filter(|c| c.metadata.page_start == 2).collect();
        assert!(page_two[0].content.starts_with("[Power Supply]"));
        assert!(page_two
            .iter()
            .all(|c| c.metadata.section_heading.as_deref() == Some("Power Supply")));
        assert!(chunks
            .iter()
            .filter(|c| c.metadata.page_start != 2)
            .all(|c| c.metadata.section_heading.is_none()));
    }

    #[test]
    fn test_short_pages_each_yield_one_chunk() {
        let markdown = "### Page 1\nInsert coin.\n### Page 2\nPress start.\n";
        let chunks = ManualChunker::new().chunk_manual(markdown, "m", &SectionHeadings::new());

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "### Page 1\nInsert coin.");
        assert_eq!(chunks[1].content, "### Page 2\nPress start.");
    }

    #[test]
    fn test_no_markers_respects_fallback_setting() {
        let text = "Unpaginated service bulletin.";

        let fallback = ManualChunker::new();
        let chunks = fallback.chunk_manual(text, "m", &SectionHeadings::new());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.page_start, 1);

        let mut config = ManualConfig::default();
        config.segmenting = SegmentConfig {
            fallback_single_page: false,
        };
        let strict = ManualChunker::from_config(&config).unwrap();
        assert!(strict.chunk_manual(text, "m", &SectionHeadings::new()).is_empty());
    }

    #[test]
    fn test_from_config_rejects_bad_chunking() {
        let mut config = ManualConfig::default();
        config.chunking = ChunkingConfig {
            target_size: 100,
            overlap: 200,
            min_size: 300,
        };
        assert!(ManualChunker::from_config(&config).is_err());
    }

    #[test]
    fn test_custom_chunker() {
        struct WholePage;

        impl Chunker for WholePage {
            fn chunk(&self, text: &str, metadata: &ChunkMetadata) -> Vec<Chunk> {
                vec![Chunk {
                    content: text.trim().to_string(),
                    metadata: metadata.clone(),
                }]
            }
        }

        let chunker = ManualChunker::with_chunker(PageSegmenter::default(), WholePage);
        let chunks = chunker.chunk_manual(&manual(), "m", &SectionHeadings::new());
        assert_eq!(chunks.len(), 3);
    }
}
