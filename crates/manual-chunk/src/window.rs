//! Sliding-window text chunker.
//!
//! Cuts text into windows of roughly `target_size` characters, pulling each
//! cut back to the last paragraph or sentence break when one is far enough
//! from the window start, and starting the next window `overlap` characters
//! before the previous cut.

use tracing::debug;

use manual_core::{Chunk, ChunkMetadata, Chunker, ChunkingConfig, Result};

const PARAGRAPH_BREAK: [char; 2] = ['\n', '\n'];

const SENTENCE_BREAKS: [[char; 2]; 4] = [['.', ' '], ['.', '\n'], ['!', '\n'], ['?', '\n']];

/// Overlapping, boundary-aware chunker.
///
/// Positions are counted in `char`s, so multi-byte text is never split inside
/// a code point.
#[derive(Debug, Clone, Default)]
pub struct WindowChunker {
    config: ChunkingConfig,
}

impl WindowChunker {
    /// Create a chunker, rejecting configurations that cannot make progress.
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Pre-trim `[start, end)` windows over `text`, in order.
    ///
    /// Every window is returned, including ones later dropped for being
    /// shorter than `min_size`.
    pub fn windows(&self, text: &[char]) -> Vec<(usize, usize)> {
        let len = text.len();
        let mut windows = Vec::new();
        let mut start = 0;

        while start < len {
            let end = self.window_end(text, start);
            windows.push((start, end.min(len)));

            if end >= len {
                break;
            }
            start = end - self.config.overlap;
        }

        windows
    }

    /// Where the window beginning at `start` ends.
    fn window_end(&self, text: &[char], start: usize) -> usize {
        let hard_end = start + self.config.target_size;
        if hard_end >= text.len() {
            return hard_end;
        }

        // Breaks closer than min_size to the window start are ignored.
        let floor = start + self.config.min_size + 1;

        if let Some(pos) = rfind_between(text, &PARAGRAPH_BREAK, floor, hard_end) {
            return pos + 2;
        }

        SENTENCE_BREAKS
            .iter()
            .filter_map(|marker| rfind_between(text, marker, floor, hard_end))
            .max()
            .map_or(hard_end, |pos| pos + 1)
    }
}

impl Chunker for WindowChunker {
    fn chunk(&self, text: &str, metadata: &ChunkMetadata) -> Vec<Chunk> {
        let full_text: Vec<char> = match &metadata.section_heading {
            Some(heading) => format!("[{}]\n\n{}", heading, text).chars().collect(),
            None => text.chars().collect(),
        };

        let mut chunks = Vec::new();
        for (start, end) in self.windows(&full_text) {
            let window: String = full_text[start..end].iter().collect();
            let content = window.trim();
            if content.is_empty() {
                continue;
            }

            // The first window is kept regardless of size so short pages survive.
            if start == 0 || content.chars().count() >= self.config.min_size {
                chunks.push(Chunk {
                    content: content.to_string(),
                    metadata: metadata.clone(),
                });
            } else {
                debug!(start, end, "Dropping short trailing window");
            }
        }

        debug!(
            manual_id = %metadata.manual_id,
            page = metadata.page_start,
            chars = full_text.len(),
            chunks = chunks.len(),
            "Chunked text"
        );

        chunks
    }
}

/// Rightmost index `i` in `[lo, hi]` where `pattern` occurs in `text`.
fn rfind_between(text: &[char], pattern: &[char], lo: usize, hi: usize) -> Option<usize> {
    let last_start = text.len().checked_sub(pattern.len())?;
    let hi = hi.min(last_start);
    if lo > hi {
        return None;
    }
    (lo..=hi).rev().find(|&i| text[i..].starts_with(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> ChunkMetadata {
        ChunkMetadata::for_page("manual-1", 1)
    }

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn test_simple_chunk() {
        let chunker = WindowChunker::default();
        let text = "Hello world. This is a test.";
        let chunks = chunker.chunk(text, &meta());

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, text);
        assert_eq!(chunks[0].metadata, meta());
    }

    #[test]
    fn test_empty_content() {
        let chunker = WindowChunker::default();
        assert!(chunker.chunk("", &meta()).is_empty());
        assert!(chunker.chunk(" \n\n\t ", &meta()).is_empty());
    }

    #[test]
    fn test_short_text_is_kept() {
        let chunker = WindowChunker::default();
        let text = "q".repeat(199);
        let chunks = chunker.chunk(&text, &meta());

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, text);
    }

    #[test]
    fn test_paragraph_break_pulls_cut_back() {
        let chunker = WindowChunker::default();
        let text = format!("{}\n\n{}", "x".repeat(480), "y".repeat(118));
        assert_eq!(text.len(), 600);

        assert_eq!(chunker.windows(&chars(&text)), vec![(0, 482), (347, 600)]);

        let chunks = chunker.chunk(&text, &meta());
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "x".repeat(480));
        assert!(chunks[1].content.starts_with(&"x".repeat(133)));
        assert!(chunks[1].content.ends_with('y'));
    }

    #[test]
    fn test_rightmost_sentence_break_wins() {
        let chunker = WindowChunker::default();
        // ". " at 300 comes first in the marker list, "!\n" at 352 is further right.
        let text = format!("{}. {}!\n{}", "a".repeat(300), "b".repeat(50), "c".repeat(300));

        let windows = chunker.windows(&chars(&text));
        assert_eq!(windows[0], (0, 353));
        assert_eq!(windows[1], (218, text.len()));

        let chunks = chunker.chunk(&text, &meta());
        assert!(chunks[0].content.ends_with("b!"));
    }

    #[test]
    fn test_break_too_close_to_start_is_ignored() {
        let chunker = WindowChunker::default();
        let text = format!("{}\n\n{}", "a".repeat(100), "a".repeat(600));

        let windows = chunker.windows(&chars(&text));
        assert_eq!(windows, vec![(0, 500), (365, 702)]);
    }

    #[test]
    fn test_short_trailing_window_dropped() {
        let chunker = WindowChunker::default();
        let text = "z".repeat(520);

        assert_eq!(chunker.windows(&chars(&text)), vec![(0, 500), (365, 520)]);

        let chunks = chunker.chunk(&text, &meta());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content.len(), 500);
    }

    #[test]
    fn test_section_heading_prefix() {
        let chunker = WindowChunker::default();
        let metadata = meta().with_section_heading("Coin Mechanism");
        let chunks = chunker.chunk("Clean the coin chute monthly.", &metadata);

        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0].content,
            "[Coin Mechanism]\n\nClean the coin chute monthly."
        );
        assert_eq!(chunks[0].metadata.section_heading.as_deref(), Some("Coin Mechanism"));
    }

    #[test]
    fn test_windows_cover_text_without_gaps() {
        let configs = [
            ChunkingConfig::default(),
            ChunkingConfig::new(50, 10, 20).unwrap(),
            ChunkingConfig::new(40, 0, 0).unwrap(),
            ChunkingConfig::new(120, 60, 60).unwrap(),
        ];
        let sentence = "Check the fuse. Reseat the harness!\nPower on?\n\n";
        let texts = [
            sentence.repeat(40),
            "w".repeat(1234),
            "one two three\n\nfour five. six\n".repeat(25),
        ];

        for config in configs {
            let chunker = WindowChunker::new(config).unwrap();
            for text in &texts {
                let text = chars(text);
                let windows = chunker.windows(&text);

                assert_eq!(windows.first().map(|w| w.0), Some(0));
                assert_eq!(windows.last().map(|w| w.1), Some(text.len()));
                for pair in windows.windows(2) {
                    let (prev, next) = (pair[0], pair[1]);
                    assert!(next.0 <= prev.1, "gap between {:?} and {:?}", prev, next);
                    assert!(next.0 > prev.0, "no progress after {:?}", prev);
                }
            }
        }
    }

    #[test]
    fn test_chunks_are_trimmed_substrings() {
        let chunker = WindowChunker::new(ChunkingConfig::new(80, 20, 30).unwrap()).unwrap();
        let text = "  Remove the marquee.\n\nDisconnect the monitor harness. Lift the bezel!\n"
            .repeat(10);
        let chunks = chunker.chunk(&text, &meta());

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(!chunk.content.is_empty());
            assert_eq!(chunk.content, chunk.content.trim());
            assert!(text.contains(&chunk.content));
        }
    }

    #[test]
    fn test_non_ascii_counts_chars() {
        let chunker = WindowChunker::default();
        let text = "é🎮".repeat(400);
        let chunks = chunker.chunk(&text, &meta());

        assert_eq!(chunks[0].content.chars().count(), 500);
        assert!(chunks.iter().all(|c| text.contains(&c.content)));
    }

    #[test]
    fn test_metadata_is_copied_per_chunk() {
        let chunker = WindowChunker::default();
        let mut chunks = chunker.chunk(&"m".repeat(1200), &meta());
        assert!(chunks.len() >= 2);

        chunks[0].metadata.menu_path = Some("Diagnostics".to_string());
        assert_eq!(chunks[1].metadata.menu_path, None);
    }

    #[test]
    fn test_deterministic() {
        let chunker = WindowChunker::default();
        let text = "Adjust the volume pot. Test the speakers.\n\n".repeat(30);
        assert_eq!(chunker.chunk(&text, &meta()), chunker.chunk(&text, &meta()));
    }

    #[test]
    fn test_rejects_degenerate_config() {
        let config = ChunkingConfig {
            target_size: 100,
            overlap: 100,
            min_size: 150,
        };
        assert!(WindowChunker::new(config).is_err());
    }
}
