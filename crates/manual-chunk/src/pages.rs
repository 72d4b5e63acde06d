//! Page segmentation of extracted markdown.
//!
//! Parsers emit a `### Page N` line at the top of every source page. Each page
//! runs from its marker to the next marker, or to the end of the document.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use manual_core::{Page, SegmentConfig};

const PAGE_MARKER: &str = r"(?m)^### Page (\d+)";

fn page_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(PAGE_MARKER).expect("page marker pattern is valid"))
}

/// Location of one page within a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSpan {
    /// Page number captured from the marker.
    pub number: u32,

    /// Byte range of the page in the document.
    pub range: Range<usize>,
}

/// Splits a document into pages at `### Page N` marker lines.
#[derive(Debug, Clone, Default)]
pub struct PageSegmenter {
    config: SegmentConfig,
}

impl PageSegmenter {
    pub fn new(config: SegmentConfig) -> Self {
        Self { config }
    }

    /// Page spans in document order.
    pub fn spans(&self, markdown: &str) -> Vec<PageSpan> {
        let markers: Vec<(usize, u32)> = page_marker()
            .captures_iter(markdown)
            .filter_map(|caps| {
                let offset = caps.get(0)?.start();
                let digits = caps.get(1)?.as_str();
                match digits.parse::<u32>() {
                    Ok(number) => Some((offset, number)),
                    Err(e) => {
                        warn!(offset, digits, "Skipping page marker with unusable number: {}", e);
                        None
                    }
                }
            })
            .collect();

        let Some(&(first_offset, _)) = markers.first() else {
            return self.fallback(markdown);
        };

        let preamble = &markdown[..first_offset];
        if !preamble.trim().is_empty() {
            warn!(
                chars = preamble.chars().count(),
                "Text before the first page marker is not part of any page"
            );
        }

        let spans: Vec<PageSpan> = markers
            .iter()
            .enumerate()
            .map(|(i, &(offset, number))| {
                let end = markers.get(i + 1).map_or(markdown.len(), |next| next.0);
                PageSpan {
                    number,
                    range: offset..end,
                }
            })
            .collect();

        debug!(pages = spans.len(), "Segmented document");
        spans
    }

    /// Pages in document order, each owning its text.
    pub fn segment(&self, markdown: &str) -> Vec<Page> {
        self.spans(markdown)
            .into_iter()
            .map(|span| Page {
                number: span.number,
                text: markdown[span.range].to_string(),
            })
            .collect()
    }

    fn fallback(&self, markdown: &str) -> Vec<PageSpan> {
        if !self.config.fallback_single_page || markdown.trim().is_empty() {
            debug!("No page markers found");
            return Vec::new();
        }

        debug!("No page markers found, treating document as page 1");
        vec![PageSpan {
            number: 1,
            range: 0..markdown.len(),
        }]
    }
}
