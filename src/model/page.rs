//! Line, block and page types.

use super::{BBox, Span};
use serde::{Deserialize, Serialize};

/// One visual text line: spans in the order the rendering engine produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Spans in this line
    pub spans: Vec<Span>,

    /// Bounding box of the line
    pub bbox: BBox,
}

impl Line {
    /// Create a line from its spans and bounding box.
    pub fn new(spans: Vec<Span>, bbox: BBox) -> Self {
        Self { spans, bbox }
    }

    /// Bounding box area. Lines with a non-positive area are geometry artifacts.
    pub fn area(&self) -> f32 {
        self.bbox.area()
    }

    /// Span texts concatenated without separators.
    pub fn prelim_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Check whether the line has visible text.
    pub fn is_blank(&self) -> bool {
        self.spans.iter().all(|s| s.text.trim().is_empty())
    }
}

/// One visual text region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Lines in this block
    pub lines: Vec<Line>,

    /// Bounding box of the block
    pub bbox: BBox,

    /// Zero-based page number
    pub pnum: usize,
}

impl Block {
    /// Create a block.
    pub fn new(lines: Vec<Line>, bbox: BBox, pnum: usize) -> Self {
        Self { lines, bbox, pnum }
    }

    /// Line texts joined with newlines.
    pub fn prelim_text(&self) -> String {
        self.lines
            .iter()
            .map(Line::prelim_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Where a page's text layer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    /// The document's own text layer
    #[default]
    Native,
    /// Full-page OCR
    Ocr,
}

/// A single page in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Content blocks on the page
    pub blocks: Vec<Block>,

    /// Page number (0-indexed)
    pub pnum: usize,

    /// Origin of the text layer
    #[serde(default)]
    pub source: ExtractionSource,
}

impl Page {
    /// Create a page.
    pub fn new(blocks: Vec<Block>, pnum: usize, source: ExtractionSource) -> Self {
        Self {
            blocks,
            pnum,
            source,
        }
    }

    /// Create a page without any text.
    pub fn empty(pnum: usize, source: ExtractionSource) -> Self {
        Self::new(Vec::new(), pnum, source)
    }

    /// All lines of the page in reading order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.blocks.iter().flat_map(|b| b.lines.iter())
    }

    /// Lines whose text is non-blank after trimming.
    pub fn nonblank_lines(&self) -> Vec<&Line> {
        self.lines().filter(|l| !l.is_blank()).collect()
    }

    /// Block texts joined with newlines.
    pub fn prelim_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::prelim_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if the page has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of spans on the page.
    pub fn span_count(&self) -> usize {
        self.lines().map(|l| l.spans.len()).sum()
    }
}
