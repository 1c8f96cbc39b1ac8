//! Document-level types.

use super::{ExtractionSource, Page};
use serde::{Deserialize, Serialize};

/// The extracted text layer of a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Pages in processing order
    pub pages: Vec<Page>,

    /// Table of contents, as reported by the rendering engine
    pub toc: TableOfContents,

    /// Counters collected while extracting
    #[serde(default)]
    pub stats: ExtractionStats,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page by number (0-indexed).
    pub fn get_page(&self, pnum: usize) -> Option<&Page> {
        self.pages.iter().find(|p| p.pnum == pnum)
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages whose text layer came from full-page OCR.
    pub fn ocr_pages(&self) -> impl Iterator<Item = &Page> {
        self.pages
            .iter()
            .filter(|p| p.source == ExtractionSource::Ocr)
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.prelim_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Document table of contents (bookmarks).
///
/// Opaque to extraction: entries are carried from the rendering engine to the
/// result without interpretation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableOfContents {
    /// Entries in document order
    pub entries: Vec<TocEntry>,
}

impl TableOfContents {
    /// Create a new empty table of contents.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry.
    pub fn add_entry(&mut self, entry: TocEntry) {
        self.entries.push(entry);
    }

    /// Check if the table of contents is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A single table of contents entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Nesting level (1 = top level)
    pub level: u32,

    /// Entry title
    pub title: String,

    /// Target page number (1-indexed, negative when unresolved)
    pub page: i64,
}

impl TocEntry {
    /// Create a new entry.
    pub fn new(level: u32, title: impl Into<String>, page: i64) -> Self {
        Self {
            level,
            title: title.into(),
            page,
        }
    }
}

/// Statistics collected during extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Total number of pages processed
    pub pages: usize,

    /// Pages whose native extraction failed in the rendering engine
    pub native_failures: usize,

    /// Full-page OCR attempts
    pub ocr_attempts: usize,

    /// Full-page OCR results that passed the quality gate
    pub ocr_accepted: usize,

    /// Full-page OCR results rejected as garbled
    pub ocr_rejected: usize,

    /// Full-page OCR attempts that failed in the engine
    pub ocr_failed: usize,

    /// Spans whose text was replaced by fragment OCR
    pub fragments_repaired: usize,

    /// Spans that needed repair but kept their original text
    pub fragments_kept: usize,
}

impl ExtractionStats {
    /// Pages that ended up without any text because full-page OCR was unusable.
    pub fn dropped_pages(&self) -> usize {
        self.ocr_rejected + self.ocr_failed
    }
}
