//! Collaborator abstraction layer.
//!
//! Provides trait-based interfaces for the rendering engine, the OCR engine,
//! the tokenizer and the spell checker, isolating the extraction decisions
//! from any concrete library.

mod records;
pub mod replay;
mod spell;
mod tokenize;

pub use records::{OcrPage, RawBlock, RawLine, RawSpan};
pub use replay::{Capture, CapturedPage, CapturedRegion, ReplayDocument};
pub use spell::WordListSpellChecker;
pub use tokenize::WordPunctTokenizer;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{BBox, TableOfContents};

/// Text extraction flags shared by native and OCR passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFlags {
    /// Keep ligatures as single glyphs instead of expanding them
    pub preserve_ligatures: bool,
    /// Keep whitespace runs as they appear in the content stream
    pub preserve_whitespace: bool,
    /// Emit image blocks alongside text blocks
    pub preserve_images: bool,
    /// Suppress synthesized spaces between glyphs
    pub inhibit_spaces: bool,
    /// Join words hyphenated across line ends
    pub dehyphenate: bool,
    /// Drop text outside the page's media box
    pub mediabox_clip: bool,
    /// Return blocks in reading order
    pub sort: bool,
}

impl Default for TextFlags {
    fn default() -> Self {
        Self {
            preserve_ligatures: false,
            preserve_whitespace: true,
            preserve_images: false,
            inhibit_spaces: false,
            dehyphenate: true,
            mediabox_clip: true,
            sort: true,
        }
    }
}

/// A rasterized page or page region.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Samples per pixel (1 = gray, 3 = RGB)
    pub channels: u8,
    /// Resolution the buffer was rendered at
    pub dpi: u32,
    /// Row-major samples; may be empty for metadata-only buffers
    pub samples: Vec<u8>,
    /// Zero-based page the buffer was rendered from
    pub page: usize,
    /// Region of the page in points, `None` for the whole page
    pub clip: Option<BBox>,
}

impl PixelBuffer {
    /// Scale factor from page points to pixels.
    pub fn scale(&self) -> f32 {
        self.dpi as f32 / 72.0
    }
}

/// Abstract interface for the document rendering engine.
pub trait RenderEngine {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Extract the native text layer of a page as raw records.
    fn extract_native(&self, page: usize, flags: &TextFlags) -> Result<Vec<RawBlock>>;

    /// Rasterize a page, or a region of it, at the given resolution.
    fn rasterize(&self, page: usize, clip: Option<BBox>, dpi: u32) -> Result<PixelBuffer>;

    /// The document's table of contents.
    fn table_of_contents(&self) -> Result<TableOfContents>;
}

/// Abstract interface for the OCR engine.
pub trait OcrEngine {
    /// Recognize the text of a single region raster.
    fn recognize_region(&self, clip: &PixelBuffer, language: &str) -> Result<String>;

    /// Recognize a whole page raster.
    ///
    /// Returned geometry must be expressed in page points
    /// (divide pixel coordinates by [`PixelBuffer::scale`]).
    fn recognize_page(
        &self,
        raster: &PixelBuffer,
        language: &str,
        flags: &TextFlags,
    ) -> Result<OcrPage>;
}

/// Splits text into word and punctuation tokens.
pub trait Tokenizer {
    /// Tokenize text, preserving order.
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Dictionary lookup service.
pub trait SpellChecker {
    /// Return the subset of `words` not recognized in `language`.
    fn unknown_words(&self, language: &str, words: &BTreeSet<String>) -> BTreeSet<String>;
}
