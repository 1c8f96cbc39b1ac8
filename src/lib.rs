//! # textlayer
//!
//! Per-page text layer extraction for documents that mix native text with
//! scanned content.
//!
//! Every page is first built from the document's own text layer into a
//! page → block → line → span hierarchy. Spans containing characters the
//! output cannot represent are re-read with OCR over their bounding box.
//! Pages whose native text looks missing or garbled are re-read with
//! full-page OCR, and the OCR result is itself checked before it is kept.
//!
//! ## Quick Start
//!
//! ```no_run
//! use textlayer::{extract_capture, ExtractOptions};
//!
//! fn main() -> textlayer::Result<()> {
//!     let doc = extract_capture("capture.json", ExtractOptions::default())?;
//!     for page in &doc.pages {
//!         println!("page {}: {} blocks", page.pnum, page.blocks.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Collaborators
//!
//! Rendering and OCR are supplied through the [`engine::RenderEngine`] and
//! [`engine::OcrEngine`] traits. [`engine::ReplayDocument`] implements both
//! over a recorded JSON capture.

pub mod engine;
pub mod error;
pub mod extract;
pub mod model;

// Re-export commonly used types
pub use engine::{
    OcrEngine, OcrPage, PixelBuffer, RawBlock, RawLine, RawSpan, RenderEngine, ReplayDocument,
    SpellChecker, TextFlags, Tokenizer, WordListSpellChecker, WordPunctTokenizer,
};
pub use error::{Error, Result};
pub use extract::{
    detect_bad_ocr, style_tag, ExtractOptions, Extractor, GarbleReason, QualityGate,
    QualityThresholds,
};
pub use model::{
    BBox, Block, Document, ExtractionSource, ExtractionStats, Line, Page, Span, SpanId,
    TableOfContents, TocEntry,
};

use std::path::Path;

/// Extract a document's text layer with the given engines.
///
/// # Example
///
/// ```no_run
/// use textlayer::{extract_document, ExtractOptions, ReplayDocument};
///
/// let doc = ReplayDocument::load_file("capture.json")?;
/// let result = extract_document(&doc, &doc, ExtractOptions::default())?;
/// println!("{}", result.plain_text());
/// # Ok::<(), textlayer::Error>(())
/// ```
pub fn extract_document(
    render: &dyn RenderEngine,
    ocr: &dyn OcrEngine,
    options: ExtractOptions,
) -> Result<Document> {
    Extractor::new(render, ocr).with_options(options).extract()
}

/// Extract the text layer from a recorded capture file.
///
/// Recorded OCR results stand in for the OCR engine; pages or regions without
/// a recording behave as if OCR failed.
pub fn extract_capture<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Document> {
    let doc = ReplayDocument::load_file(path)?;
    extract_document(&doc, &doc, options)
}

/// Check whether a text is too garbled to use, with default thresholds and
/// no dictionary checks.
///
/// # Example
///
/// ```
/// assert!(textlayer::is_garbled("a  b   c    d"));
/// assert!(!textlayer::is_garbled("A perfectly ordinary sentence."));
/// ```
pub fn is_garbled(text: &str) -> bool {
    let tokenizer = WordPunctTokenizer::new();
    detect_bad_ocr(text, None, &tokenizer, None, QualityThresholds::default())
}
