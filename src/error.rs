//! Error types for textlayer library.

use std::io;
use thiserror::Error;

/// Result type alias for textlayer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting a text layer.
///
/// Engine errors (`Render`, `Ocr`) are returned by collaborator
/// implementations. The extraction pipeline recovers from them locally and
/// never hands them back to its caller.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON capture or output failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The rendering engine failed to extract or rasterize a page.
    #[error("Rendering engine error: {0}")]
    Render(String),

    /// The OCR engine failed to recognize a page or region.
    #[error("OCR engine error: {0}")]
    Ocr(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// An extraction option has an unusable value.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// A spell-check dictionary could not be loaded.
    #[error("Dictionary error: {0}")]
    Dictionary(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
