//! Fragment-level OCR repair.
//!
//! A span whose text contains characters the output encoding cannot
//! represent is re-read by rasterizing its bounding box and running OCR over
//! it. The repair is best effort: every failure keeps the original text.

use crate::engine::{OcrEngine, RenderEngine};
use crate::model::BBox;

/// Result of recognizing one fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentOutcome {
    /// OCR produced usable text (not yet padded)
    Recognized(String),
    /// Keep the original text
    UseOriginal,
}

impl FragmentOutcome {
    /// Resolve the outcome against the span's original text.
    pub fn into_text(self, original: String) -> String {
        match self {
            FragmentOutcome::Recognized(text) => repad(&original, &text),
            FragmentOutcome::UseOriginal => original,
        }
    }

    /// Check whether OCR text will replace the original.
    pub fn is_recognized(&self) -> bool {
        matches!(self, FragmentOutcome::Recognized(_))
    }
}

/// Runs fragment OCR for the spans of one page.
pub struct FragmentRepairer<'a> {
    render: &'a dyn RenderEngine,
    ocr: &'a dyn OcrEngine,
    page: usize,
    language: &'a str,
    dpi: u32,
}

impl<'a> FragmentRepairer<'a> {
    /// Create a repairer for one page.
    pub fn new(
        render: &'a dyn RenderEngine,
        ocr: &'a dyn OcrEngine,
        page: usize,
        language: &'a str,
        dpi: u32,
    ) -> Self {
        Self {
            render,
            ocr,
            page,
            language,
            dpi,
        }
    }

    /// Rasterize `bbox` and recognize it.
    ///
    /// Rasterization errors, OCR errors and blank recognitions all yield
    /// [`FragmentOutcome::UseOriginal`].
    pub fn recognize(&self, bbox: BBox) -> FragmentOutcome {
        let recognized = self
            .render
            .rasterize(self.page, Some(bbox), self.dpi)
            .and_then(|clip| self.ocr.recognize_region(&clip, self.language));

        match recognized {
            Ok(text) if !text.trim().is_empty() => FragmentOutcome::Recognized(text),
            other => {
                match other {
                    Err(e) => log::debug!("Fragment OCR failed on page {}: {}", self.page, e),
                    Ok(_) => log::debug!("Fragment OCR returned blank text on page {}", self.page),
                }
                FragmentOutcome::UseOriginal
            }
        }
    }
}

/// Surround OCR text with as many spaces as the original had whitespace on
/// each side.
///
/// OCR engines drop leading whitespace, but inter-run spacing in the text
/// layer depends on it.
pub fn repad(original: &str, recognized: &str) -> String {
    let total = original.chars().count();
    let left = total - original.trim_start().chars().count();
    let right = total - original.trim_end().chars().count();

    let mut text = String::with_capacity(recognized.len() + left + right);
    text.extend(std::iter::repeat(' ').take(left));
    text.push_str(recognized);
    text.extend(std::iter::repeat(' ').take(right));
    text
}
