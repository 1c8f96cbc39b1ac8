//! Extraction options and configuration.

use crate::engine::TextFlags;
use crate::error::{Error, Result};

/// Default resolution for full-page OCR.
pub const DEFAULT_OCR_DPI: u32 = 400;

/// Default resolution for fragment OCR. Fragments are small, so they are
/// rendered much finer than whole pages.
pub const DEFAULT_SEGMENT_DPI: u32 = 1200;

/// Default OCR language code.
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";

/// Options for extracting a document's text layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Resolution for full-page OCR
    pub ocr_dpi: u32,

    /// Resolution for fragment OCR
    pub segment_dpi: u32,

    /// Language passed to the OCR engine
    pub ocr_language: String,

    /// Language for dictionary checks of OCR output (`None` disables them)
    pub spell_language: Option<String>,

    /// Characters the output encoding cannot represent
    pub invalid_chars: Vec<char>,

    /// Garbled-text thresholds
    pub thresholds: QualityThresholds,

    /// Stop after this many pages
    pub max_pages: Option<usize>,

    /// Flags for native and OCR text extraction
    pub text_flags: TextFlags,
}

impl ExtractOptions {
    /// Create new extraction options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set full-page OCR resolution.
    pub fn with_ocr_dpi(mut self, dpi: u32) -> Self {
        self.ocr_dpi = dpi;
        self
    }

    /// Set fragment OCR resolution.
    pub fn with_segment_dpi(mut self, dpi: u32) -> Self {
        self.segment_dpi = dpi;
        self
    }

    /// Set OCR language.
    pub fn with_ocr_language(mut self, language: impl Into<String>) -> Self {
        self.ocr_language = language.into();
        self
    }

    /// Enable dictionary checks of OCR output for a language.
    pub fn with_spell_language(mut self, language: impl Into<String>) -> Self {
        self.spell_language = Some(language.into());
        self
    }

    /// Set the characters that trigger fragment OCR.
    pub fn with_invalid_chars(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.invalid_chars = chars.into_iter().collect();
        self
    }

    /// Set garbled-text thresholds.
    pub fn with_thresholds(mut self, thresholds: QualityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Limit the number of pages processed. `0` means no limit.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = (max_pages > 0).then_some(max_pages);
        self
    }

    /// Set text extraction flags.
    pub fn with_text_flags(mut self, flags: TextFlags) -> Self {
        self.text_flags = flags;
        self
    }

    /// Check whether a text contains a character the output cannot represent.
    pub fn has_invalid_chars(&self, text: &str) -> bool {
        text.chars().any(|c| self.invalid_chars.contains(&c))
    }

    /// Reject values extraction cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.ocr_dpi == 0 {
            return Err(Error::InvalidOption("ocr_dpi must be positive".to_string()));
        }
        if self.segment_dpi == 0 {
            return Err(Error::InvalidOption(
                "segment_dpi must be positive".to_string(),
            ));
        }
        if self.ocr_language.trim().is_empty() {
            return Err(Error::InvalidOption(
                "ocr_language must not be empty".to_string(),
            ));
        }
        if matches!(&self.spell_language, Some(lang) if lang.trim().is_empty()) {
            return Err(Error::InvalidOption(
                "spell_language must not be empty".to_string(),
            ));
        }
        self.thresholds.validate()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            ocr_dpi: DEFAULT_OCR_DPI,
            segment_dpi: DEFAULT_SEGMENT_DPI,
            ocr_language: DEFAULT_OCR_LANGUAGE.to_string(),
            spell_language: None,
            invalid_chars: vec!['\u{FFFD}'],
            thresholds: QualityThresholds::default(),
            max_pages: None,
            text_flags: TextFlags::default(),
        }
    }
}

/// Ratios above which a page's text is considered garbled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityThresholds {
    /// Share of tokens that are unknown words or punctuation
    pub misspelling: f64,
    /// Share of characters that are spaces
    pub space: f64,
    /// Share of characters that are newlines
    pub newline: f64,
}

impl QualityThresholds {
    /// Create thresholds.
    pub fn new(misspelling: f64, space: f64, newline: f64) -> Self {
        Self {
            misspelling,
            space,
            newline,
        }
    }

    /// Reject thresholds outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("misspelling", self.misspelling),
            ("space", self.space),
            ("newline", self.newline),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidOption(format!(
                    "{} threshold must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            misspelling: 0.8,
            space: 0.5,
            newline: 0.3,
        }
    }
}
