//! Text layer extraction.
//!
//! Builds each page's span hierarchy, repairs unrepresentable fragments with
//! localized OCR, and replaces unusable pages with full-page OCR when the OCR
//! output passes the garbled-text check.

mod fragment;
mod hierarchy;
mod options;
mod pipeline;
mod quality;
mod style;

pub use fragment::{repad, FragmentOutcome, FragmentRepairer};
pub use hierarchy::{FragmentCounts, HierarchyBuilder};
pub use options::{
    ExtractOptions, QualityThresholds, DEFAULT_OCR_DPI, DEFAULT_OCR_LANGUAGE, DEFAULT_SEGMENT_DPI,
};
pub use pipeline::{
    in_ocr_window, ocr_trigger, Extractor, OcrTrigger, RunState, LEADING_PAGES_SKIPPED,
    MIN_ALPHANUMERIC_RATIO, MIN_NONBLANK_LINES, TRAILING_PAGES_SKIPPED,
};
pub use quality::{alphanumeric_ratio, detect_bad_ocr, GarbleReason, QualityGate};
pub use style::{font_descriptor, style_tag};
