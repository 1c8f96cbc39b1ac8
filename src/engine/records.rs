//! Raw extraction records produced by the rendering and OCR engines.
//!
//! These mirror the nested block → line → span output of a text extraction
//! pass before any filtering. The hierarchy builder turns them into
//! [`crate::model`] values.

use serde::{Deserialize, Serialize};

use crate::model::BBox;

/// A raw span as reported by an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSpan {
    /// Text of the run
    pub text: String,
    /// Bounding box in page points
    pub bbox: BBox,
    /// Base font name (e.g., "Times-Roman")
    #[serde(default)]
    pub font: String,
    /// Style bitmask (see [`crate::extract::style_tag`])
    #[serde(default)]
    pub flags: u32,
    /// Packed sRGB color
    #[serde(default)]
    pub color: u32,
    /// Font ascender
    #[serde(default)]
    pub ascender: f32,
    /// Font descender
    #[serde(default)]
    pub descender: f32,
}

impl RawSpan {
    /// Create a span with default font metrics.
    pub fn new(text: impl Into<String>, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            bbox,
            font: String::new(),
            flags: 0,
            color: 0,
            ascender: 1.0,
            descender: 0.0,
        }
    }

    /// Set the font name and style bitmask.
    pub fn with_font(mut self, font: impl Into<String>, flags: u32) -> Self {
        self.font = font.into();
        self.flags = flags;
        self
    }
}

/// A raw line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    /// Bounding box in page points
    pub bbox: BBox,
    /// Spans in engine order
    #[serde(default)]
    pub spans: Vec<RawSpan>,
}

impl RawLine {
    /// Create a line.
    pub fn new(bbox: BBox, spans: Vec<RawSpan>) -> Self {
        Self { bbox, spans }
    }
}

/// A raw text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    /// Bounding box in page points
    pub bbox: BBox,
    /// Lines in engine order
    #[serde(default)]
    pub lines: Vec<RawLine>,
}

impl RawBlock {
    /// Create a block.
    pub fn new(bbox: BBox, lines: Vec<RawLine>) -> Self {
        Self { bbox, lines }
    }
}

/// Output of a full-page OCR pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrPage {
    /// Recognized geometry, in page points
    #[serde(default)]
    pub blocks: Vec<RawBlock>,
    /// The engine's own plain-text rendering of the page
    #[serde(default)]
    pub text: String,
}
