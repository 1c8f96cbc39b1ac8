//! Span-level types.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::BBox;
use crate::error::Error;

/// Page-scoped span identifier.
///
/// Assigned in construction order while a page's hierarchy is built, so
/// identifiers are unique and increasing within one page but repeat across
/// pages. Displayed and serialized as `<page>_<index>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpanId {
    /// Zero-based page number
    pub page: usize,
    /// Sequential index within the page
    pub index: usize,
}

impl SpanId {
    /// Create a span identifier.
    pub fn new(page: usize, index: usize) -> Self {
        Self { page, index }
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.page, self.index)
    }
}

impl FromStr for SpanId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::Other(format!("Invalid span id: {s:?}"));
        let (page, index) = s.split_once('_').ok_or_else(invalid)?;
        Ok(Self {
            page: page.parse().map_err(|_| invalid())?,
            index: index.parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for SpanId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SpanId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// A maximal run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The text content (possibly replaced by fragment OCR)
    pub text: String,

    /// Bounding box on the page
    pub bbox: BBox,

    /// Page-scoped identifier
    pub span_id: SpanId,

    /// Font descriptor: base font name and style tag, e.g. `Times-Roman_serifed_proportional`
    pub font: String,

    /// Text color as packed sRGB
    pub color: u32,

    /// Font ascender
    pub ascender: f32,

    /// Font descender
    pub descender: f32,
}
