//! Text layer model types.
//!
//! A page's text is represented as a four-level hierarchy
//! (page → block → line → span). All values are built once per extraction
//! attempt and rebuilt from scratch when a page is re-extracted with OCR.

mod document;
mod geometry;
mod page;
mod span;

pub use document::{Document, ExtractionStats, TableOfContents, TocEntry};
pub use geometry::BBox;
pub use page::{Block, ExtractionSource, Line, Page};
pub use span::{Span, SpanId};
