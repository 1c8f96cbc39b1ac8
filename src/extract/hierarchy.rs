//! Page hierarchy construction.
//!
//! Turns raw block → line → span records from one extraction pass into
//! [`Page`] values, repairing unrepresentable spans and dropping degenerate
//! geometry on the way.

use super::fragment::FragmentRepairer;
use super::options::ExtractOptions;
use super::style::font_descriptor;
use crate::engine::{RawBlock, RawLine, RawSpan};
use crate::model::{BBox, Block, ExtractionSource, Line, Page, Span, SpanId};

/// Fragment repair counts for one built page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FragmentCounts {
    /// Spans whose text came from fragment OCR
    pub repaired: usize,
    /// Spans that needed repair but kept their original text
    pub kept: usize,
}

/// Builds one page's hierarchy from raw records.
pub struct HierarchyBuilder<'a> {
    pnum: usize,
    source: ExtractionSource,
    options: &'a ExtractOptions,
    repairer: Option<&'a FragmentRepairer<'a>>,
    next_span: usize,
    counts: FragmentCounts,
}

impl<'a> HierarchyBuilder<'a> {
    /// Create a builder for page `pnum`.
    pub fn new(pnum: usize, source: ExtractionSource, options: &'a ExtractOptions) -> Self {
        Self {
            pnum,
            source,
            options,
            repairer: None,
            next_span: 0,
            counts: FragmentCounts::default(),
        }
    }

    /// Repair spans with unrepresentable characters through fragment OCR.
    ///
    /// Without a repairer such spans keep their text.
    pub fn with_repairer(mut self, repairer: &'a FragmentRepairer<'a>) -> Self {
        self.repairer = Some(repairer);
        self
    }

    /// Build the page.
    pub fn build(mut self, raw: Vec<RawBlock>) -> (Page, FragmentCounts) {
        let blocks = raw
            .into_iter()
            .filter_map(|block| self.build_block(block))
            .collect();
        (Page::new(blocks, self.pnum, self.source), self.counts)
    }

    fn build_block(&mut self, raw: RawBlock) -> Option<Block> {
        let lines: Vec<Line> = raw
            .lines
            .into_iter()
            .map(|line| self.build_line(line))
            .filter(|line| line.area() > 0.0)
            .collect();

        if lines.is_empty() {
            return None;
        }
        Some(Block::new(lines, raw.bbox, self.pnum))
    }

    fn build_line(&mut self, raw: RawLine) -> Line {
        let spans = raw
            .spans
            .into_iter()
            .map(|span| self.build_span(span))
            .collect();
        Line::new(spans, raw.bbox)
    }

    fn build_span(&mut self, raw: RawSpan) -> Span {
        let mut text = raw.text;
        if self.options.has_invalid_chars(&text) {
            text = self.repair(text, raw.bbox);
        }

        let span_id = SpanId::new(self.pnum, self.next_span);
        self.next_span += 1;

        Span {
            text,
            bbox: raw.bbox,
            span_id,
            font: font_descriptor(&raw.font, raw.flags),
            color: raw.color,
            ascender: raw.ascender,
            descender: raw.descender,
        }
    }

    fn repair(&mut self, text: String, bbox: BBox) -> String {
        let Some(repairer) = self.repairer else {
            self.counts.kept += 1;
            return text;
        };

        let outcome = repairer.recognize(bbox);
        if outcome.is_recognized() {
            self.counts.repaired += 1;
        } else {
            self.counts.kept += 1;
        }
        outcome.into_text(text)
    }
}
