//! Integration tests for page orchestration.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use textlayer::error::{Error, Result};
use textlayer::{
    BBox, ExtractOptions, ExtractionSource, Extractor, OcrEngine, OcrPage, PixelBuffer, RawBlock,
    RawLine, RawSpan, RenderEngine, TableOfContents, TextFlags, TocEntry, WordListSpellChecker,
};

/// Scripted document with call recording.
#[derive(Default)]
struct MockDocument {
    pages: Vec<Vec<RawBlock>>,
    native_failures: Vec<usize>,
    page_ocr: HashMap<usize, OcrPage>,
    region_reply: Option<String>,
    toc: Option<TableOfContents>,

    native_calls: RefCell<Vec<usize>>,
    page_ocr_calls: RefCell<Vec<usize>>,
    raster_dpis: RefCell<Vec<u32>>,
    region_calls: Cell<usize>,
}

impl MockDocument {
    fn uniform(count: usize, lines: &[&str]) -> Self {
        Self {
            pages: (0..count).map(|_| vec![block(lines)]).collect(),
            toc: Some(TableOfContents::new()),
            ..Default::default()
        }
    }

    fn with_page_ocr(mut self, pages: impl IntoIterator<Item = usize>, text: &str) -> Self {
        for pnum in pages {
            self.page_ocr.insert(pnum, ocr_page(text));
        }
        self
    }
}

impl RenderEngine for MockDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn extract_native(&self, page: usize, _flags: &TextFlags) -> Result<Vec<RawBlock>> {
        self.native_calls.borrow_mut().push(page);
        if self.native_failures.contains(&page) {
            return Err(Error::Render(format!("corrupt content stream on page {}", page)));
        }
        Ok(self.pages[page].clone())
    }

    fn rasterize(&self, page: usize, clip: Option<BBox>, dpi: u32) -> Result<PixelBuffer> {
        self.raster_dpis.borrow_mut().push(dpi);
        Ok(PixelBuffer {
            width: 8,
            height: 8,
            channels: 1,
            dpi,
            samples: vec![255; 64],
            page,
            clip,
        })
    }

    fn table_of_contents(&self) -> Result<TableOfContents> {
        self.toc
            .clone()
            .ok_or_else(|| Error::Render("outline is damaged".to_string()))
    }
}

impl OcrEngine for MockDocument {
    fn recognize_region(&self, _clip: &PixelBuffer, _language: &str) -> Result<String> {
        self.region_calls.set(self.region_calls.get() + 1);
        self.region_reply
            .clone()
            .ok_or_else(|| Error::Ocr("no text found".to_string()))
    }

    fn recognize_page(
        &self,
        raster: &PixelBuffer,
        _language: &str,
        _flags: &TextFlags,
    ) -> Result<OcrPage> {
        self.page_ocr_calls.borrow_mut().push(raster.page);
        self.page_ocr
            .get(&raster.page)
            .cloned()
            .ok_or_else(|| Error::Ocr("tesseract exited with status 1".to_string()))
    }
}

fn line_box(index: usize) -> BBox {
    let top = 72.0 + index as f32 * 14.0;
    BBox::new(72.0, top, 540.0, top + 12.0)
}

fn block(lines: &[&str]) -> RawBlock {
    let lines = lines
        .iter()
        .enumerate()
        .map(|(i, text)| {
            RawLine::new(
                line_box(i),
                vec![RawSpan::new(*text, line_box(i)).with_font("Helvetica", 0)],
            )
        })
        .collect();
    RawBlock::new(BBox::new(72.0, 72.0, 540.0, 720.0), lines)
}

fn ocr_page(text: &str) -> OcrPage {
    let lines: Vec<&str> = text.lines().collect();
    OcrPage {
        blocks: vec![block(&lines)],
        text: text.to_string(),
    }
}

const GARBLED_LINES: [&str; 3] = ["abc#######", "abc#######", "abc#######"];
const CLEAN_OCR: &str = "Recovered first line\nRecovered second line\nRecovered third line";

#[test]
fn test_full_page_ocr_only_inside_window() {
    let doc = MockDocument::uniform(10, &GARBLED_LINES).with_page_ocr(0..10, CLEAN_OCR);
    let result = Extractor::new(&doc, &doc).extract().unwrap();

    assert_eq!(*doc.page_ocr_calls.borrow(), vec![3, 4, 5, 6, 7]);
    assert_eq!(result.page_count(), 10);

    for page in &result.pages {
        if (3..=7).contains(&page.pnum) {
            assert_eq!(page.source, ExtractionSource::Ocr);
            assert!(page.prelim_text().starts_with("Recovered first line"));
        } else {
            assert_eq!(page.source, ExtractionSource::Native);
            assert!(page.prelim_text().starts_with("abc#######"));
        }
    }
    assert_eq!(result.stats.ocr_attempts, 5);
    assert_eq!(result.stats.ocr_accepted, 5);
}

#[test]
fn test_full_page_ocr_uses_ocr_dpi() {
    let doc = MockDocument::uniform(6, &GARBLED_LINES).with_page_ocr(0..6, CLEAN_OCR);
    Extractor::new(&doc, &doc)
        .with_options(ExtractOptions::new().with_ocr_dpi(300))
        .extract()
        .unwrap();

    assert_eq!(*doc.page_ocr_calls.borrow(), vec![3]);
    assert_eq!(*doc.raster_dpis.borrow(), vec![300]);
}

#[test]
fn test_pages_are_processed_in_order() {
    let doc = MockDocument::uniform(7, &["One", "Two", "Three"]);
    let result = Extractor::new(&doc, &doc).extract().unwrap();

    assert_eq!(*doc.native_calls.borrow(), (0..7).collect::<Vec<_>>());
    let pnums: Vec<usize> = result.pages.iter().map(|p| p.pnum).collect();
    assert_eq!(pnums, (0..7).collect::<Vec<_>>());
    assert!(doc.page_ocr_calls.borrow().is_empty());
}

#[test]
fn test_garbled_ocr_output_gives_empty_page() {
    // page 4 is re-read with OCR, so page 5 sees no kept native page before it
    let mut doc = MockDocument::uniform(10, &["Chapter heading", "A short caption"])
        .with_page_ocr([4, 6, 7], CLEAN_OCR)
        .with_page_ocr([5], "a b c d   ");
    doc.pages[4] = vec![block(&GARBLED_LINES)];
    let result = Extractor::new(&doc, &doc).extract().unwrap();

    assert_eq!(*doc.page_ocr_calls.borrow(), vec![4, 5, 6, 7]);

    let page = result.get_page(5).unwrap();
    assert!(page.is_empty());
    assert_eq!(page.source, ExtractionSource::Ocr);
    assert!(!result.get_page(4).unwrap().is_empty());
    assert_eq!(result.get_page(3).unwrap().source, ExtractionSource::Native);

    assert_eq!(result.stats.ocr_attempts, 4);
    assert_eq!(result.stats.ocr_accepted, 3);
    assert_eq!(result.stats.ocr_rejected, 1);
    assert_eq!(result.stats.dropped_pages(), 1);
}

#[test]
fn test_sparse_cover_pages_count_as_native_success() {
    let doc = MockDocument::uniform(10, &["Only", "two"]).with_page_ocr(0..10, CLEAN_OCR);
    let result = Extractor::new(&doc, &doc).extract().unwrap();

    assert!(doc.page_ocr_calls.borrow().is_empty());
    assert_eq!(result.ocr_pages().count(), 0);
    assert_eq!(result.get_page(5).unwrap().prelim_text(), "Only\ntwo");
}

#[test]
fn test_ocr_page_rearms_sparse_trigger() {
    let mut doc = MockDocument::uniform(10, &["Line one", "Line two", "Line three"])
        .with_page_ocr(0..10, CLEAN_OCR);
    doc.pages[4] = vec![block(&GARBLED_LINES)];
    doc.pages[5] = vec![block(&["Short", "page"])];
    let result = Extractor::new(&doc, &doc).extract().unwrap();

    assert_eq!(*doc.page_ocr_calls.borrow(), vec![4, 5]);
    assert_eq!(result.get_page(5).unwrap().source, ExtractionSource::Ocr);
    assert_eq!(result.get_page(6).unwrap().source, ExtractionSource::Native);
}

#[test]
fn test_ocr_failure_gives_empty_page() {
    let doc = MockDocument::uniform(8, &GARBLED_LINES).with_page_ocr([3], CLEAN_OCR);
    let result = Extractor::new(&doc, &doc).extract().unwrap();

    assert_eq!(*doc.page_ocr_calls.borrow(), vec![3, 4, 5]);
    assert!(!result.get_page(3).unwrap().is_empty());
    assert!(result.get_page(4).unwrap().is_empty());
    assert!(result.get_page(5).unwrap().is_empty());
    assert_eq!(result.stats.ocr_failed, 2);
    assert_eq!(result.stats.ocr_accepted, 1);
}

#[test]
fn test_native_failure_becomes_empty_page() {
    let mut doc = MockDocument::uniform(4, &["One", "Two", "Three"]);
    doc.native_failures = vec![1];
    let result = Extractor::new(&doc, &doc).extract().unwrap();

    assert_eq!(result.page_count(), 4);
    let page = result.get_page(1).unwrap();
    assert!(page.is_empty());
    assert_eq!(page.source, ExtractionSource::Native);
    assert_eq!(result.stats.native_failures, 1);
}

#[test]
fn test_fragment_ocr_only_for_invalid_spans() {
    let mut doc = MockDocument::uniform(1, &["Menu", "Caf\u{FFFD}", "Prices"]);
    doc.region_reply = Some("Café".to_string());
    let result = Extractor::new(&doc, &doc).extract().unwrap();

    assert_eq!(doc.region_calls.get(), 1);
    assert_eq!(*doc.raster_dpis.borrow(), vec![1200]);
    assert_eq!(result.pages[0].prelim_text(), "Menu\nCafé\nPrices");
    assert_eq!(result.stats.fragments_repaired, 1);
}

#[test]
fn test_fragment_failure_keeps_original() {
    let doc = MockDocument::uniform(1, &["  na\u{FFFD}ve "]);
    let result = Extractor::new(&doc, &doc).extract().unwrap();

    assert_eq!(doc.region_calls.get(), 1);
    assert_eq!(result.pages[0].prelim_text(), "  na\u{FFFD}ve ");
    assert_eq!(result.stats.fragments_kept, 1);
}

#[test]
fn test_fragment_text_is_repadded() {
    let mut doc = MockDocument::uniform(1, &["  na\u{FFFD}ve "]);
    doc.region_reply = Some("naïve".to_string());
    let result = Extractor::new(&doc, &doc).extract().unwrap();

    assert_eq!(result.pages[0].prelim_text(), "  naïve ");
}

#[test]
fn test_fragment_repair_applies_to_ocr_geometry() {
    let mut doc = MockDocument::uniform(6, &GARBLED_LINES)
        .with_page_ocr([3], "Menu\nCaf\u{FFFD}\nPrices");
    doc.region_reply = Some("Café".to_string());
    let result = Extractor::new(&doc, &doc).extract().unwrap();

    let page = result.get_page(3).unwrap();
    assert_eq!(page.source, ExtractionSource::Ocr);
    assert_eq!(page.prelim_text(), "Menu\nCafé\nPrices");
    assert_eq!(doc.region_calls.get(), 1);
    assert_eq!(*doc.raster_dpis.borrow(), vec![400, 1200]);
    assert_eq!(result.stats.fragments_repaired, 1);
    assert_eq!(result.stats.ocr_accepted, 1);
}

#[test]
fn test_custom_invalid_chars() {
    let mut doc = MockDocument::uniform(1, &["Caf\u{FFFD}", "pri?e"]);
    doc.region_reply = Some("price".to_string());
    let options = ExtractOptions::new().with_invalid_chars(['?']);
    let result = Extractor::new(&doc, &doc)
        .with_options(options)
        .extract()
        .unwrap();

    assert_eq!(doc.region_calls.get(), 1);
    assert_eq!(result.pages[0].prelim_text(), "Caf\u{FFFD}\nprice");
}

#[test]
fn test_max_pages_limits_processing() {
    let doc = MockDocument::uniform(10, &GARBLED_LINES).with_page_ocr(0..10, CLEAN_OCR);
    let result = Extractor::new(&doc, &doc)
        .with_options(ExtractOptions::new().with_max_pages(5))
        .extract()
        .unwrap();

    assert_eq!(result.page_count(), 5);
    assert_eq!(*doc.native_calls.borrow(), vec![0, 1, 2, 3, 4]);
    // the window is measured against the whole document, so page 4 still retries
    assert_eq!(*doc.page_ocr_calls.borrow(), vec![3, 4]);
}

#[test]
fn test_max_pages_zero_is_unlimited() {
    let doc = MockDocument::uniform(4, &["One", "Two", "Three"]);
    let result = Extractor::new(&doc, &doc)
        .with_options(ExtractOptions::new().with_max_pages(0))
        .extract()
        .unwrap();
    assert_eq!(result.page_count(), 4);
}

#[test]
fn test_toc_is_passed_through() {
    let mut toc = TableOfContents::new();
    toc.add_entry(TocEntry::new(1, "Introduction", 1));
    toc.add_entry(TocEntry::new(2, "Background", 3));

    let mut doc = MockDocument::uniform(2, &["One", "Two", "Three"]);
    doc.toc = Some(toc.clone());
    let result = Extractor::new(&doc, &doc).extract().unwrap();

    assert_eq!(result.toc, toc);
}

#[test]
fn test_toc_failure_gives_empty_toc() {
    let mut doc = MockDocument::uniform(2, &["One", "Two", "Three"]);
    doc.toc = None;
    let result = Extractor::new(&doc, &doc).extract().unwrap();

    assert!(result.toc.is_empty());
    assert_eq!(result.page_count(), 2);
}

#[test]
fn test_spell_checker_rejects_unknown_words() {
    let doc = MockDocument::uniform(6, &GARBLED_LINES).with_page_ocr([3], "zxq vvk qqpr wrrt");
    let spell = WordListSpellChecker::new().with_words("en", ["recovered", "line"]);

    let result = Extractor::new(&doc, &doc)
        .with_spell_checker(&spell)
        .with_options(ExtractOptions::new().with_spell_language("en"))
        .extract()
        .unwrap();

    assert!(result.get_page(3).unwrap().is_empty());
    assert_eq!(result.stats.ocr_rejected, 1);
}

#[test]
fn test_spell_checker_accepts_known_words() {
    let doc = MockDocument::uniform(6, &GARBLED_LINES).with_page_ocr([3], CLEAN_OCR);
    let spell = WordListSpellChecker::new().with_words(
        "en",
        ["recovered", "first", "second", "third", "line"],
    );

    let result = Extractor::new(&doc, &doc)
        .with_spell_checker(&spell)
        .with_options(ExtractOptions::new().with_spell_language("en"))
        .extract()
        .unwrap();

    assert_eq!(result.get_page(3).unwrap().source, ExtractionSource::Ocr);
    assert!(!result.get_page(3).unwrap().is_empty());
}

#[test]
fn test_spell_language_without_checker_is_rejected() {
    let doc = MockDocument::uniform(2, &["One", "Two", "Three"]);
    let result = Extractor::new(&doc, &doc)
        .with_options(ExtractOptions::new().with_spell_language("en"))
        .extract();

    assert!(matches!(result, Err(Error::InvalidOption(_))));
    assert!(doc.native_calls.borrow().is_empty());
}

#[test]
fn test_span_ids_unique_per_page() {
    let doc = MockDocument::uniform(3, &["One", "Two", "Three"]);
    let result = Extractor::new(&doc, &doc).extract().unwrap();

    for page in &result.pages {
        let ids: Vec<String> = page
            .lines()
            .flat_map(|l| l.spans.iter().map(|s| s.span_id.to_string()))
            .collect();
        let expected: Vec<String> = (0..3).map(|i| format!("{}_{}", page.pnum, i)).collect();
        assert_eq!(ids, expected);
    }
}
