//! Page orchestration.
//!
//! Pages are processed strictly in order. Each page is first built from the
//! native text layer; when that text looks unusable and the page is not at
//! either end of the document, the page is rebuilt from full-page OCR, unless
//! the OCR output itself is garbled.

use super::fragment::FragmentRepairer;
use super::hierarchy::HierarchyBuilder;
use super::options::ExtractOptions;
use super::quality::{alphanumeric_ratio, GarbleReason, QualityGate};
use crate::engine::{OcrEngine, RawBlock, RenderEngine, SpellChecker, Tokenizer, WordPunctTokenizer};
use crate::error::{Error, Result};
use crate::model::{Document, ExtractionSource, ExtractionStats, Page, TableOfContents};

/// Pages with fewer nonblank lines than this may have no real text layer.
pub const MIN_NONBLANK_LINES: usize = 3;

/// Native text with a lower share of letters and digits is considered garbled.
pub const MIN_ALPHANUMERIC_RATIO: f64 = 0.6;

/// Full-page OCR never runs on this many leading pages.
pub const LEADING_PAGES_SKIPPED: usize = 3;

/// Full-page OCR never runs on this many trailing pages.
pub const TRAILING_PAGES_SKIPPED: usize = 2;

/// Why a page's native text was judged unusable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OcrTrigger {
    /// Too few lines, and no native page was kept since the run start or the last OCR page
    SparseText {
        /// Nonblank lines found
        lines: usize,
    },
    /// Too few letters and digits
    LowAlphanumeric {
        /// Alphanumeric share of the page text
        ratio: f64,
    },
}

/// Decide whether a natively extracted page should be re-read with OCR.
pub fn ocr_trigger(page: &Page, prior_native_success: bool) -> Option<OcrTrigger> {
    let lines = page.nonblank_lines().len();
    if lines < MIN_NONBLANK_LINES && !prior_native_success {
        return Some(OcrTrigger::SparseText { lines });
    }

    let ratio = alphanumeric_ratio(&page.prelim_text());
    if ratio < MIN_ALPHANUMERIC_RATIO {
        return Some(OcrTrigger::LowAlphanumeric { ratio });
    }
    None
}

/// Check whether full-page OCR may run on page `pnum` of a `page_count` page
/// document. Cover and back pages often trigger falsely, so both ends of the
/// document are excluded.
pub fn in_ocr_window(pnum: usize, page_count: usize) -> bool {
    pnum >= LEADING_PAGES_SKIPPED && pnum + TRAILING_PAGES_SKIPPED < page_count
}

/// State carried from one page to the next within a single run.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    /// The most recent decision kept a page's native text
    pub prior_native_success: bool,
    /// Counters for the run
    pub stats: ExtractionStats,
}

/// Outcome of a full-page OCR attempt.
#[derive(Debug)]
enum FullPageOcr {
    Accepted(Vec<RawBlock>),
    Rejected(GarbleReason),
    Failed(Error),
}

/// Extracts the text layer of a document.
///
/// # Example
///
/// ```no_run
/// use textlayer::engine::ReplayDocument;
/// use textlayer::{ExtractOptions, Extractor};
///
/// let doc = ReplayDocument::load_file("capture.json")?;
/// let result = Extractor::new(&doc, &doc)
///     .with_options(ExtractOptions::new().with_max_pages(20))
///     .extract()?;
/// println!("{} pages", result.page_count());
/// # Ok::<(), textlayer::Error>(())
/// ```
pub struct Extractor<'a> {
    render: &'a dyn RenderEngine,
    ocr: &'a dyn OcrEngine,
    tokenizer: Option<&'a dyn Tokenizer>,
    spell: Option<&'a dyn SpellChecker>,
    default_tokenizer: WordPunctTokenizer,
    options: ExtractOptions,
}

impl<'a> Extractor<'a> {
    /// Create an extractor over a rendering engine and an OCR engine.
    pub fn new(render: &'a dyn RenderEngine, ocr: &'a dyn OcrEngine) -> Self {
        Self {
            render,
            ocr,
            tokenizer: None,
            spell: None,
            default_tokenizer: WordPunctTokenizer::new(),
            options: ExtractOptions::default(),
        }
    }

    /// Set extraction options.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a custom tokenizer for OCR quality checks.
    pub fn with_tokenizer(mut self, tokenizer: &'a dyn Tokenizer) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// Use a spell checker for OCR quality checks.
    ///
    /// Only consulted when [`ExtractOptions::spell_language`] is set.
    pub fn with_spell_checker(mut self, spell: &'a dyn SpellChecker) -> Self {
        self.spell = Some(spell);
        self
    }

    /// The options in effect.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Check options and collaborators before a run.
    pub fn validate(&self) -> Result<()> {
        self.options.validate()?;
        if self.options.spell_language.is_some() && self.spell.is_none() {
            return Err(Error::InvalidOption(
                "spell_language is set but no spell checker was provided".to_string(),
            ));
        }
        Ok(())
    }

    /// Extract every page (up to `max_pages`) and the table of contents.
    ///
    /// Engine failures never abort the run: they degrade to the original
    /// text, an empty page, or an empty table of contents.
    pub fn extract(&self) -> Result<Document> {
        self.validate()?;

        let page_count = self.render.page_count();
        let limit = self
            .options
            .max_pages
            .map_or(page_count, |max| max.min(page_count));
        log::info!("Extracting {} of {} pages", limit, page_count);

        let toc = self.render.table_of_contents().unwrap_or_else(|e| {
            log::warn!("Failed to read table of contents: {}", e);
            TableOfContents::new()
        });

        let mut state = RunState::default();
        let pages: Vec<Page> = (0..limit)
            .map(|pnum| self.process_page(pnum, page_count, &mut state))
            .collect();

        let stats = state.stats;
        log::info!(
            "Extracted {} pages ({} OCR attempts, {} accepted, {} dropped)",
            stats.pages,
            stats.ocr_attempts,
            stats.ocr_accepted,
            stats.dropped_pages()
        );

        Ok(Document { pages, toc, stats })
    }

    /// Process one page, updating the run state.
    pub fn process_page(&self, pnum: usize, page_count: usize, state: &mut RunState) -> Page {
        state.stats.pages += 1;
        let native = self.native_page(pnum, state);

        let Some(trigger) = ocr_trigger(&native, state.prior_native_success) else {
            return self.keep_native(native, state);
        };

        if !in_ocr_window(pnum, page_count) {
            log::debug!(
                "Page {}: {:?} but page is at a document edge, keeping native text",
                pnum,
                trigger
            );
            return self.keep_native(native, state);
        }

        log::debug!("Page {}: {:?}, retrying with full-page OCR", pnum, trigger);
        self.ocr_page(pnum, state)
    }

    fn keep_native(&self, page: Page, state: &mut RunState) -> Page {
        state.prior_native_success = true;
        page
    }

    fn native_page(&self, pnum: usize, state: &mut RunState) -> Page {
        let raw = self
            .render
            .extract_native(pnum, &self.options.text_flags)
            .unwrap_or_else(|e| {
                log::warn!("Failed to extract text from page {}: {}", pnum, e);
                state.stats.native_failures += 1;
                Vec::new()
            });
        self.build_page(raw, pnum, ExtractionSource::Native, state)
    }

    fn ocr_page(&self, pnum: usize, state: &mut RunState) -> Page {
        // an OCR page re-arms the sparse-text trigger for the next page
        state.prior_native_success = false;
        state.stats.ocr_attempts += 1;
        match self.full_page_ocr(pnum) {
            FullPageOcr::Accepted(raw) => {
                state.stats.ocr_accepted += 1;
                self.build_page(raw, pnum, ExtractionSource::Ocr, state)
            }
            FullPageOcr::Rejected(reason) => {
                log::warn!("Page {}: discarding garbled OCR output ({})", pnum, reason);
                state.stats.ocr_rejected += 1;
                Page::empty(pnum, ExtractionSource::Ocr)
            }
            FullPageOcr::Failed(e) => {
                log::warn!("Page {}: full-page OCR failed: {}", pnum, e);
                state.stats.ocr_failed += 1;
                Page::empty(pnum, ExtractionSource::Ocr)
            }
        }
    }

    fn full_page_ocr(&self, pnum: usize) -> FullPageOcr {
        let recognized = self
            .render
            .rasterize(pnum, None, self.options.ocr_dpi)
            .and_then(|raster| {
                self.ocr.recognize_page(
                    &raster,
                    &self.options.ocr_language,
                    &self.options.text_flags,
                )
            });

        match recognized {
            Err(e) => FullPageOcr::Failed(e),
            Ok(page) => match self.quality_gate().assess(&page.text) {
                Some(reason) => FullPageOcr::Rejected(reason),
                None => FullPageOcr::Accepted(page.blocks),
            },
        }
    }

    fn quality_gate(&self) -> QualityGate<'_> {
        let tokenizer: &dyn Tokenizer = match self.tokenizer {
            Some(tokenizer) => tokenizer,
            None => &self.default_tokenizer,
        };
        let gate = QualityGate::new(tokenizer, self.options.thresholds);
        match (self.spell, self.options.spell_language.as_deref()) {
            (Some(spell), Some(language)) => gate.with_spell_checker(spell, language),
            _ => gate,
        }
    }

    fn build_page(
        &self,
        raw: Vec<RawBlock>,
        pnum: usize,
        source: ExtractionSource,
        state: &mut RunState,
    ) -> Page {
        let repairer = FragmentRepairer::new(
            self.render,
            self.ocr,
            pnum,
            &self.options.ocr_language,
            self.options.segment_dpi,
        );
        let (page, counts) = HierarchyBuilder::new(pnum, source, &self.options)
            .with_repairer(&repairer)
            .build(raw);

        state.stats.fragments_repaired += counts.repaired;
        state.stats.fragments_kept += counts.kept;
        page
    }
}
