//! Replay engine backed by a recorded JSON capture.
//!
//! A capture holds the native records of every page together with optional
//! recordings of full-page and fragment OCR. [`ReplayDocument`] serves them
//! back through [`RenderEngine`] and [`OcrEngine`], so extraction decisions can
//! be re-run offline without a rendering or OCR library.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{OcrEngine, OcrPage, PixelBuffer, RawBlock, RenderEngine, TextFlags};
use crate::error::{Error, Result};
use crate::model::{BBox, TableOfContents};

/// Clip boxes match a recorded region when every edge is this close, in points.
const REGION_TOLERANCE: f32 = 0.5;

/// US Letter, used when rasterizing a page that has no recorded geometry.
const DEFAULT_PAGE_BOX: BBox = BBox {
    left: 0.0,
    top: 0.0,
    right: 612.0,
    bottom: 792.0,
};

/// Recorded engine output for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    /// Pages in document order
    #[serde(default)]
    pub pages: Vec<CapturedPage>,

    /// Table of contents
    #[serde(default)]
    pub toc: TableOfContents,
}

/// Recorded engine output for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapturedPage {
    /// Native text layer records
    #[serde(default)]
    pub blocks: Vec<RawBlock>,

    /// Full-page OCR result, if one was recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr: Option<OcrPage>,

    /// Fragment OCR results keyed by clip box
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<CapturedRegion>,

    /// Page box in points, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_box: Option<BBox>,
}

/// A recorded fragment OCR result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedRegion {
    /// Clip box the fragment was rasterized from
    pub bbox: BBox,
    /// Recognized text
    pub text: String,
}

/// A document served from a [`Capture`].
#[derive(Debug, Clone, Default)]
pub struct ReplayDocument {
    capture: Capture,
}

impl ReplayDocument {
    /// Wrap an in-memory capture.
    pub fn new(capture: Capture) -> Self {
        Self { capture }
    }

    /// Load a capture from a JSON file.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::load_reader(BufReader::new(file))
    }

    /// Load a capture from a reader.
    pub fn load_reader<R: Read>(reader: R) -> Result<Self> {
        let capture: Capture = serde_json::from_reader(reader)?;
        Ok(Self::new(capture))
    }

    /// Load a capture from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let capture: Capture = serde_json::from_str(json)?;
        Ok(Self::new(capture))
    }

    /// The underlying capture.
    pub fn capture(&self) -> &Capture {
        &self.capture
    }

    /// Number of pages with a recorded full-page OCR result.
    pub fn recorded_ocr_pages(&self) -> usize {
        self.capture
            .pages
            .iter()
            .filter(|p| p.ocr.is_some())
            .count()
    }

    /// Number of recorded fragment OCR results.
    pub fn recorded_regions(&self) -> usize {
        self.capture.pages.iter().map(|p| p.regions.len()).sum()
    }

    fn page(&self, page: usize) -> Result<&CapturedPage> {
        self.capture
            .pages
            .get(page)
            .ok_or(Error::PageOutOfRange(page, self.capture.pages.len()))
    }
}

impl CapturedPage {
    /// Page box, falling back to the union of block boxes, then to US Letter.
    fn effective_box(&self) -> BBox {
        if let Some(page_box) = self.page_box {
            return page_box;
        }
        self.blocks
            .iter()
            .map(|b| b.bbox)
            .reduce(|a, b| BBox {
                left: a.left.min(b.left),
                top: a.top.min(b.top),
                right: a.right.max(b.right),
                bottom: a.bottom.max(b.bottom),
            })
            .unwrap_or(DEFAULT_PAGE_BOX)
    }
}

impl RenderEngine for ReplayDocument {
    fn page_count(&self) -> usize {
        self.capture.pages.len()
    }

    fn extract_native(&self, page: usize, _flags: &TextFlags) -> Result<Vec<RawBlock>> {
        Ok(self.page(page)?.blocks.clone())
    }

    fn rasterize(&self, page: usize, clip: Option<BBox>, dpi: u32) -> Result<PixelBuffer> {
        if dpi == 0 {
            return Err(Error::Render("cannot rasterize at 0 dpi".to_string()));
        }
        let captured = self.page(page)?;
        let region = clip.unwrap_or_else(|| captured.effective_box());

        let scale = dpi as f32 / 72.0;
        Ok(PixelBuffer {
            width: (region.width().abs() * scale).ceil() as u32,
            height: (region.height().abs() * scale).ceil() as u32,
            channels: 1,
            dpi,
            samples: Vec::new(),
            page,
            clip,
        })
    }

    fn table_of_contents(&self) -> Result<TableOfContents> {
        Ok(self.capture.toc.clone())
    }
}

impl OcrEngine for ReplayDocument {
    fn recognize_region(&self, clip: &PixelBuffer, _language: &str) -> Result<String> {
        let page = self.page(clip.page)?;
        let bbox = clip
            .clip
            .ok_or_else(|| Error::Ocr("region raster has no clip box".to_string()))?;

        page.regions
            .iter()
            .find(|r| r.bbox.approx_eq(&bbox, REGION_TOLERANCE))
            .map(|r| r.text.clone())
            .ok_or_else(|| {
                Error::Ocr(format!(
                    "no recorded recognition for region {:?} on page {}",
                    <[f32; 4]>::from(bbox),
                    clip.page
                ))
            })
    }

    fn recognize_page(
        &self,
        raster: &PixelBuffer,
        _language: &str,
        _flags: &TextFlags,
    ) -> Result<OcrPage> {
        self.page(raster.page)?
            .ocr
            .clone()
            .ok_or_else(|| Error::Ocr(format!("no recorded OCR for page {}", raster.page)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPTURE: &str = r#"{
        "pages": [
            {
                "blocks": [
                    {
                        "bbox": [72, 72, 300, 90],
                        "lines": [
                            {
                                "bbox": [72, 72, 300, 90],
                                "spans": [
                                    {"text": "Caf\uFFFD", "bbox": [72, 72, 120, 90], "font": "Times-Roman", "flags": 4}
                                ]
                            }
                        ]
                    }
                ],
                "regions": [ {"bbox": [72, 72, 120, 90], "text": "Café"} ]
            },
            {
                "blocks": [],
                "ocr": { "blocks": [], "text": "Scanned page" }
            }
        ],
        "toc": [ {"level": 1, "title": "Intro", "page": 1} ]
    }"#;

    #[test]
    fn test_load_capture() {
        let doc = ReplayDocument::from_json(CAPTURE).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.recorded_ocr_pages(), 1);
        assert_eq!(doc.recorded_regions(), 1);
        assert_eq!(doc.table_of_contents().unwrap().len(), 1);

        let blocks = doc.extract_native(0, &TextFlags::default()).unwrap();
        let span = &blocks[0].lines[0].spans[0];
        assert_eq!(span.text, "Caf\u{FFFD}");
        assert_eq!(span.flags, 4);
        assert_eq!(span.color, 0);
    }

    #[test]
    fn test_out_of_range_page() {
        let doc = ReplayDocument::from_json(CAPTURE).unwrap();
        let result = doc.extract_native(5, &TextFlags::default());
        assert!(matches!(result, Err(Error::PageOutOfRange(5, 2))));
    }

    #[test]
    fn test_rasterize_sizes_clip() {
        let doc = ReplayDocument::from_json(CAPTURE).unwrap();
        let clip = BBox::new(72.0, 72.0, 144.0, 90.0);
        let raster = doc.rasterize(0, Some(clip), 144).unwrap();
        assert_eq!(raster.width, 144);
        assert_eq!(raster.height, 36);
        assert_eq!(raster.clip, Some(clip));
    }

    #[test]
    fn test_rasterize_whole_page_uses_block_union() {
        let doc = ReplayDocument::from_json(CAPTURE).unwrap();
        let raster = doc.rasterize(0, None, 72).unwrap();
        assert_eq!(raster.width, 228);
        assert_eq!(raster.height, 18);

        let blank = doc.rasterize(1, None, 72).unwrap();
        assert_eq!(blank.width, 612);
    }

    #[test]
    fn test_recognize_recorded_region() {
        let doc = ReplayDocument::from_json(CAPTURE).unwrap();
        let raster = doc
            .rasterize(0, Some(BBox::new(72.2, 72.0, 120.0, 89.9)), 300)
            .unwrap();
        assert_eq!(doc.recognize_region(&raster, "eng").unwrap(), "Café");

        let other = doc
            .rasterize(0, Some(BBox::new(0.0, 0.0, 10.0, 10.0)), 300)
            .unwrap();
        assert!(matches!(
            doc.recognize_region(&other, "eng"),
            Err(Error::Ocr(_))
        ));
    }

    #[test]
    fn test_recognize_recorded_page() {
        let doc = ReplayDocument::from_json(CAPTURE).unwrap();
        let flags = TextFlags::default();

        let raster = doc.rasterize(1, None, 300).unwrap();
        assert_eq!(
            doc.recognize_page(&raster, "eng", &flags).unwrap().text,
            "Scanned page"
        );

        let raster = doc.rasterize(0, None, 300).unwrap();
        assert!(doc.recognize_page(&raster, "eng", &flags).is_err());
    }
}
