//! Page text extraction with OCR fallback.
//!
//! Each page contributes the best text available: its embedded text layer
//! when that holds any text, otherwise whatever OCR reads from a raster of
//! the page. A page that fails either way contributes empty text; it never
//! aborts the document.

pub mod ocr;

pub use ocr::{layout_from_tsv, NoOcr, OcrEngine, OcrText, RasterImage, TesseractOcr};

use serde::Serialize;
use tracing::{debug, warn};

use crate::backend::{PageGlyphs, PageSource};
use crate::domain::FlattenedText;
use crate::error::RedactorResult;

/// Where a page's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextOrigin {
    TextLayer,
    Ocr,
    /// Neither source produced any text.
    Empty,
}

/// Extracted text of one page.
#[derive(Debug, Clone)]
pub struct PageText {
    pub page_index: usize,
    /// Page text without the separator newline.
    pub text: String,
    pub origin: TextOrigin,
    /// Geometry for every char of `text`: the embedded text layer, or the
    /// OCR engine's word boxes. Empty when OCR reported no geometry.
    pub layout: PageGlyphs,
}

/// All pages of a document plus their flattened text.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pages: Vec<PageText>,
    flattened: FlattenedText,
}

impl ExtractedDocument {
    pub fn new(pages: Vec<PageText>) -> Self {
        let flattened = FlattenedText::from_pages(pages.iter().map(|p| p.text.as_str()));
        Self { pages, flattened }
    }

    pub fn pages(&self) -> &[PageText] {
        &self.pages
    }

    pub fn page(&self, page_index: usize) -> Option<&PageText> {
        self.pages.get(page_index)
    }

    pub fn flattened(&self) -> &FlattenedText {
        &self.flattened
    }

    /// Indices of pages whose text came from OCR.
    pub fn ocr_pages(&self) -> Vec<usize> {
        self.pages
            .iter()
            .filter(|p| p.origin == TextOrigin::Ocr)
            .map(|p| p.page_index)
            .collect()
    }
}

/// Chooses between text layer and OCR for every page.
pub struct PageTextExtractor<'a> {
    ocr: &'a dyn OcrEngine,
    dpi: u32,
}

impl<'a> PageTextExtractor<'a> {
    pub fn new(ocr: &'a dyn OcrEngine, dpi: u32) -> Self {
        Self { ocr, dpi }
    }

    /// Extracts every page. Only failing to count pages is an error.
    pub fn extract<S>(&self, source: &S) -> RedactorResult<ExtractedDocument>
    where
        S: PageSource + ?Sized,
    {
        let count = source.page_count()?;
        let pages = (0..count)
            .map(|page_index| self.extract_page(source, page_index))
            .collect();
        Ok(ExtractedDocument::new(pages))
    }

    /// Best-effort text of one page.
    pub fn extract_page<S>(&self, source: &S, page_index: usize) -> PageText
    where
        S: PageSource + ?Sized,
    {
        let layout = source.glyphs(page_index).unwrap_or_else(|err| {
            warn!(page = page_index + 1, error = %err, "text layer unreadable");
            PageGlyphs::new()
        });

        if layout.has_text() {
            return PageText {
                page_index,
                text: layout.text(),
                origin: TextOrigin::TextLayer,
                layout,
            };
        }

        debug!(
            page = page_index + 1,
            engine = self.ocr.name(),
            dpi = self.dpi,
            "no text layer, running OCR"
        );
        let ocr = source
            .rasterize(page_index, self.dpi)
            .and_then(|image| self.ocr.recognize(&image))
            .unwrap_or_else(|err| {
                warn!(page = page_index + 1, error = %err, "OCR failed");
                OcrText::default()
            });

        if ocr.text.trim().is_empty() {
            return PageText {
                page_index,
                text: String::new(),
                origin: TextOrigin::Empty,
                layout: PageGlyphs::new(),
            };
        }

        // Geometry must describe exactly the recognized chars to be usable for offsets.
        let layout = if ocr.layout.text() == ocr.text {
            ocr.layout
        } else {
            PageGlyphs::new()
        };

        PageText {
            page_index,
            text: ocr.text,
            origin: TextOrigin::Ocr,
            layout,
        }
    }
}
