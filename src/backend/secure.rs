//! Secure MuPDF backend.
//!
//! Reads glyph geometry through MuPDF's structured text, renders pages for
//! OCR, and physically removes content with MuPDF's redaction API
//! (`pdf_redact_page`), so redacted text cannot be recovered.

use mupdf::pdf::{PdfAnnotationType, PdfDocument, PdfPage};
use mupdf::{Colorspace, Matrix, Page, Quad, Rect as MuRect, TextPageOptions};
use tracing::debug;

use super::{PageGlyphs, PageSource, RedactionSurface};
use crate::domain::Rect;
use crate::error::{RedactorError, RedactorResult};
use crate::extract::ocr::RasterImage;

const BACKEND: &str = "MuPDF";

/// A PDF opened in memory with MuPDF.
pub struct MupdfDocument {
    inner: PdfDocument,
}

impl MupdfDocument {
    /// Opens a PDF from bytes. The bytes are copied; the caller's buffer is
    /// never modified.
    pub fn from_bytes(bytes: &[u8]) -> RedactorResult<Self> {
        let inner = PdfDocument::from_bytes(bytes).map_err(|e| RedactorError::PdfProcessing {
            message: "Failed to open PDF with MuPDF".to_string(),
            page: None,
            source: Some(Box::new(e)),
        })?;
        Ok(Self { inner })
    }

    fn load_page(&self, page_index: usize) -> RedactorResult<Page> {
        let index = i32::try_from(page_index).map_err(|_| RedactorError::InvalidInput {
            parameter: "page_index".to_string(),
            reason: format!("{} exceeds the MuPDF page range", page_index),
        })?;

        self.inner
            .load_page(index)
            .map_err(|e| RedactorError::PdfProcessing {
                message: format!("Failed to load page {}", page_index + 1),
                page: Some(page_index + 1),
                source: Some(Box::new(e)),
            })
    }
}

fn rect_from_quad(quad: &Quad) -> Rect {
    Rect {
        x0: quad.ul.x.min(quad.ll.x).min(quad.ur.x).min(quad.lr.x),
        y0: quad.ul.y.min(quad.ll.y).min(quad.ur.y).min(quad.lr.y),
        x1: quad.ul.x.max(quad.ll.x).max(quad.ur.x).max(quad.lr.x),
        y1: quad.ul.y.max(quad.ll.y).max(quad.ur.y).max(quad.lr.y),
    }
}

impl PageSource for MupdfDocument {
    fn page_count(&self) -> RedactorResult<usize> {
        let count = self
            .inner
            .page_count()
            .map_err(|e| RedactorError::backend(BACKEND, "Failed to get page count", e))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn glyphs(&self, page_index: usize) -> RedactorResult<PageGlyphs> {
        let page = self.load_page(page_index)?;
        let text_page = page
            .to_text_page(TextPageOptions::empty())
            .map_err(|e| RedactorError::TextExtraction {
                page: page_index + 1,
                reason: e.to_string(),
            })?;

        let mut glyphs = PageGlyphs::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                for ch in line.chars() {
                    if let Some(c) = ch.char() {
                        glyphs.push(c, rect_from_quad(&ch.quad()));
                    }
                }
                glyphs.end_line();
            }
        }

        debug!(page = page_index + 1, chars = glyphs.len(), "text layer read");
        Ok(glyphs)
    }

    fn rasterize(&self, page_index: usize, dpi: u32) -> RedactorResult<RasterImage> {
        let page = self.load_page(page_index)?;
        let scale = dpi as f32 / 72.0;
        let pixmap = page
            .to_pixmap(&Matrix::new_scale(scale, scale), &Colorspace::device_rgb(), false, true)
            .map_err(|e| RedactorError::PdfProcessing {
                message: format!("Failed to render page {} at {} DPI", page_index + 1, dpi),
                page: Some(page_index + 1),
                source: Some(Box::new(e)),
            })?;

        let width = pixmap.width() as usize;
        let height = pixmap.height() as usize;
        let components = pixmap.n() as usize;
        let stride = pixmap.stride() as usize;
        let samples = pixmap.samples();

        let mut rgb = Vec::with_capacity(width * height * 3);
        for row in 0..height {
            for col in 0..width {
                let at = row * stride + col * components;
                let pixel = samples.get(at..at + components).ok_or_else(|| {
                    RedactorError::PdfProcessing {
                        message: "Rendered pixmap is shorter than its dimensions".to_string(),
                        page: Some(page_index + 1),
                        source: None,
                    }
                })?;
                match pixel {
                    [gray] | [gray, _] => rgb.extend_from_slice(&[*gray, *gray, *gray]),
                    [r, g, b, ..] => rgb.extend_from_slice(&[*r, *g, *b]),
                    [] => rgb.extend_from_slice(&[255, 255, 255]),
                }
            }
        }

        Ok(RasterImage::new(width as u32, height as u32, dpi, rgb))
    }
}

impl RedactionSurface for MupdfDocument {
    fn redact_page(&mut self, page_index: usize, marks: &[Rect]) -> RedactorResult<()> {
        if marks.is_empty() {
            return Ok(());
        }

        let page = self.load_page(page_index)?;
        let mut pdf_page = PdfPage::try_from(page).map_err(|_| RedactorError::PdfProcessing {
            message: "Page is not a PDF page".to_string(),
            page: Some(page_index + 1),
            source: None,
        })?;

        for mark in marks {
            let annot = pdf_page
                .create_annotation(PdfAnnotationType::Redact)
                .map_err(|e| RedactorError::PdfProcessing {
                    message: "Failed to create redaction annotation".to_string(),
                    page: Some(page_index + 1),
                    source: Some(Box::new(e)),
                })?;

            let rect = MuRect {
                x0: mark.x0,
                y0: mark.y0,
                x1: mark.x1,
                y1: mark.y1,
            };
            unsafe {
                ffi::set_annotation_rect(&annot, rect);
            }
        }

        pdf_page
            .redact()
            .map_err(|e| RedactorError::PdfProcessing {
                message: format!("Failed to apply redactions on page {}", page_index + 1),
                page: Some(page_index + 1),
                source: Some(Box::new(e)),
            })?;

        debug!(page = page_index + 1, marks = marks.len(), "redactions applied");
        Ok(())
    }

    fn save(&self) -> RedactorResult<Vec<u8>> {
        let scratch = tempfile::Builder::new()
            .prefix("pii-redactor-")
            .suffix(".pdf")
            .tempfile()
            .map_err(|e| RedactorError::backend("std::io", "Failed to create scratch file", e))?;

        let path = scratch
            .path()
            .to_str()
            .ok_or_else(|| RedactorError::InvalidInput {
                parameter: "scratch path".to_string(),
                reason: "Path contains invalid UTF-8".to_string(),
            })?;

        self.inner
            .save(path)
            .map_err(|e| RedactorError::PdfProcessing {
                message: "Failed to save redacted PDF".to_string(),
                page: None,
                source: Some(Box::new(e)),
            })?;

        std::fs::read(scratch.path()).map_err(|e| RedactorError::Io {
            path: scratch.path().to_path_buf(),
            source: e,
        })
    }
}

/// FFI helpers for MuPDF annotation operations.
mod ffi {
    use mupdf::pdf::PdfAnnotation;
    use mupdf::Rect;

    /// Sets the rectangle of a redaction annotation via FFI.
    ///
    /// # Safety
    /// This function uses unsafe FFI calls to access MuPDF's C API.
    /// The annotation must be valid and the context properly initialized.
    pub unsafe fn set_annotation_rect(annot: &PdfAnnotation, rect: Rect) {
        #[repr(C)]
        struct PdfAnnotRaw {
            inner: *mut mupdf_sys::pdf_annot,
        }

        let annot_raw = std::mem::transmute::<&PdfAnnotation, &PdfAnnotRaw>(annot);
        let ctx = mupdf_sys::mupdf_new_base_context();

        if !ctx.is_null() {
            let fz_rect = mupdf_sys::fz_rect {
                x0: rect.x0,
                y0: rect.y0,
                x1: rect.x1,
                y1: rect.y1,
            };

            mupdf_sys::pdf_set_annot_rect(ctx, annot_raw.inner, fz_rect);
            mupdf_sys::mupdf_drop_base_context(ctx);
        }
    }
}
