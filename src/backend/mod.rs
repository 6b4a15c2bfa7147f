//! Document backends.
//!
//! The pipeline talks to a PDF through two traits so the mapping and commit
//! logic stays independent of the rendering engine:
//!
//! - [`PageSource`]: read-only access to page text layers and rasters.
//! - [`RedactionSurface`]: irreversible per-page redaction and serialization.
//!
//! [`MupdfDocument`] implements both with MuPDF.

pub mod glyphs;
pub mod secure;

pub use self::glyphs::{Glyph, PageGlyphs};
pub use self::secure::MupdfDocument;

use crate::domain::Rect;
use crate::error::RedactorResult;
use crate::extract::ocr::RasterImage;

/// Read access to the pages of a document.
pub trait PageSource {
    fn page_count(&self) -> RedactorResult<usize>;

    /// The embedded text layer of a page with glyph geometry.
    fn glyphs(&self, page_index: usize) -> RedactorResult<PageGlyphs>;

    /// Renders a page to an RGB image at the given resolution.
    fn rasterize(&self, page_index: usize, dpi: u32) -> RedactorResult<RasterImage>;
}

/// A document that can have content removed and be written back out.
pub trait RedactionSurface: PageSource {
    /// Marks every rectangle on the page, then applies them as one commit.
    ///
    /// Text, images and vector content under the marks are removed from the
    /// page content, not covered.
    fn redact_page(&mut self, page_index: usize, marks: &[Rect]) -> RedactorResult<()>;

    /// Serializes the current state of the document.
    fn save(&self) -> RedactorResult<Vec<u8>>;
}
