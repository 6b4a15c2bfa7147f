//! In-memory document for pipeline tests.
//!
//! Text pages are laid out on a fixed monospace grid. Redacting a page
//! removes every glyph whose center lies inside a mark, the way MuPDF does.
//! A scanned page has no text layer; its "raster" carries the page text as
//! pixel bytes so [`EchoOcr`] can read it back.

use std::cell::Cell;

use lopdf::{dictionary, Document, Object, Stream};
use pii_redactor::backend::{PageGlyphs, PageSource, RedactionSurface};
use pii_redactor::domain::Rect;
use pii_redactor::extract::{OcrEngine, OcrText, RasterImage};
use pii_redactor::{RedactorError, RedactorResult};

pub const CHAR_WIDTH: f32 = 6.0;
pub const LINE_HEIGHT: f32 = 14.0;
pub const MARGIN: f32 = 72.0;

/// Box of the char at `col` on `row` of the fake grid.
pub fn grid_rect(row: usize, col: usize) -> Rect {
    let x = MARGIN + col as f32 * CHAR_WIDTH;
    let y = MARGIN + row as f32 * LINE_HEIGHT;
    Rect::new(x, y, x + CHAR_WIDTH, y + 10.0)
}

fn grid_layout(text: &str) -> PageGlyphs {
    let mut glyphs = PageGlyphs::new();
    for (row, line) in text.split('\n').enumerate() {
        for (col, ch) in line.chars().enumerate() {
            glyphs.push(ch, grid_rect(row, col));
        }
        glyphs.end_line();
    }
    glyphs
}

#[derive(Debug, Clone)]
enum Content {
    Layer(Vec<Vec<(char, Rect)>>),
    Scanned(String),
}

/// A fake PDF implementing both backend traits.
#[derive(Debug)]
pub struct FakeDocument {
    pages: Vec<Content>,
    commits: Vec<(usize, usize)>,
    fail_commit_on: Option<usize>,
    fail_save: bool,
    saves: Cell<usize>,
}

impl FakeDocument {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            commits: Vec::new(),
            fail_commit_on: None,
            fail_save: false,
            saves: Cell::new(0),
        }
    }

    /// Adds a page with an embedded text layer, one entry per line.
    pub fn with_text_page(mut self, lines: &[&str]) -> Self {
        let lines = lines
            .iter()
            .enumerate()
            .map(|(row, line)| {
                line.chars()
                    .enumerate()
                    .map(|(col, ch)| (ch, grid_rect(row, col)))
                    .collect()
            })
            .collect();
        self.pages.push(Content::Layer(lines));
        self
    }

    /// Adds a page with no text layer whose OCR text is `text`.
    pub fn with_scanned_page(mut self, text: &str) -> Self {
        self.pages.push(Content::Scanned(text.to_string()));
        self
    }

    /// Adds a page with neither a text layer nor anything to OCR.
    pub fn with_blank_page(self) -> Self {
        self.with_scanned_page("")
    }

    /// Makes `redact_page` fail for one page.
    pub fn failing_commit_on(mut self, page_index: usize) -> Self {
        self.fail_commit_on = Some(page_index);
        self
    }

    /// Makes `save` fail.
    pub fn failing_save(mut self) -> Self {
        self.fail_save = true;
        self
    }

    /// `(page_index, marks)` for every `redact_page` call, in order.
    pub fn commits(&self) -> &[(usize, usize)] {
        &self.commits
    }

    pub fn saves(&self) -> usize {
        self.saves.get()
    }

    /// Current text layer of a page, lines joined with `'\n'`.
    pub fn page_text(&self, page_index: usize) -> String {
        match &self.pages[page_index] {
            Content::Layer(lines) => lines
                .iter()
                .map(|line| line.iter().map(|(ch, _)| *ch).collect::<String>())
                .collect::<Vec<_>>()
                .join("\n"),
            Content::Scanned(_) => String::new(),
        }
    }

    fn page(&self, page_index: usize) -> RedactorResult<&Content> {
        self.pages
            .get(page_index)
            .ok_or_else(|| RedactorError::InvalidInput {
                parameter: "page_index".to_string(),
                reason: format!("{} out of range", page_index),
            })
    }
}

impl Default for FakeDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for FakeDocument {
    fn page_count(&self) -> RedactorResult<usize> {
        Ok(self.pages.len())
    }

    fn glyphs(&self, page_index: usize) -> RedactorResult<PageGlyphs> {
        let mut glyphs = PageGlyphs::new();
        if let Content::Layer(lines) = self.page(page_index)? {
            for line in lines {
                for (ch, rect) in line {
                    glyphs.push(*ch, *rect);
                }
                glyphs.end_line();
            }
        }
        Ok(glyphs)
    }

    fn rasterize(&self, page_index: usize, dpi: u32) -> RedactorResult<RasterImage> {
        let pixels = match self.page(page_index)? {
            Content::Scanned(text) => text.as_bytes().to_vec(),
            Content::Layer(_) => Vec::new(),
        };
        Ok(RasterImage::new(pixels.len() as u32, 1, dpi, pixels))
    }
}

impl RedactionSurface for FakeDocument {
    fn redact_page(&mut self, page_index: usize, marks: &[Rect]) -> RedactorResult<()> {
        if self.fail_commit_on == Some(page_index) {
            return Err(RedactorError::PdfProcessing {
                message: "Failed to apply redactions".to_string(),
                page: Some(page_index + 1),
                source: None,
            });
        }
        self.commits.push((page_index, marks.len()));

        if let Some(Content::Layer(lines)) = self.pages.get_mut(page_index) {
            for line in lines.iter_mut() {
                line.retain(|(_, rect)| !marks.iter().any(|mark| covers_center(mark, rect)));
            }
        }
        Ok(())
    }

    fn save(&self) -> RedactorResult<Vec<u8>> {
        if self.fail_save {
            return Err(RedactorError::PdfProcessing {
                message: "Failed to save redacted PDF".to_string(),
                page: None,
                source: None,
            });
        }
        self.saves.set(self.saves.get() + 1);
        Ok(pdf_with_metadata(self.pages.len()))
    }
}

fn covers_center(mark: &Rect, glyph: &Rect) -> bool {
    let cx = (glyph.x0 + glyph.x1) / 2.0;
    let cy = (glyph.y0 + glyph.y1) / 2.0;
    cx >= mark.x0 && cx <= mark.x1 && cy >= mark.y0 && cy <= mark.y1
}

/// A minimal PDF with `pages` empty pages, an info dictionary and XMP.
pub fn pdf_with_metadata(pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (0..pages.max(1))
        .map(|_| {
            let content_id = doc.add_object(Stream::new(dictionary! {}, b"BT ET".to_vec()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
            })
            .into()
        })
        .collect();
    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let xmp_id = doc.add_object(Stream::new(
        dictionary! { "Type" => "Metadata", "Subtype" => "XML" },
        b"<x:xmpmeta><dc:creator>Jane Doe</dc:creator></x:xmpmeta>".to_vec(),
    ));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
        "Metadata" => xmp_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Intake form for Jane Doe"),
        "Author" => Object::string_literal("Front desk"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).expect("in-memory PDF should serialize");
    out
}

/// Reads a fake scanned page back from its raster.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoOcr {
    boxes: bool,
}

impl EchoOcr {
    /// Text only, no geometry.
    pub fn plain() -> Self {
        Self { boxes: false }
    }

    /// Text plus grid boxes for every char.
    pub fn with_boxes() -> Self {
        Self { boxes: true }
    }
}

impl OcrEngine for EchoOcr {
    fn recognize(&self, image: &RasterImage) -> RedactorResult<OcrText> {
        let text = String::from_utf8_lossy(image.pixels()).into_owned();
        if self.boxes {
            Ok(OcrText::from_layout(grid_layout(&text)))
        } else {
            Ok(OcrText::plain(text))
        }
    }

    fn name(&self) -> &str {
        "echo"
    }
}
