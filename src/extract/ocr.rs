//! OCR collaborators.
//!
//! OCR is only consulted for pages without an embedded text layer. The
//! engine is opaque to the pipeline: an RGB image goes in, text comes out,
//! optionally with word geometry so offsets can be mapped back to the page.

use std::collections::BTreeMap;
use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::backend::PageGlyphs;
use crate::domain::Rect;
use crate::error::{RedactorError, RedactorResult};

/// A rendered page, tightly packed 8-bit RGB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    dpi: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, dpi: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            dpi,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Encodes the image as binary PPM (P6).
    pub fn to_ppm(&self) -> Vec<u8> {
        let mut out = format!("P6\n{} {}\n255\n", self.width, self.height).into_bytes();
        out.extend_from_slice(&self.pixels);
        out
    }
}

/// Text read from a page image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrText {
    pub text: String,
    /// Page-space boxes for every char of `text`, or empty when the engine
    /// reports no geometry.
    pub layout: PageGlyphs,
}

impl OcrText {
    /// Text without geometry.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            layout: PageGlyphs::new(),
        }
    }

    /// Text taken from a glyph layout, so every char has a position.
    pub fn from_layout(layout: PageGlyphs) -> Self {
        Self {
            text: layout.text(),
            layout,
        }
    }
}

/// Reads text from a page image.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &RasterImage) -> RedactorResult<OcrText>;

    /// Returns a human-readable name for this engine.
    fn name(&self) -> &str;
}

/// Engine that never finds text, for text-layer-only processing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOcr;

impl OcrEngine for NoOcr {
    fn recognize(&self, _image: &RasterImage) -> RedactorResult<OcrText> {
        Ok(OcrText::default())
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Runs the `tesseract` command-line tool, image on stdin, TSV on stdout.
///
/// Word boxes from the TSV are split evenly across the word's chars.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: String,
    language: String,
}

impl TesseractOcr {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            binary: "tesseract".to_string(),
            language: language.into(),
        }
    }

    /// Uses a specific tesseract executable.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new("eng")
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &RasterImage) -> RedactorResult<OcrText> {
        let mut child = Command::new(&self.binary)
            .args(["stdin", "stdout", "-l", self.language.as_str(), "--dpi"])
            .arg(image.dpi().to_string())
            .arg("tsv")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RedactorError::Ocr {
                reason: format!("cannot run '{}': {}", self.binary, e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&image.to_ppm())
                .map_err(|e| RedactorError::Ocr {
                    reason: format!("cannot send image to '{}': {}", self.binary, e),
                })?;
        }

        let output = child.wait_with_output().map_err(|e| RedactorError::Ocr {
            reason: format!("'{}' did not finish: {}", self.binary, e),
        })?;

        if !output.status.success() {
            return Err(RedactorError::Ocr {
                reason: format!(
                    "'{}' exited with {}: {}",
                    self.binary,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        let layout = layout_from_tsv(&tsv, 72.0 / image.dpi() as f32);
        debug!(engine = "tesseract", chars = layout.len(), "page recognized");
        Ok(OcrText::from_layout(layout))
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}

/// Builds a glyph layout from Tesseract TSV output.
///
/// Only word rows (level 5) are used. Pixel boxes are multiplied by `scale`
/// to get page coordinates. Lines keep the engine's block/paragraph order.
pub fn layout_from_tsv(tsv: &str, scale: f32) -> PageGlyphs {
    let mut lines: BTreeMap<(u32, u32, u32), Vec<(Rect, &str)>> = BTreeMap::new();

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 || cols[0] != "5" {
            continue;
        }
        let text = cols[11].trim();
        let nums: Option<Vec<f32>> = cols[6..10].iter().map(|c| c.parse().ok()).collect();
        let key: Option<Vec<u32>> = cols[2..5].iter().map(|c| c.parse().ok()).collect();
        let (Some(nums), Some(key)) = (nums, key) else {
            continue;
        };
        if text.is_empty() {
            continue;
        }

        let (left, top, width, height) = (nums[0], nums[1], nums[2], nums[3]);
        let bbox = Rect::new(
            left * scale,
            top * scale,
            (left + width) * scale,
            (top + height) * scale,
        );
        lines.entry((key[0], key[1], key[2])).or_default().push((bbox, text));
    }

    let mut layout = PageGlyphs::new();
    for words in lines.values() {
        let mut previous: Option<Rect> = None;
        for (bbox, word) in words {
            if let Some(prev) = previous {
                let gap = Rect::new(
                    prev.x1,
                    bbox.y0.min(prev.y0),
                    bbox.x0.max(prev.x1),
                    bbox.y1.max(prev.y1),
                );
                layout.push(' ', gap);
            }
            let chars: Vec<char> = word.chars().collect();
            let step = bbox.width() / chars.len() as f32;
            for (i, ch) in chars.into_iter().enumerate() {
                let x0 = bbox.x0 + step * i as f32;
                layout.push(ch, Rect::new(x0, bbox.y0, x0 + step, bbox.y1));
            }
            previous = Some(*bbox);
        }
        layout.end_line();
    }
    layout
}
