//! Test fixtures and PDF builders.
//!
//! Provides builders for creating test PDFs with specific content,
//! following the Builder pattern for clean test setup.

use anyhow::Result;
use printpdf::*;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Builder for creating multi-page test PDFs, one text line per call.
///
/// Every line is written with its own text object, so PDF readers see
/// separate lines.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// # use anyhow::Result;
/// # fn main() -> Result<()> {
/// let pdf = TestPdfBuilder::new()
///     .with_title("Intake Form")
///     .with_line("Name: John Smith")
///     .with_line("SSN: 123-45-6789")
///     .new_page()
///     .with_line("MRN-55555")
///     .build(Path::new("/tmp/test.pdf"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TestPdfBuilder {
    title: String,
    pages: Vec<Vec<String>>,
    page_width: Mm,
    page_height: Mm,
}

impl TestPdfBuilder {
    /// Creates a new test PDF builder with one empty page.
    pub fn new() -> Self {
        Self {
            title: "Test Document".to_string(),
            pages: vec![Vec::new()],
            page_width: Mm(210.0),  // A4 width
            page_height: Mm(297.0), // A4 height
        }
    }

    /// Sets the document title (stored in the document info dictionary).
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Adds a line of text to the current page.
    pub fn with_line(mut self, line: &str) -> Self {
        if let Some(page) = self.pages.last_mut() {
            page.push(line.to_string());
        }
        self
    }

    /// Adds several lines to the current page.
    pub fn with_lines(self, lines: &[&str]) -> Self {
        lines.iter().fold(self, |builder, line| builder.with_line(line))
    }

    /// Starts a new page; following lines go there.
    pub fn new_page(mut self) -> Self {
        self.pages.push(Vec::new());
        self
    }

    /// Sets custom page dimensions.
    pub fn with_dimensions(mut self, width: f32, height: f32) -> Self {
        self.page_width = Mm(width);
        self.page_height = Mm(height);
        self
    }

    /// Builds the PDF and writes it to the specified path.
    pub fn build(self, output_path: &Path) -> Result<PathBuf> {
        let (doc, page1, layer1) =
            PdfDocument::new(&self.title, self.page_width, self.page_height, "Layer 1");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

        for (page_number, lines) in self.pages.iter().enumerate() {
            let layer = if page_number == 0 {
                doc.get_page(page1).get_layer(layer1)
            } else {
                let (page, layer) = doc.add_page(self.page_width, self.page_height, "Layer 1");
                doc.get_page(page).get_layer(layer)
            };

            for (row, line) in lines.iter().enumerate() {
                let y = Mm(270.0 - row as f32 * 10.0);
                layer.use_text(line.as_str(), 12.0, Mm(20.0), y, &font);
            }
        }

        doc.save(&mut BufWriter::new(fs::File::create(output_path)?))?;
        Ok(output_path.to_path_buf())
    }

    /// Builds the PDF and returns its bytes.
    pub fn build_bytes(self, dir: &Path) -> Result<Vec<u8>> {
        let path = self.build(&dir.join("fixture.pdf"))?;
        Ok(fs::read(path)?)
    }
}

impl Default for TestPdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Quick helper to create a one-page intake form.
pub fn create_intake_form(path: &Path, name: &str, ssn: &str) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .with_title(&format!("Intake form for {}", name))
        .with_line("PATIENT INTAKE FORM")
        .with_line(&format!("Name: {}", name))
        .with_line(&format!("SSN: {}", ssn))
        .with_line("Reason for visit: annual checkup")
        .build(path)
}

/// Quick helper to create a document without any sensitive values.
pub fn create_plain_document(path: &Path) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .with_title("Meeting notes")
        .with_line("Meeting notes")
        .with_line("Nothing sensitive is recorded here.")
        .build(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builder_pattern() {
        let builder = TestPdfBuilder::new()
            .with_title("Test")
            .with_line("one")
            .new_page()
            .with_lines(&["two", "three"]);

        assert_eq!(builder.title, "Test");
        assert_eq!(builder.pages.len(), 2);
        assert_eq!(builder.pages[1].len(), 2);
    }

    #[test]
    fn test_create_intake_form() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let pdf_path = temp_dir.path().join("intake.pdf");

        create_intake_form(&pdf_path, "John Smith", "123-45-6789")?;

        assert!(pdf_path.exists());
        Ok(())
    }
}
