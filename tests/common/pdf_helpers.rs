//! PDF inspection helpers.
//!
//! Text is read back with `pdf-extract`, independently of the MuPDF code
//! under test; structure and metadata are read with `lopdf`.

use anyhow::Result;
use lopdf::Document;
use std::path::Path;

/// Extracts text from PDF bytes, returning an error instead of panicking.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| anyhow::anyhow!("Failed to extract text: {}", e))
}

/// Extracts text from a PDF file.
pub fn extract_text_from_file(pdf_path: &Path) -> Result<String> {
    extract_text(&std::fs::read(pdf_path)?)
}

/// Counts occurrences of a pattern in a PDF.
pub fn count_pattern(bytes: &[u8], pattern: &str) -> Result<usize> {
    Ok(extract_text(bytes)?.matches(pattern).count())
}

/// True when the trailer still references a document info dictionary.
pub fn has_info_dictionary(bytes: &[u8]) -> Result<bool> {
    let doc = Document::load_mem(bytes)?;
    Ok(doc.trailer.get(b"Info").is_ok())
}

/// True when the catalog still references an XMP metadata stream.
pub fn has_xmp_metadata(bytes: &[u8]) -> Result<bool> {
    let doc = Document::load_mem(bytes)?;
    let root = doc.trailer.get(b"Root")?.as_reference()?;
    Ok(doc.get_dictionary(root)?.get(b"Metadata").is_ok())
}

/// Number of pages according to lopdf.
pub fn page_count(bytes: &[u8]) -> Result<usize> {
    Ok(Document::load_mem(bytes)?.get_pages().len())
}

/// Validates that a PDF is loadable and has basic structure.
pub fn is_valid_pdf(bytes: &[u8]) -> bool {
    Document::load_mem(bytes).is_ok()
}
