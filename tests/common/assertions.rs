//! Custom assertions for PDF redaction testing.
//!
//! Provides domain-specific assertions that make tests more readable
//! and provide better error messages.

use super::pdf_helpers::{extract_text, has_info_dictionary, has_xmp_metadata, is_valid_pdf};

/// Asserts that a value has been removed from a PDF's text.
///
/// # Panics
/// Panics if the value is still found in the PDF text.
pub fn assert_redacted(bytes: &[u8], value: &str) {
    let text = extract_text_or_panic(bytes);
    assert!(
        !text.contains(value),
        "'{}' should be redacted but was found in output PDF.\nExtracted text length: {} chars",
        value,
        text.len()
    );
}

/// Asserts that a value is still present in a PDF's text.
///
/// # Panics
/// Panics if the value is not found in the PDF.
pub fn assert_preserved(bytes: &[u8], value: &str) {
    let text = extract_text_or_panic(bytes);
    assert!(
        text.contains(value),
        "'{}' should be preserved but was not found in PDF text:\n{}",
        value,
        text
    );
}

/// Asserts that several values are all removed.
///
/// # Panics
/// Panics if any value is found in the PDF.
pub fn assert_all_redacted(bytes: &[u8], values: &[&str]) {
    let text = extract_text_or_panic(bytes);
    let found: Vec<&str> = values.iter().copied().filter(|v| text.contains(v)).collect();

    assert!(
        found.is_empty(),
        "The following values should be redacted but were found: {:?}",
        found
    );
}

/// Asserts that neither an info dictionary nor XMP metadata remain.
///
/// # Panics
/// Panics if either kind of metadata is still referenced.
pub fn assert_metadata_cleared(bytes: &[u8]) {
    assert!(is_valid_pdf(bytes), "output should be a loadable PDF");
    assert!(
        !has_info_dictionary(bytes).expect("PDF should load"),
        "trailer /Info should be removed"
    );
    assert!(
        !has_xmp_metadata(bytes).expect("PDF should load"),
        "catalog /Metadata should be removed"
    );
}

fn extract_text_or_panic(bytes: &[u8]) -> String {
    extract_text(bytes).unwrap_or_else(|e| panic!("Failed to extract text from PDF: {}", e))
}
