//! Built-in recognizers for identifiers common in medical and legal forms.

use super::phone::PhoneRecognizer;
use super::recognizer::{Pattern, PatternRecognizer, Recognizer};
use crate::error::RedactorResult;

/// Builds the default recognizer list.
pub fn default_recognizers() -> RedactorResult<Vec<Box<dyn Recognizer>>> {
    Ok(vec![
        Box::new(PatternRecognizer::new(
            "US_SSN",
            vec![Pattern::new("ssn", r"\b\d{3}-\d{2}-\d{4}\b", 0.85)?],
        )),
        Box::new(PatternRecognizer::new(
            "MEDICAL_RECORD",
            vec![Pattern::new("mrn", r"\bMRN[- ]?\d{5,}\b", 0.85)?],
        )),
        Box::new(PatternRecognizer::new(
            "DEVICE_ID",
            vec![Pattern::new(
                "device_id",
                r"\b[A-Z0-9]{4}-[A-Z0-9]{4}-[A-Z0-9]{4}\b",
                0.85,
            )?],
        )),
        Box::new(PatternRecognizer::new(
            "LICENSE_PLATE",
            vec![Pattern::new("plate", r"\b[A-Z]{3}-\d{3,4}\b", 0.85)?],
        )),
        Box::new(PatternRecognizer::new(
            "FULL_ADDRESS",
            vec![
                Pattern::new(
                    "address_with_zip",
                    r"\d{1,5} [\w\s]{3,},? [A-Z]{2} \d{5}",
                    0.8,
                )?,
                Pattern::new("address_without_zip", r"\d{1,5} [\w\s]{3,},? [A-Z]{2}", 0.7)?,
                Pattern::new("street_address", r"\d{1,5} [\w\s]{3,}", 0.6)?,
                Pattern::new("postal_code", r"\b[A-Z]{2} \d{5}\b", 0.8)?,
                Pattern::new("postal_code_alt", r"\b\d{5}\b", 0.6)?,
            ],
        )),
        Box::new(PatternRecognizer::new(
            "POSTAL_CODE",
            vec![
                Pattern::new("us_zip", r"\b[A-Z]{2} \d{5}\b", 0.8)?,
                Pattern::new("us_zip_alt", r"\b\d{5}\b", 0.6)?,
                Pattern::new("canada_postal", r"\b[A-Z]\d[A-Z] \d[A-Z]\d\b", 0.8)?,
            ],
        )),
        Box::new(PatternRecognizer::new(
            "EMAIL_ADDRESS",
            vec![Pattern::new(
                "email",
                r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
                0.9,
            )?],
        )),
        Box::new(PhoneRecognizer::new()),
    ])
}
