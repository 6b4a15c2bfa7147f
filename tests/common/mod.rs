//! Common test utilities and helpers.
//!
//! This module provides shared functionality for all tests, including:
//! - Custom assertions
//! - Test fixtures and builders
//! - PDF inspection helpers
//! - An in-memory document for pipeline tests without MuPDF

#![allow(dead_code)]

pub mod assertions;
pub mod fake_document;
pub mod fixtures;
pub mod pdf_helpers;

pub use assertions::*;
pub use fake_document::*;
pub use fixtures::*;
pub use pdf_helpers::*;
