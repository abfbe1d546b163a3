//! End-to-end tests for quote-sheets-xlsx.
//!
//! Each test builds a small macro-enabled workbook in memory (see
//! [`common::quote_template`]), opens it with `XlsxDocument`, edits it and
//! inspects the saved package part by part.

mod common;
mod editing;
mod opening;

pub use common::*;
