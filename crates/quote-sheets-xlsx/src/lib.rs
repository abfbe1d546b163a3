//! # quote-sheets-xlsx
//!
//! In-place editing of existing XLSX/XLSM packages for quote-sheets.
//!
//! Unlike a writer that rebuilds a workbook from scratch, [`XlsxDocument`]
//! keeps the original package and only regenerates the worksheets you touch.
//! Parts this crate does not understand (VBA projects, drawings, printer
//! settings, custom XML) go back into the archive unchanged.

mod document;
pub mod error;
mod package;
mod reader;
mod shared_strings;
mod styles;
mod writer;

pub use document::XlsxDocument;
pub use error::{XlsxError, XlsxResult};
