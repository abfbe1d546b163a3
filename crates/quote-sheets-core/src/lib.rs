//! # quote-sheets-core
//!
//! In-memory spreadsheet model used by quote-sheets.
//!
//! This crate provides the types the template filler works on:
//! - [`CellValue`] - Cell content (numbers, strings, booleans, errors, formulas)
//! - [`CellAddress`] and [`CellRange`] - A1-style addressing
//! - [`Style`] and [`StyleTable`] - Resolved cell formatting, indexed like the
//!   workbook's style records
//! - [`Workbook`], [`Worksheet`] - Sheets with sparse cell storage and row insertion
//!
//! ## Example
//!
//! ```rust
//! use quote_sheets_core::{CellValue, Worksheet};
//!
//! let mut sheet = Worksheet::new("Cotation");
//! sheet.set_cell_value("A8", "L1").unwrap();
//! sheet.set_cell_formula("H8", "=C8*E8").unwrap();
//!
//! // Two blank rows below row 8 (0-based index 7)
//! sheet.insert_rows(8, 2);
//! assert_eq!(sheet.get_value_at(7, 0), CellValue::string("L1"));
//! assert!(sheet.get_value_at(8, 0).is_empty());
//! ```

pub mod cell;
pub mod error;
pub mod row;
pub mod style;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{CellAddress, CellData, CellError, CellRange, CellStorage, CellValue, FormulaKind};
pub use error::{Error, Result};
pub use row::RowProperties;
pub use workbook::Workbook;
pub use worksheet::Worksheet;

// Re-export all style types for convenience
pub use style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    HorizontalAlignment, NumberFormat, Protection, Style, StyleTable, VerticalAlignment,
};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
