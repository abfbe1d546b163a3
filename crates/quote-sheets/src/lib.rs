//! # quote-sheets
//!
//! Fill a spreadsheet quote template (`.xlsx` / `.xlsm`) from a JSON request.
//!
//! A fill does four things to a copy of the template:
//! - writes the client/contact/project fields on the metadata sheet
//!   ([`fields`])
//! - grows the single template row of the line-items table to one row per
//!   item, copying its styles and literal content ([`expand`])
//! - writes each item's label, reference, quantity, description and
//!   dimensions ([`line_items`])
//! - saves the workbook with its VBA project and every untouched part intact
//!
//! Formulas in the template row are copied verbatim. A copied `=C8*E8`
//! still points at row 8; the workbook is flagged for a full recalculation
//! on open, but references are never rewritten.
//!
//! ## Example
//!
//! ```no_run
//! use quote_sheets::{QuoteFiller, QuoteRequest};
//!
//! let request = QuoteRequest::from_json(
//!     r#"{"templatePath": "modele.xlsm", "outputPath": "Q1.xlsm",
//!         "quoteData": {"quoteNumber": "Q1", "items": [{"material": "Steel"}]}}"#,
//! )?;
//! let summary = QuoteFiller::default().fill(&request)?;
//! assert_eq!(summary.items_written, 1);
//! # Ok::<(), quote_sheets::QuoteError>(())
//! ```

pub mod error;
pub mod expand;
pub mod fields;
pub mod layout;
pub mod line_items;
pub mod pipeline;
pub mod request;
pub mod response;

pub use error::{QuoteError, Result};
pub use layout::{FieldRows, TemplateLayout};
pub use pipeline::{FillSummary, QuoteFiller};
pub use request::{Client, Contact, FieldValue, LineItem, QuoteData, QuoteRequest};
pub use response::Response;
