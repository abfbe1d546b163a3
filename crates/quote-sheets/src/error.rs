//! Error types for filling quote templates

use std::path::PathBuf;

use quote_sheets_xlsx::XlsxError;
use thiserror::Error;

/// Result type for quote operations
pub type Result<T> = std::result::Result<T, QuoteError>;

/// Everything that can stop a fill.
///
/// The `Display` text is what ends up in the `{"error": ...}` response.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Nothing on stdin
    #[error("Empty input")]
    EmptyInput,

    /// Request is not valid JSON or does not match the request model
    #[error("Invalid JSON input: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// `templatePath`, `outputPath` or `quoteData` absent or empty
    #[error("Missing required arguments: templatePath, outputPath, quoteData")]
    MissingArguments,

    /// Template path does not exist
    #[error("Template file not found at {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// Copying the template to the output path failed
    #[error("Failed to create output file: {0}")]
    CopyFailed(#[source] std::io::Error),

    /// A mandatory sheet is missing from the template
    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),

    /// Layout file unreadable or inconsistent
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// Spreadsheet model error (row limit exceeded, ...)
    #[error("Error processing Excel: {0}")]
    Sheet(#[from] quote_sheets_core::Error),

    /// Opening, reading or saving the workbook failed
    #[error("Error processing Excel: {0}")]
    Workbook(#[from] XlsxError),
}
