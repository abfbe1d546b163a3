//! Package-level errors

use std::path::PathBuf;

use thiserror::Error;

pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Failures while opening, editing or saving an `.xlsx` / `.xlsm` package
#[derive(Debug, Error)]
pub enum XlsxError {
    #[error("workbook not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The file is not a readable zip archive
    #[error("not a zip package: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The archive is a zip but does not look like a workbook
    #[error("not a workbook package: {0}")]
    InvalidFormat(String),

    /// A relationship points at a part absent from the archive
    #[error("package part {0} is missing")]
    MissingPart(String),

    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),

    /// Attribute or text content that does not hold the expected value
    #[error("unexpected content: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] quote_sheets_core::Error),
}
