//! Sheet model errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while addressing or editing the in-memory workbook
#[derive(Debug, Error)]
pub enum Error {
    /// A1 reference that could not be parsed
    #[error("'{0}' is not a valid cell reference")]
    InvalidAddress(String),

    #[error("'{0}' is not a valid cell range")]
    InvalidRange(String),

    /// Row index (0-based) past the last row a sheet can hold
    #[error("row {0} is beyond the last sheet row ({1})")]
    RowOutOfBounds(u32, u32),

    #[error("column {0} is beyond the last sheet column ({1})")]
    ColumnOutOfBounds(u16, u16),

    #[error("no sheet named '{0}'")]
    SheetNotFound(String),

    /// Empty, too long, or containing a character forbidden in sheet names
    #[error("'{0}' cannot be used as a sheet name")]
    InvalidSheetName(String),

    #[error("a sheet named '{0}' already exists")]
    DuplicateSheetName(String),

    /// `s` attribute pointing past the end of `cellXfs`
    #[error("style {0} is not defined in the workbook")]
    InvalidStyleIndex(u32),
}
