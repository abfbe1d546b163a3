//! Cell-related types
//!
//! - [`CellValue`] - The value stored in a cell
//! - [`CellAddress`] / [`CellRange`] - A1-style locations
//! - [`CellData`] - Value plus style index
//! - [`CellStorage`] - Sparse row-major storage with row insertion

mod address;
mod storage;
mod value;

pub use address::{CellAddress, CellRange};
pub use storage::{CellData, CellStorage};
pub use value::{CellError, CellValue, FormulaKind};
