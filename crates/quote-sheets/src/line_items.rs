//! Per-item data in the line-items table

use quote_sheets_core::{CellValue, Worksheet};
use tracing::debug;

use crate::error::Result;
use crate::request::{FieldValue, LineItem};

// 0-based columns written for every item; the rest of the row is left alone
const COL_LABEL: u16 = 0;
const COL_REFERENCE: u16 = 1;
const COL_QUANTITY: u16 = 2;
const COL_DESCRIPTION: u16 = 3;
const COL_LENGTH: u16 = 4;
const COL_WIDTH: u16 = 5;
const COL_THICKNESS: u16 = 6;

/// The seven cells written for item `index` (0-based), as (column, value)
pub fn item_cells(index: usize, item: &LineItem, quote_number: &FieldValue) -> [(u16, CellValue); 7] {
    let n = index + 1;
    [
        (COL_LABEL, CellValue::String(format!("L{}", n))),
        (COL_REFERENCE, CellValue::String(format!("{} - {}", quote_number, n))),
        (COL_QUANTITY, item.quantity.clone().into()),
        (COL_DESCRIPTION, CellValue::String(item.description())),
        (COL_LENGTH, item.length.clone().into()),
        (COL_WIDTH, item.width.clone().into()),
        (COL_THICKNESS, item.thickness.clone().into()),
    ]
}

/// Write every item on its own row, starting at `start_row` (1-based).
///
/// Overwritten cells keep the style the row already had.
pub fn write_items(
    sheet: &mut Worksheet,
    start_row: u32,
    items: &[LineItem],
    quote_number: &FieldValue,
) -> Result<()> {
    let first = start_row.saturating_sub(1);
    for (index, item) in items.iter().enumerate() {
        let row = first.saturating_add(u32::try_from(index).unwrap_or(u32::MAX));
        for (col, value) in item_cells(index, item, quote_number) {
            sheet.set_cell_value_at(row, col, value)?;
        }
    }
    debug!(sheet = sheet.name(), count = items.len(), "line items written");
    Ok(())
}
