//! Line-item row expansion
//!
//! The line-items table ships with a single template row. For N items the
//! template row is kept as the first row and N-1 copies are inserted right
//! below it. Each copy gets the template's style indices and its literal
//! content. Formula text is copied as-is: a formula that names the template
//! row (`=C8*E8`) names that same row in every copy.

use quote_sheets_core::{Error as SheetError, Worksheet, MAX_ROWS};
use tracing::debug;

use crate::error::Result;

/// Grow the block starting at `template_row` (1-based) to `item_count` rows.
///
/// Returns the number of inserted rows. Nothing happens for zero or one item.
pub fn expand(sheet: &mut Worksheet, template_row: u32, item_count: usize) -> Result<u32> {
    if item_count <= 1 {
        return Ok(0);
    }

    let template = template_row.saturating_sub(1);
    let inserted = u32::try_from(item_count - 1).unwrap_or(u32::MAX);
    let last_row = sheet
        .used_range()
        .map_or(template, |range| range.end.row.max(template));
    if u64::from(last_row) + u64::from(inserted) >= u64::from(MAX_ROWS) {
        return Err(SheetError::RowOutOfBounds(last_row.saturating_add(inserted), MAX_ROWS - 1).into());
    }

    sheet.insert_rows(template + 1, inserted);

    // Copy span is the widest populated column anywhere on the sheet
    if let Some(last_col) = sheet.max_column() {
        for offset in 1..=inserted {
            sheet.copy_row_format(template, template + offset, last_col)?;
        }
    }

    debug!(
        sheet = sheet.name(),
        template_row,
        inserted,
        "line-item rows inserted"
    );
    Ok(inserted)
}
