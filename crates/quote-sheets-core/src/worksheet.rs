//! Worksheet type

use crate::cell::{CellAddress, CellData, CellRange, CellStorage, CellValue};
use crate::error::{Error, Result};
use crate::row::RowProperties;
use crate::{MAX_COLS, MAX_ROWS};

/// A worksheet (single sheet in a workbook)
///
/// Cells carry style indices into the owning workbook's
/// [`StyleTable`](crate::StyleTable); the sheet itself never resolves them.
#[derive(Debug, Clone)]
pub struct Worksheet {
    name: String,
    cells: CellStorage,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
        }
    }

    /// Create a worksheet around cells that were already loaded
    pub fn from_storage<S: Into<String>>(name: S, cells: CellStorage) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw cell storage
    pub fn storage(&self) -> &CellStorage {
        &self.cells
    }

    // === Cell Access ===

    /// Get a cell by address string (e.g., "C7")
    pub fn cell(&self, address: &str) -> Result<Option<&CellData>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cells.get(addr.row, addr.col))
    }

    /// Get a cell by row and column indices
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&CellData> {
        self.cells.get(row, col)
    }

    /// Get cell value (convenience method)
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        let addr = CellAddress::parse(address)?;
        Ok(self.get_value_at(addr.row, addr.col))
    }

    /// Get cell value by indices
    pub fn get_value_at(&self, row: u32, col: u16) -> CellValue {
        self.cells
            .get(row, col)
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    /// Get a cell's style index by address string.
    ///
    /// Returns 0 if the cell does not exist or has the default style.
    pub fn cell_style_index(&self, address: &str) -> Result<u32> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cell_style_index_at(addr.row, addr.col))
    }

    /// Get a cell's style index by row/column.
    pub fn cell_style_index_at(&self, row: u32, col: u16) -> u32 {
        self.cells.get(row, col).map(|c| c.style_index).unwrap_or(0)
    }

    // === Cell Modification ===

    /// Set a cell value by address string, keeping the cell's style
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_value_at(addr.row, addr.col, value)
    }

    /// Set a cell value by row and column indices, keeping the cell's style
    pub fn set_cell_value_at<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u16,
        value: V,
    ) -> Result<()> {
        validate_cell_position(row, col)?;
        self.cells.set_value(row, col, value.into());
        Ok(())
    }

    /// Set a cell formula by address string
    pub fn set_cell_formula(&mut self, address: &str, formula: &str) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_formula_at(addr.row, addr.col, formula)
    }

    /// Set a cell formula by row and column indices
    pub fn set_cell_formula_at(&mut self, row: u32, col: u16, formula: &str) -> Result<()> {
        self.set_cell_value_at(row, col, CellValue::formula(formula))
    }

    /// Point a cell at another style record, keeping its value
    pub fn set_cell_style_index_at(&mut self, row: u32, col: u16, style_index: u32) -> Result<()> {
        validate_cell_position(row, col)?;
        self.cells.set_style(row, col, style_index);
        Ok(())
    }

    /// Store a cell exactly as given, even an empty one
    pub fn insert_cell_at(&mut self, row: u32, col: u16, data: CellData) -> Result<()> {
        validate_cell_position(row, col)?;
        self.cells.insert(row, col, data);
        Ok(())
    }

    /// Clear a cell by indices
    pub fn clear_cell_at(&mut self, row: u32, col: u16) {
        self.cells.remove(row, col);
    }

    // === Extent ===

    /// Get the used range (bounds of all stored cells)
    pub fn used_range(&self) -> Option<CellRange> {
        self.cells
            .used_bounds()
            .map(|(min_row, min_col, max_row, max_col)| {
                CellRange::from_indices(min_row, min_col, max_row, max_col)
            })
    }

    /// Highest column index holding a cell in any row
    pub fn max_column(&self) -> Option<u16> {
        self.cells.max_col()
    }

    /// Get the number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    /// Check if the sheet holds no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over all cells in row order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.cells.iter()
    }

    /// Iterate over the cells of one row
    pub fn iter_row(&self, row: u32) -> impl Iterator<Item = (u16, &CellData)> {
        self.cells.iter_row(row)
    }

    // === Rows ===

    /// Row attributes (height, row style, ...) if the row has any
    pub fn row_properties(&self, row: u32) -> Option<&RowProperties> {
        self.cells.row_properties(row)
    }

    /// Replace a row's attributes
    pub fn set_row_properties(&mut self, row: u32, props: RowProperties) {
        self.cells.set_row_properties(row, props);
    }

    /// Insert `count` blank rows before row index `at`.
    ///
    /// Everything at or below `at` moves down by `count`. Formula text is
    /// not rewritten, so references keep pointing at the old row numbers.
    pub fn insert_rows(&mut self, at: u32, count: u32) {
        self.cells.insert_rows(at, count);
    }

    /// Copy row `from`'s formatting and content onto row `to`.
    ///
    /// For every column `0..=last_col` the source cell's style index is
    /// copied when it is non-default, and its content is copied literally
    /// when present (formulas keep their exact text). Columns with neither
    /// are left untouched. The source row's attributes (height, row style)
    /// replace the target row's.
    pub fn copy_row_format(&mut self, from: u32, to: u32, last_col: u16) -> Result<()> {
        validate_cell_position(to, last_col)?;
        if from == to {
            return Ok(());
        }

        let template: Vec<(u16, CellData)> = self
            .cells
            .iter_row(from)
            .take_while(|(col, _)| *col <= last_col)
            .map(|(col, data)| (col, data.clone()))
            .collect();

        for (col, data) in template {
            if data.has_style() {
                self.cells.set_style(to, col, data.style_index);
            }
            if !data.value.is_empty() {
                self.cells.set_value(to, col, data.value.literal_copy());
            }
        }

        let props = self.cells.row_properties(from).cloned().unwrap_or_default();
        self.cells.set_row_properties(to, props);
        Ok(())
    }
}

fn validate_cell_position(row: u32, col: u16) -> Result<()> {
    if row >= MAX_ROWS {
        return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
    }
    if col >= MAX_COLS {
        return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::FormulaKind;
    use pretty_assertions::assert_eq;

    fn template_sheet() -> Worksheet {
        let mut ws = Worksheet::new("Cotation");
        ws.set_cell_value_at(7, 0, "L?").unwrap();
        ws.set_cell_style_index_at(7, 0, 1).unwrap();
        ws.set_cell_style_index_at(7, 2, 2).unwrap();
        ws.set_cell_formula_at(7, 7, "C8*E8*F8").unwrap();
        ws.set_cell_style_index_at(7, 7, 2).unwrap();
        ws.set_cell_value_at(7, 8, "note").unwrap();
        ws.set_row_properties(
            7,
            RowProperties {
                height: Some(21.0),
                custom_height: true,
                ..Default::default()
            },
        );
        ws.set_cell_formula_at(9, 7, "SUM(H8:H8)").unwrap();
        ws
    }

    #[test]
    fn test_set_cell_values() {
        let mut ws = Worksheet::new("Paramètre");

        ws.set_cell_value("C7", "ACME").unwrap();
        ws.set_cell_value("C22", 42.0).unwrap();
        ws.set_cell_value("C40", true).unwrap();

        assert_eq!(ws.get_value("C7").unwrap().as_string(), Some("ACME"));
        assert_eq!(ws.get_value("C22").unwrap().as_number(), Some(42.0));
        assert_eq!(ws.get_value("C40").unwrap(), CellValue::Boolean(true));
        assert!(ws.set_cell_value_at(MAX_ROWS, 0, 1).is_err());
        assert!(ws.set_cell_value("C0", 1).is_err());
    }

    #[test]
    fn test_value_write_keeps_style() {
        let mut ws = template_sheet();
        ws.set_cell_value_at(7, 2, 5).unwrap();
        assert_eq!(ws.cell_style_index_at(7, 2), 2);
        assert_eq!(ws.get_value_at(7, 2), CellValue::Number(5.0));
    }

    #[test]
    fn test_used_range_and_max_column() {
        let mut ws = Worksheet::new("Test");
        assert!(ws.used_range().is_none());
        assert_eq!(ws.max_column(), None);

        ws.set_cell_value_at(5, 3, "A").unwrap();
        ws.set_cell_value_at(10, 7, "B").unwrap();

        assert_eq!(ws.used_range().unwrap().to_string(), "D6:H11");
        assert_eq!(ws.max_column(), Some(7));
    }

    #[test]
    fn test_insert_rows_keeps_formula_text() {
        let mut ws = template_sheet();
        ws.insert_rows(8, 2);

        assert_eq!(ws.get_value_at(9, 7), CellValue::Empty);
        assert_eq!(ws.get_value_at(11, 7).formula_text(), Some("=SUM(H8:H8)"));
        assert_eq!(ws.get_value_at(7, 7).formula_text(), Some("=C8*E8*F8"));
    }

    #[test]
    fn test_copy_row_format() {
        let mut ws = template_sheet();
        ws.insert_rows(8, 1);
        ws.copy_row_format(7, 8, 8).unwrap();

        assert_eq!(ws.cell_style_index_at(8, 0), 1);
        assert_eq!(ws.get_value_at(8, 0), CellValue::from("L?"));
        // styled but empty
        assert_eq!(ws.cell_style_index_at(8, 2), 2);
        assert!(ws.get_value_at(8, 2).is_empty());
        assert_eq!(ws.get_value_at(8, 7), CellValue::formula("=C8*E8*F8"));
        assert_eq!(ws.get_value_at(8, 8), CellValue::from("note"));
        // untouched columns stay absent
        assert!(ws.cell_at(8, 1).is_none());
        assert_eq!(ws.row_properties(8).and_then(|p| p.height), Some(21.0));
    }

    #[test]
    fn test_copy_row_format_respects_last_col_and_is_idempotent() {
        let mut ws = template_sheet();
        ws.insert_rows(8, 1);
        ws.copy_row_format(7, 8, 2).unwrap();
        let once: Vec<_> = ws.iter_row(8).map(|(c, d)| (c, d.clone())).collect();
        ws.copy_row_format(7, 8, 2).unwrap();
        let twice: Vec<_> = ws.iter_row(8).map(|(c, d)| (c, d.clone())).collect();

        assert_eq!(once, twice);
        assert!(ws.cell_at(8, 7).is_none());
    }

    #[test]
    fn test_copy_row_format_flattens_shared_formulas() {
        let mut ws = Worksheet::new("Cotation");
        ws.insert_cell_at(
            7,
            3,
            CellData::with_style(
                CellValue::Formula {
                    text: "=B8*2".into(),
                    cached_value: Some(Box::new(CellValue::Number(4.0))),
                    kind: FormulaKind::Shared {
                        index: 0,
                        range: Some(CellRange::parse("D8:D9").unwrap()),
                    },
                },
                3,
            ),
        )
        .unwrap();

        ws.copy_row_format(7, 8, 3).unwrap();
        assert_eq!(ws.cell_at(8, 3).unwrap(), &CellData::with_style(CellValue::formula("=B8*2"), 3));
    }
}
