//! Cell storage implementation
//!
//! Sparse row-based storage for worksheet cells. Only stored cells exist,
//! keyed `row -> col -> CellData` in BTreeMaps so iteration is always in
//! sheet order (required for streaming writes).

use std::collections::BTreeMap;

use super::{CellValue, FormulaKind};
use crate::row::RowProperties;

/// Complete data for a single cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellData {
    /// The cell's value
    pub value: CellValue,
    /// Index into the workbook's style table (0 = default style)
    pub style_index: u32,
}

impl CellData {
    /// Create a new cell with a value and default style
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            style_index: 0,
        }
    }

    /// Create a new cell with a value and style
    pub fn with_style(value: CellValue, style_index: u32) -> Self {
        Self { value, style_index }
    }

    /// Check if this cell is effectively empty (no value and default style)
    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.style_index == 0
    }

    /// Whether the cell carries a non-default style
    pub fn has_style(&self) -> bool {
        self.style_index != 0
    }
}

/// Sparse row-based storage for worksheet cells and row attributes
#[derive(Debug, Clone, Default)]
pub struct CellStorage {
    rows: BTreeMap<u32, BTreeMap<u16, CellData>>,
    row_props: BTreeMap<u32, RowProperties>,
}

impl CellStorage {
    /// Create a new empty cell storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell
    pub fn get(&self, row: u32, col: u16) -> Option<&CellData> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    /// Get a mutable cell
    pub fn get_mut(&mut self, row: u32, col: u16) -> Option<&mut CellData> {
        self.rows.get_mut(&row).and_then(|r| r.get_mut(&col))
    }

    /// Store a cell as-is, even when it is empty.
    ///
    /// Readers use this so cells present in the file (`<c r="K8"/>`) still
    /// count toward the sheet's extent.
    pub fn insert(&mut self, row: u32, col: u16, data: CellData) {
        self.rows.entry(row).or_default().insert(col, data);
    }

    /// Set a cell; empty data removes the cell
    pub fn set(&mut self, row: u32, col: u16, data: CellData) {
        if data.is_empty() {
            self.remove(row, col);
        } else {
            self.insert(row, col, data);
        }
    }

    /// Set just the cell value (preserving style)
    pub fn set_value(&mut self, row: u32, col: u16, value: CellValue) {
        match self.get_mut(row, col) {
            Some(cell) => {
                cell.value = value;
                if cell.is_empty() {
                    self.remove(row, col);
                }
            }
            None if !value.is_empty() => self.insert(row, col, CellData::new(value)),
            None => {}
        }
    }

    /// Set just the cell style (preserving value)
    pub fn set_style(&mut self, row: u32, col: u16, style_index: u32) {
        match self.get_mut(row, col) {
            Some(cell) => cell.style_index = style_index,
            None if style_index != 0 => {
                self.insert(row, col, CellData::with_style(CellValue::Empty, style_index))
            }
            None => {}
        }
    }

    /// Remove a cell
    pub fn remove(&mut self, row: u32, col: u16) -> Option<CellData> {
        let row_map = self.rows.get_mut(&row)?;
        let removed = row_map.remove(&col);
        if row_map.is_empty() {
            self.rows.remove(&row);
        }
        removed
    }

    /// Get the number of stored cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    /// Check if storage holds no cells
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the bounds of stored cells
    ///
    /// Returns (min_row, min_col, max_row, max_col) or None if empty
    pub fn used_bounds(&self) -> Option<(u32, u16, u32, u16)> {
        let min_row = *self.rows.keys().next()?;
        let max_row = *self.rows.keys().next_back()?;

        let (min_col, max_col) = self.rows.values().fold((u16::MAX, 0u16), |(lo, hi), cols| {
            let first = cols.keys().next().copied().unwrap_or(lo);
            let last = cols.keys().next_back().copied().unwrap_or(hi);
            (lo.min(first), hi.max(last))
        });

        Some((min_row, min_col, max_row, max_col))
    }

    /// Highest column index holding a stored cell, across all rows
    pub fn max_col(&self) -> Option<u16> {
        self.rows
            .values()
            .filter_map(|cols| cols.keys().next_back().copied())
            .max()
    }

    /// Iterate over all cells in row order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.rows
            .iter()
            .flat_map(|(&row, cols)| cols.iter().map(move |(&col, data)| (row, col, data)))
    }

    /// Iterate over cells in a specific row
    pub fn iter_row(&self, row: u32) -> impl Iterator<Item = (u16, &CellData)> {
        self.rows
            .get(&row)
            .into_iter()
            .flat_map(|cols| cols.iter().map(|(&col, data)| (col, data)))
    }

    /// Row indices that hold cells or row attributes, ascending
    pub fn row_indices(&self) -> Vec<u32> {
        let mut indices: Vec<u32> = self
            .rows
            .keys()
            .chain(self.row_props.keys())
            .copied()
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Row attributes for `row`, if any were set
    pub fn row_properties(&self, row: u32) -> Option<&RowProperties> {
        self.row_props.get(&row)
    }

    /// Replace the row attributes for `row`; default properties clear them
    pub fn set_row_properties(&mut self, row: u32, props: RowProperties) {
        if props.has_custom_settings() {
            self.row_props.insert(row, props);
        } else {
            self.row_props.remove(&row);
        }
    }

    /// Shift every row at or below `at` down by `count`.
    ///
    /// Cells and row attributes move together, leaving `count` blank rows
    /// starting at `at`. Shared and array formula ranges are moved with
    /// their cells; formula text is left alone.
    pub fn insert_rows(&mut self, at: u32, count: u32) {
        if count == 0 {
            return;
        }

        let moved = self.rows.split_off(&at);
        for (row, mut cols) in moved {
            for cell in cols.values_mut() {
                shift_formula_range(&mut cell.value, at, count);
            }
            self.rows.insert(row.saturating_add(count), cols);
        }
        for cell in self.rows.range_mut(..at).flat_map(|(_, cols)| cols.values_mut()) {
            shift_formula_range(&mut cell.value, at, count);
        }

        let moved_props = self.row_props.split_off(&at);
        for (row, props) in moved_props {
            self.row_props.insert(row.saturating_add(count), props);
        }
    }
}

fn shift_formula_range(value: &mut CellValue, at: u32, count: u32) {
    if let CellValue::Formula { kind, .. } = value {
        match kind {
            FormulaKind::Array { range }
            | FormulaKind::Shared {
                range: Some(range), ..
            } => *range = range.shifted_down(at, count),
            _ => {}
        }
    }
}
