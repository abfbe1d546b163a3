//! Workbook type - the main document structure

use crate::error::{Error, Result};
use crate::style::{Style, StyleTable};
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// A workbook: ordered worksheets plus the shared style records
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    worksheets: Vec<Worksheet>,
    styles: StyleTable,
}

impl Workbook {
    /// Create an empty workbook holding only the default style
    pub fn new() -> Self {
        Self {
            worksheets: Vec::new(),
            styles: StyleTable::new(),
        }
    }

    /// Create an empty workbook with the given style records
    pub fn with_styles(styles: StyleTable) -> Self {
        Self {
            worksheets: Vec::new(),
            styles,
        }
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.worksheets.iter().map(|ws| ws.name()).collect()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a worksheet by its exact name
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name() == name)
    }

    /// Get a mutable worksheet by its exact name
    pub fn worksheet_by_name_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.worksheets.iter_mut().find(|ws| ws.name() == name)
    }

    /// Get a worksheet by name, or [`Error::SheetNotFound`]
    pub fn require_worksheet_mut(&mut self, name: &str) -> Result<&mut Worksheet> {
        self.worksheet_by_name_mut(name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))
    }

    /// Get the index of a worksheet by name
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.worksheets.iter().position(|ws| ws.name() == name)
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Add a worksheet at the end, returning its index
    pub fn add_worksheet(&mut self, worksheet: Worksheet) -> Result<usize> {
        self.validate_sheet_name(worksheet.name())?;
        self.worksheets.push(worksheet);
        Ok(self.worksheets.len() - 1)
    }

    /// Add an empty worksheet with the given name
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<usize> {
        self.add_worksheet(Worksheet::new(name))
    }

    /// The workbook's style records
    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    /// Resolve a cell style index
    pub fn style(&self, index: u32) -> Option<&Style> {
        self.styles.get(index)
    }

    /// Resolve the style of a cell on a named sheet.
    ///
    /// Missing cells resolve to the default record (index 0).
    pub fn cell_style(&self, sheet: &str, row: u32, col: u16) -> Result<&Style> {
        let ws = self
            .worksheet_by_name(sheet)
            .ok_or_else(|| Error::SheetNotFound(sheet.to_string()))?;
        let index = ws.cell_style_index_at(row, col);
        self.styles
            .get(index)
            .ok_or(Error::InvalidStyleIndex(index))
    }

    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {} characters)",
                MAX_SHEET_NAME_LEN
            )));
        }
        if let Some(c) = name
            .chars()
            .find(|c| matches!(c, ':' | '\\' | '/' | '?' | '*' | '[' | ']'))
        {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name cannot contain '{}'",
                c
            )));
        }

        let lower = name.to_lowercase();
        if self
            .worksheets
            .iter()
            .any(|ws| ws.name().to_lowercase() == lower)
        {
            return Err(Error::DuplicateSheetName(name.into()));
        }

        Ok(())
    }
}
