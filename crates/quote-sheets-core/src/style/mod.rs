//! Cell styling types
//!
//! This module contains types for cell formatting:
//! - [`Style`] - Complete cell style (one `cellXfs` record)
//! - [`StyleTable`] - The workbook's style records, by index
//! - [`FontStyle`], [`FillStyle`], [`BorderStyle`], [`Alignment`],
//!   [`NumberFormat`], [`Protection`] - The six parts of a style
//! - [`Color`] - Color references

mod alignment;
mod border;
mod color;
mod fill;
mod font;
mod number_format;

pub use alignment::{Alignment, HorizontalAlignment, VerticalAlignment};
pub use border::{BorderEdge, BorderLineStyle, BorderStyle};
pub use color::Color;
pub use fill::FillStyle;
pub use font::FontStyle;
pub use number_format::NumberFormat;

/// Complete cell style
///
/// Cells never own a `Style`; they carry an index into the workbook's
/// [`StyleTable`]. Giving two cells the same index gives them the same font,
/// fill, border, alignment, number format and protection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Font settings
    pub font: FontStyle,
    /// Fill/background settings
    pub fill: FillStyle,
    /// Border settings
    pub border: BorderStyle,
    /// Text alignment
    pub alignment: Alignment,
    /// Number format
    pub number_format: NumberFormat,
    /// Cell protection
    pub protection: Protection,
}

/// Cell protection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Protection {
    /// Cell is locked (protected when sheet is protected)
    pub locked: bool,
    /// Formula is hidden when sheet is protected
    pub hidden: bool,
}

impl Default for Protection {
    fn default() -> Self {
        Self {
            locked: true,
            hidden: false,
        }
    }
}

/// The workbook's cell style records, index-aligned with `cellXfs`
///
/// Records are kept exactly as the file lists them (no deduplication), so a
/// cell's `style_index` can be written back unchanged.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    styles: Vec<Style>,
}

impl StyleTable {
    /// Create a table holding only the default style at index 0
    pub fn new() -> Self {
        Self {
            styles: vec![Style::default()],
        }
    }

    /// Build a table from records in file order
    pub fn from_styles(styles: Vec<Style>) -> Self {
        if styles.is_empty() {
            Self::new()
        } else {
            Self { styles }
        }
    }

    /// Get a style by index
    pub fn get(&self, index: u32) -> Option<&Style> {
        self.styles.get(index as usize)
    }

    /// Check whether `index` names a record in the table
    pub fn contains(&self, index: u32) -> bool {
        (index as usize) < self.styles.len()
    }

    /// Get the number of records
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if the table has no records
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Iterate over all styles with their indices
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Style)> {
        self.styles.iter().enumerate().map(|(i, s)| (i as u32, s))
    }
}
