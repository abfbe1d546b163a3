//! `<font>` records

use std::hash::{Hash, Hasher};

use super::Color;

/// Font of a `cellXfs` record, as read from the `fonts` table
#[derive(Debug, Clone, PartialEq)]
pub struct FontStyle {
    pub name: String,
    /// Points
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    /// Any `<u>` other than `val="none"`
    pub underline: bool,
    pub strikethrough: bool,
    pub color: Color,
}

impl FontStyle {
    /// Excel's body font for a new workbook
    pub const DEFAULT_NAME: &'static str = "Calibri";
    pub const DEFAULT_SIZE: f64 = 11.0;
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_owned(),
            size: Self::DEFAULT_SIZE,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            color: Color::Auto,
        }
    }
}

// Sizes come from `<sz val>` and are never NaN.
impl Eq for FontStyle {}

impl Hash for FontStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (&self.name, self.size.to_bits(), &self.color).hash(state);
        [self.bold, self.italic, self.underline, self.strikethrough].hash(state);
    }
}
