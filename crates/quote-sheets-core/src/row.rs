//! Row types

/// Row-level formatting as stored on a sheet's `<row>` element
///
/// The known attributes are typed; anything else the file carried
/// (`x14ac:dyDescent`, `thickBot`, ...) is kept verbatim in `extra` so a
/// rewritten row keeps its original look.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowProperties {
    /// Custom height in points (None = default)
    pub height: Option<f64>,
    /// The height was set explicitly by the user
    pub custom_height: bool,
    /// Row is hidden
    pub hidden: bool,
    /// Outline/grouping level (0-7)
    pub outline_level: u8,
    /// Row is collapsed (in outline)
    pub collapsed: bool,
    /// Row-level style index, applied when `customFormat` is set
    pub style_index: Option<u32>,
    /// Other attributes in document order, as (qualified name, value)
    pub extra: Vec<(String, String)>,
}

impl RowProperties {
    /// Check if this row has any custom settings
    pub fn has_custom_settings(&self) -> bool {
        self.height.is_some()
            || self.hidden
            || self.outline_level > 0
            || self.collapsed
            || self.style_index.is_some()
            || !self.extra.is_empty()
    }
}
