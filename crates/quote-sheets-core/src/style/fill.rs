//! Fill/background style types

use super::Color;

/// Cell background
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FillStyle {
    /// No fill (transparent)
    #[default]
    None,

    /// Solid color fill
    Solid { color: Color },

    /// Any other pattern fill, kept by its OOXML pattern name
    Pattern {
        pattern: String,
        foreground: Color,
        background: Color,
    },

    /// Gradient fill (stops are not modelled)
    Gradient,
}

impl FillStyle {
    /// Build a fill from a `<patternFill>` element's parts
    pub fn from_pattern(pattern: &str, foreground: Color, background: Color) -> Self {
        match pattern {
            "" | "none" => FillStyle::None,
            "solid" => FillStyle::Solid { color: foreground },
            other => FillStyle::Pattern {
                pattern: other.to_string(),
                foreground,
                background,
            },
        }
    }

    /// Check if this is a "no fill"
    pub fn is_none(&self) -> bool {
        matches!(self, FillStyle::None)
    }
}
