//! Color representation

use std::fmt;

/// A color as referenced from a style record
///
/// Only the reference is kept (theme slot, palette index or literal ARGB);
/// nothing is resolved against the workbook theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Automatic/default color
    #[default]
    Auto,

    /// Literal ARGB color
    Argb { a: u8, r: u8, g: u8, b: u8 },

    /// Theme color with tint, stored as a whole percentage (-100..=100)
    Theme { index: u8, tint: i8 },

    /// Indexed color (legacy palette)
    Indexed(u8),
}

impl Color {
    /// Opaque black
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Create an opaque RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Argb { a: 0xFF, r, g, b }
    }

    /// Create a theme color; `tint` is in the -1.0..=1.0 range used by OOXML
    pub fn theme(index: u8, tint: f64) -> Self {
        Color::Theme {
            index,
            tint: (tint.clamp(-1.0, 1.0) * 100.0).round() as i8,
        }
    }

    /// Parse `RRGGBB` or `AARRGGBB`, with or without a leading `#`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

        match hex.len() {
            6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color::Argb {
                a: byte(0)?,
                r: byte(2)?,
                g: byte(4)?,
                b: byte(6)?,
            }),
            _ => None,
        }
    }

    /// Check if color is automatic/default
    pub fn is_auto(&self) -> bool {
        matches!(self, Color::Auto)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Auto => f.write_str("auto"),
            Color::Argb { a, r, g, b } => write!(f, "#{:02X}{:02X}{:02X}{:02X}", a, r, g, b),
            Color::Theme { index, tint } => write!(f, "theme({}, {}%)", index, tint),
            Color::Indexed(i) => write!(f, "indexed({})", i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#FF0000"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(
            Color::from_hex("80FFFFFF"),
            Some(Color::Argb {
                a: 0x80,
                r: 0xFF,
                g: 0xFF,
                b: 0xFF
            })
        );
        assert_eq!(Color::from_hex("FFF"), None);
        assert_eq!(Color::from_hex("GG0000"), None);
    }

    #[test]
    fn test_theme_tint_is_rounded_to_percent() {
        assert_eq!(Color::theme(4, -0.249977111117893), Color::Theme { index: 4, tint: -25 });
        assert_eq!(Color::theme(0, 3.0).to_string(), "theme(0, 100%)");
    }
}
