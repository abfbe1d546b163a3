//! `<border>` records

use super::Color;

/// The drawn edges of a border record; `None` means no line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BorderStyle {
    pub left: Option<BorderEdge>,
    pub right: Option<BorderEdge>,
    pub top: Option<BorderEdge>,
    pub bottom: Option<BorderEdge>,
    pub diagonal: Option<BorderEdge>,
}

impl BorderStyle {
    pub fn is_empty(&self) -> bool {
        [&self.left, &self.right, &self.top, &self.bottom, &self.diagonal]
            .iter()
            .all(|edge| edge.is_none())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BorderEdge {
    pub style: BorderLineStyle,
    pub color: Color,
}

/// Values of the `style` attribute on an edge element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderLineStyle {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

impl BorderLineStyle {
    const NAMES: [(&'static str, BorderLineStyle); 13] = [
        ("thin", Self::Thin),
        ("medium", Self::Medium),
        ("thick", Self::Thick),
        ("dashed", Self::Dashed),
        ("dotted", Self::Dotted),
        ("double", Self::Double),
        ("hair", Self::Hair),
        ("mediumDashed", Self::MediumDashed),
        ("dashDot", Self::DashDot),
        ("mediumDashDot", Self::MediumDashDot),
        ("dashDotDot", Self::DashDotDot),
        ("mediumDashDotDot", Self::MediumDashDotDot),
        ("slantDashDot", Self::SlantDashDot),
    ];

    /// Unknown names (and `"none"`) read as [`BorderLineStyle::None`]
    pub fn from_ooxml(s: &str) -> Self {
        Self::NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map_or(Self::None, |(_, style)| *style)
    }
}
