//! `<alignment>` child of a `cellXfs` record

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Alignment {
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
    pub wrap_text: bool,
    pub shrink_to_fit: bool,
    pub indent: u8,
    /// Degrees; 255 stacks the text vertically
    pub rotation: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlignment {
    #[default]
    General,
    Left,
    Center,
    Right,
    Fill,
    Justify,
    CenterContinuous,
    Distributed,
}

impl HorizontalAlignment {
    /// `general` and unknown values both read as [`HorizontalAlignment::General`]
    pub fn from_ooxml(s: &str) -> Self {
        use HorizontalAlignment::*;
        match s {
            "left" => Left,
            "center" => Center,
            "right" => Right,
            "fill" => Fill,
            "justify" => Justify,
            "centerContinuous" => CenterContinuous,
            "distributed" => Distributed,
            _ => General,
        }
    }
}

/// Excel anchors text to the bottom of a cell unless told otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalAlignment {
    Top,
    Center,
    #[default]
    Bottom,
    Justify,
    Distributed,
}

impl VerticalAlignment {
    pub fn from_ooxml(s: &str) -> Self {
        use VerticalAlignment::*;
        match s {
            "top" => Top,
            "center" => Center,
            "justify" => Justify,
            "distributed" => Distributed,
            _ => Bottom,
        }
    }
}
