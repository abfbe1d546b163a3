//! Number format types

/// Number format of a style record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// General format (id 0)
    #[default]
    General,

    /// Built-in format by id, with no `<numFmt>` entry in the workbook
    BuiltIn(u32),

    /// Custom format declared in the workbook's `<numFmts>`
    Custom { id: u32, code: String },
}

impl NumberFormat {
    /// The `numFmtId` this format is referenced by
    pub fn id(&self) -> u32 {
        match self {
            NumberFormat::General => 0,
            NumberFormat::BuiltIn(id) => *id,
            NumberFormat::Custom { id, .. } => *id,
        }
    }

    /// The format code, when the workbook declares it or it is a common built-in
    pub fn format_code(&self) -> Option<&str> {
        match self {
            NumberFormat::General => Some("General"),
            NumberFormat::Custom { code, .. } => Some(code),
            NumberFormat::BuiltIn(id) => match id {
                1 => Some("0"),
                2 => Some("0.00"),
                3 => Some("#,##0"),
                4 => Some("#,##0.00"),
                9 => Some("0%"),
                10 => Some("0.00%"),
                14 => Some("mm-dd-yy"),
                49 => Some("@"),
                _ => None,
            },
        }
    }
}
