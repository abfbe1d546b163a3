//! What a cell holds

use super::CellRange;
use std::fmt;

/// Content of one cell, independent of its style
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,

    Boolean(bool),

    /// Dates are serial numbers like any other
    Number(f64),

    /// Shared or inline text; the sheet model does not distinguish them
    String(String),

    Error(CellError),

    /// ISO 8601 text of a `t="d"` cell, kept verbatim
    Date(String),

    Formula {
        /// Formula text including the leading `=` (e.g., "=SUM(H8:H12)")
        text: String,
        /// Last calculated value, as stored in the file
        cached_value: Option<Box<CellValue>>,
        /// How the formula is stored in the sheet
        kind: FormulaKind,
    },
}

/// Storage flavour of a formula cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormulaKind {
    /// Plain per-cell formula
    #[default]
    Normal,
    /// Legacy array formula entered over `range`
    Array {
        /// Cells covered by the array formula
        range: CellRange,
    },
    /// Member of a shared formula group.
    ///
    /// Only the group's anchor cell carries `range`; the other members point
    /// at it through `index`. `text` always holds the formula as it applies to
    /// the member's own position.
    Shared {
        /// Shared group index (`si`)
        index: u32,
        /// Range covered by the group, present on the anchor cell
        range: Option<CellRange>,
    },
}

impl CellValue {
    /// Text cell
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Create a new plain formula; a missing leading `=` is added
    pub fn formula<S: Into<String>>(text: S) -> Self {
        let text = text.into();
        let text = if text.starts_with('=') {
            text
        } else {
            format!("={}", text)
        };
        CellValue::Formula {
            text,
            cached_value: None,
            kind: FormulaKind::Normal,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, CellValue::Formula { .. })
    }

    /// The number, or a formula's cached number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Formula {
                cached_value: Some(v),
                ..
            } => v.as_number(),
            _ => None,
        }
    }

    /// The text, or a formula's cached text
    pub fn as_string(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            CellValue::Formula {
                cached_value: Some(v),
                ..
            } => v.as_string(),
            _ => None,
        }
    }

    /// Formula text with its leading `=`
    pub fn formula_text(&self) -> Option<&str> {
        match self {
            CellValue::Formula { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Copy of this value for pasting into another row without touching
    /// references.
    ///
    /// Formulas keep their text verbatim but lose their cached result and any
    /// array/shared grouping, so the copy is a standalone formula the
    /// spreadsheet application recomputes on load.
    pub fn literal_copy(&self) -> CellValue {
        match self {
            CellValue::Formula { text, .. } => CellValue::Formula {
                text: text.clone(),
                cached_value: None,
                kind: FormulaKind::Normal,
            },
            other => other.clone(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::String(s) | CellValue::Date(s) => f.write_str(s),
            CellValue::Error(e) => write!(f, "{}", e),
            CellValue::Formula {
                cached_value: Some(v),
                ..
            } => write!(f, "{}", v),
            CellValue::Formula { text, .. } => f.write_str(text),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

// Quantities above 2^53 lose precision, as they would in the sheet.
impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<CellError> for CellValue {
    fn from(e: CellError) -> Self {
        CellValue::Error(e)
    }
}

/// `t="e"` cell contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    /// #NULL!
    Null,
    /// #DIV/0!
    Div0,
    /// #VALUE!
    Value,
    /// #REF!
    Ref,
    /// #NAME?
    Name,
    /// #NUM!
    Num,
    /// #N/A
    Na,
    /// #GETTING_DATA
    GettingData,
    /// #SPILL!
    Spill,
    /// #CALC!
    Calc,
}

impl CellError {
    /// Literal as shown in the cell
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Null => "#NULL!",
            CellError::Div0 => "#DIV/0!",
            CellError::Value => "#VALUE!",
            CellError::Ref => "#REF!",
            CellError::Name => "#NAME?",
            CellError::Num => "#NUM!",
            CellError::Na => "#N/A",
            CellError::GettingData => "#GETTING_DATA",
            CellError::Spill => "#SPILL!",
            CellError::Calc => "#CALC!",
        }
    }

    /// Parse an error literal as written in a cell
    pub fn parse(s: &str) -> Option<Self> {
        [
            CellError::Null,
            CellError::Div0,
            CellError::Value,
            CellError::Ref,
            CellError::Name,
            CellError::Num,
            CellError::Na,
            CellError::GettingData,
            CellError::Spill,
            CellError::Calc,
        ]
        .into_iter()
        .find(|e| e.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
