//! A1 references: single cells and rectangular ranges

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// One cell reference such as `C7` or `$H$8`
///
/// Rows and columns are 0-based internally and 1-based in A1 notation.
/// The `$` markers are kept so a parsed reference prints back the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddress {
    pub row: u32,
    /// A = 0
    pub col: u16,
    /// `$` before the row number
    pub row_absolute: bool,
    /// `$` before the column letters
    pub col_absolute: bool,
}

impl CellAddress {
    /// Relative reference to a 0-based position
    pub fn new(row: u32, col: u16) -> Self {
        Self {
            row,
            col,
            row_absolute: false,
            col_absolute: false,
        }
    }

    /// Read an A1 reference; surrounding whitespace is ignored
    ///
    /// ```
    /// use quote_sheets_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("C7").unwrap();
    /// assert_eq!((addr.row, addr.col), (6, 2));
    ///
    /// let addr = CellAddress::parse("$H$8").unwrap();
    /// assert!(addr.row_absolute && addr.col_absolute);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress(s.to_string()));
        }

        let (col_absolute, rest) = match s.strip_prefix('$') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let letters_end = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        if letters_end == 0 {
            return Err(Error::InvalidAddress(s.to_string()));
        }
        let col = Self::letters_to_column(&rest[..letters_end])?;

        let (row_absolute, digits) = match rest[letters_end..].strip_prefix('$') {
            Some(digits) => (true, digits),
            None => (false, &rest[letters_end..]),
        };
        if digits.is_empty() {
            return Err(Error::InvalidAddress(s.to_string()));
        }

        let row: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(s.to_string()))?;
        if row == 0 {
            return Err(Error::InvalidAddress(s.to_string()));
        }
        if row > MAX_ROWS {
            return Err(Error::RowOutOfBounds(row - 1, MAX_ROWS - 1));
        }

        Ok(Self {
            row: row - 1,
            col,
            row_absolute,
            col_absolute,
        })
    }

    /// Bijective base-26: 0 is `A`, 26 is `AA`
    pub fn column_to_letters(col: u16) -> String {
        let mut letters = Vec::new();
        let mut n = col as u32 + 1;

        while n > 0 {
            n -= 1;
            letters.push((n % 26) as u8 + b'A');
            n /= 26;
        }

        letters.iter().rev().map(|&b| b as char).collect()
    }

    /// Inverse of [`CellAddress::column_to_letters`], case-insensitive
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(Error::InvalidAddress(letters.to_string()));
        }

        let mut col: u32 = 0;
        for b in letters.bytes() {
            col = col * 26 + u32::from(b.to_ascii_uppercase() - b'A') + 1;
            if col > MAX_COLS as u32 {
                return Err(Error::ColumnOutOfBounds(
                    col.min(u16::MAX as u32) as u16,
                    MAX_COLS - 1,
                ));
            }
        }

        Ok((col - 1) as u16)
    }

    pub fn to_a1_string(&self) -> String {
        format!(
            "{}{}{}{}",
            if self.col_absolute { "$" } else { "" },
            Self::column_to_letters(self.col),
            if self.row_absolute { "$" } else { "" },
            self.row + 1
        )
    }

    /// The same address moved down by `count` rows when it sits at or below `at`
    pub fn shifted_down(self, at: u32, count: u32) -> Self {
        if self.row >= at {
            Self {
                row: self.row.saturating_add(count).min(MAX_ROWS - 1),
                ..self
            }
        } else {
            self
        }
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A range of cells (e.g., "H8:H12")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// Top-left corner
    pub start: CellAddress,
    /// Bottom-right corner
    pub end: CellAddress,
}

impl CellRange {
    /// Create a new cell range, normalized so `start` is the top-left corner
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        let top_left = CellAddress {
            row: start.row.min(end.row),
            col: start.col.min(end.col),
            ..start
        };
        let bottom_right = CellAddress {
            row: start.row.max(end.row),
            col: start.col.max(end.col),
            ..end
        };
        Self {
            start: top_left,
            end: bottom_right,
        }
    }

    /// Range between two 0-based corners
    pub fn from_indices(start_row: u32, start_col: u16, end_row: u32, end_col: u16) -> Self {
        Self::new(
            CellAddress::new(start_row, start_col),
            CellAddress::new(end_row, end_col),
        )
    }

    /// Parse a range from A1:B10 notation; a lone address is a single-cell range
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.split_once(':') {
            Some((start, end)) => Ok(Self::new(
                CellAddress::parse(start)?,
                CellAddress::parse(end)?,
            )),
            None => {
                let addr = CellAddress::parse(s)
                    .map_err(|_| Error::InvalidRange(s.to_string()))?;
                Ok(Self {
                    start: addr,
                    end: addr,
                })
            }
        }
    }

    /// Whether the 0-based position falls inside the range
    pub fn contains(&self, row: u32, col: u16) -> bool {
        row >= self.start.row && row <= self.end.row && col >= self.start.col && col <= self.end.col
    }

    /// Height in rows
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Width in columns
    pub fn col_count(&self) -> u16 {
        self.end.col - self.start.col + 1
    }

    /// Adjust the range for `count` rows inserted before row `at`.
    ///
    /// A range entirely below `at` moves down; a range straddling `at` grows.
    pub fn shifted_down(self, at: u32, count: u32) -> Self {
        Self {
            start: self.start.shifted_down(at, count),
            end: self.end.shifted_down(at, count),
        }
    }

    /// `A8:H12`, or just `C3` for a single cell
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start, self.end)
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
