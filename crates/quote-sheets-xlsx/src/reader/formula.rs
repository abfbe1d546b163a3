//! Shared formula expansion
//!
//! Only the anchor cell of a shared formula group stores the formula text;
//! the other members store `<f t="shared" si="N"/>` and mean "the anchor's
//! formula, moved by my offset from the anchor". The reader expands members
//! to their own text so every formula cell is self-contained in memory.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use quote_sheets_core::{CellAddress, MAX_COLS, MAX_ROWS};

static CELL_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<col_abs>\$?)(?P<col>[A-Z]{1,3})(?P<row_abs>\$?)(?P<row>[0-9]+)")
        .expect("cell reference pattern is valid")
});

/// Move every relative reference in `formula` by the given offsets.
///
/// `$`-anchored parts stay put. String literals, quoted sheet names,
/// function names (`LOG10(`) and tokens glued to a preceding identifier
/// character are left alone. A reference pushed off the sheet becomes
/// `#REF!`.
pub(crate) fn translate_shared_formula(formula: &str, row_shift: i64, col_shift: i64) -> String {
    if row_shift == 0 && col_shift == 0 {
        return formula.to_string();
    }

    map_unquoted(formula, '"', |code| {
        map_unquoted(code, '\'', |chunk| translate_chunk(chunk, row_shift, col_shift))
    })
}

/// Apply `f` to the parts of `s` outside `quote`-delimited sections
fn map_unquoted(s: &str, quote: char, f: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, chunk) in s.split(quote).enumerate() {
        if i > 0 {
            out.push(quote);
        }
        if i % 2 == 1 {
            out.push_str(chunk);
        } else {
            out.push_str(&f(chunk));
        }
    }
    out
}

fn translate_chunk(chunk: &str, row_shift: i64, col_shift: i64) -> String {
    CELL_REF
        .replace_all(chunk, |caps: &Captures| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let start = caps.get(0).map_or(0, |m| m.start());
            let end = caps.get(0).map_or(0, |m| m.end());

            let glued_before = chunk[..start]
                .chars()
                .next_back()
                .map_or(false, |c| c.is_alphanumeric() || c == '_' || c == '.');
            let glued_after = chunk[end..]
                .chars()
                .next()
                .map_or(false, |c| c == '(' || c.is_alphanumeric() || c == '_');
            if glued_before || glued_after {
                return whole.to_string();
            }

            shift_reference(caps, row_shift, col_shift).unwrap_or_else(|| whole.to_string())
        })
        .into_owned()
}

fn shift_reference(caps: &Captures, row_shift: i64, col_shift: i64) -> Option<String> {
    let col_abs = !caps.name("col_abs")?.as_str().is_empty();
    let row_abs = !caps.name("row_abs")?.as_str().is_empty();
    let col = CellAddress::letters_to_column(caps.name("col")?.as_str()).ok()? as i64;
    let row = caps.name("row")?.as_str().parse::<i64>().ok()? - 1;
    if row < 0 {
        return None;
    }

    let new_col = if col_abs { col } else { col + col_shift };
    let new_row = if row_abs { row } else { row + row_shift };
    if !(0..MAX_COLS as i64).contains(&new_col) || !(0..MAX_ROWS as i64).contains(&new_row) {
        return Some("#REF!".to_string());
    }

    Some(format!(
        "{}{}{}{}",
        if col_abs { "$" } else { "" },
        CellAddress::column_to_letters(new_col as u16),
        if row_abs { "$" } else { "" },
        new_row + 1
    ))
}
