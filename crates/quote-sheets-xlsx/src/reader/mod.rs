//! XLSX part readers
//!
//! Parses the package plumbing (relationships, `workbook.xml`) and worksheet
//! cell data into the core model. Only what the editor needs is read; every
//! part keeps its original bytes in the package for writing back.

mod formula;

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::package::Relationship;
use crate::shared_strings::SharedStrings;
use quote_sheets_core::{
    CellAddress, CellData, CellError, CellRange, CellStorage, CellValue, FormulaKind,
    RowProperties, Worksheet,
};

pub(crate) use formula::translate_shared_formula;

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
            .filter(|_| candidate.get(6..7) == Some("_"))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(c) => {
                result.push(c);
                rest = &candidate[7..];
            }
            None => {
                result.push('_');
                rest = &candidate[1..];
            }
        }
    }
    result.push_str(rest);
    result
}

/// Parse a relationships part (`*.rels`)
pub(crate) fn read_relationships(xml: &[u8]) -> XlsxResult<Vec<Relationship>> {
    let mut xml_reader = Reader::from_reader(xml);
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut rels = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let id = attr(&e, b"Id").unwrap_or_default();
                let rel_type = attr(&e, b"Type").unwrap_or_default();
                let target = attr(&e, b"Target").unwrap_or_default();
                let external = attr(&e, b"TargetMode").as_deref() == Some("External");
                rels.push(Relationship {
                    id,
                    rel_type,
                    target,
                    external,
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Sheet entries of `workbook.xml`, in tab order, as (name, relationship id)
pub(crate) fn read_workbook_sheets(xml: &[u8]) -> XlsxResult<Vec<(String, String)>> {
    let mut xml_reader = Reader::from_reader(xml);
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sheet" => {
                let mut name = None;
                let mut r_id = None;
                for a in e.attributes().flatten() {
                    match (a.key.prefix().is_some(), a.key.local_name().as_ref()) {
                        (false, b"name") => {
                            name = a.unescape_value().ok().map(|v| v.into_owned())
                        }
                        (true, b"id") => r_id = a.unescape_value().ok().map(|v| v.into_owned()),
                        _ => {}
                    }
                }
                match (name, r_id) {
                    (Some(name), Some(r_id)) => sheets.push((name, r_id)),
                    _ => {
                        return Err(XlsxError::InvalidFormat(
                            "workbook.xml has a <sheet> without name or r:id".into(),
                        ))
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// The anchor of a shared formula group, for expanding its members
struct SharedAnchor {
    row: u32,
    col: u16,
    text: String,
}

/// Attributes and content of the `<c>` element being read
#[derive(Default)]
struct PendingCell {
    row: u32,
    col: u16,
    cell_type: Option<String>,
    style: u32,
    value: Option<String>,
    inline: Option<String>,
    formula: Option<String>,
    formula_type: Option<String>,
    formula_ref: Option<String>,
    formula_si: Option<u32>,
}

/// Read a worksheet part's cells and row attributes
pub(crate) fn read_worksheet(
    name: &str,
    xml: &[u8],
    shared_strings: Option<&SharedStrings>,
) -> XlsxResult<Worksheet> {
    let mut xml_reader = Reader::from_reader(xml);
    xml_reader.trim_text(false);

    let mut buf = Vec::new();
    let mut storage = CellStorage::new();
    let mut shared: HashMap<u32, SharedAnchor> = HashMap::new();

    let mut in_sheet_data = false;
    let mut current_row: u32 = 0;
    let mut next_row: u32 = 0;
    let mut next_col: u16 = 0;
    let mut cell: Option<PendingCell> = None;

    // Which text-bearing child of <c> we are in
    let mut in_value = false;
    let mut in_formula = false;
    let mut in_inline_text = false;
    let mut phonetic_depth = 0usize;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"sheetData" => in_sheet_data = true,
                b"row" if in_sheet_data => {
                    current_row = read_row_start(&e, next_row, &mut storage)?;
                    next_row = current_row + 1;
                    next_col = 0;
                }
                b"c" if in_sheet_data => {
                    let pending = read_cell_start(&e, current_row, next_col)?;
                    next_col = pending.col.saturating_add(1);
                    cell = Some(pending);
                }
                b"v" if cell.is_some() => in_value = true,
                b"f" if cell.is_some() => {
                    in_formula = true;
                    if let Some(c) = cell.as_mut() {
                        read_formula_attrs(&e, c);
                        c.formula.get_or_insert_with(String::new);
                    }
                }
                b"is" if cell.is_some() => {
                    if let Some(c) = cell.as_mut() {
                        c.inline.get_or_insert_with(String::new);
                    }
                }
                b"rPh" if cell.is_some() => phonetic_depth += 1,
                b"t" if cell.is_some() && phonetic_depth == 0 => in_inline_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"row" if in_sheet_data => {
                    current_row = read_row_start(&e, next_row, &mut storage)?;
                    next_row = current_row + 1;
                    next_col = 0;
                }
                b"c" if in_sheet_data => {
                    let pending = read_cell_start(&e, current_row, next_col)?;
                    next_col = pending.col.saturating_add(1);
                    finish_cell(pending, shared_strings, &mut shared, &mut storage)?;
                }
                b"f" => {
                    if let Some(c) = cell.as_mut() {
                        read_formula_attrs(&e, c);
                        c.formula.get_or_insert_with(String::new);
                    }
                }
                b"v" => {
                    if let Some(c) = cell.as_mut() {
                        c.value.get_or_insert_with(String::new);
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"sheetData" => in_sheet_data = false,
                b"c" => {
                    if let Some(pending) = cell.take() {
                        finish_cell(pending, shared_strings, &mut shared, &mut storage)?;
                    }
                }
                b"v" => in_value = false,
                b"f" => in_formula = false,
                b"t" => in_inline_text = false,
                b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                _ => {}
            },
            Ok(Event::Text(e)) if in_value || in_formula || in_inline_text => {
                let text = e.unescape()?;
                if let Some(c) = cell.as_mut() {
                    let slot = if in_value {
                        &mut c.value
                    } else if in_formula {
                        &mut c.formula
                    } else {
                        &mut c.inline
                    };
                    slot.get_or_insert_with(String::new).push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    log::debug!(
        "read sheet '{}': {} cells, {} shared formula groups",
        name,
        storage.cell_count(),
        shared.len()
    );
    Ok(Worksheet::from_storage(name, storage))
}

/// Record a `<row>` element's attributes; returns its 0-based index.
///
/// Rows without `r` take `next_row`.
fn read_row_start(e: &BytesStart<'_>, next_row: u32, storage: &mut CellStorage) -> XlsxResult<u32> {
    let mut row: Option<u32> = None;
    let mut props = RowProperties::default();
    let mut custom_format = false;
    let mut style: Option<u32> = None;

    for a in e.attributes().flatten() {
        let key = a.key.as_ref();
        let val = a.unescape_value()?;
        match key {
            b"r" => {
                row = Some(
                    val.parse::<u32>()
                        .ok()
                        .and_then(|r| r.checked_sub(1))
                        .ok_or_else(|| XlsxError::Parse(format!("invalid row number '{}'", val)))?,
                )
            }
            b"s" => style = val.parse().ok(),
            b"customFormat" => custom_format = is_true(&val),
            b"ht" => props.height = val.parse().ok(),
            b"customHeight" => props.custom_height = is_true(&val),
            b"hidden" => props.hidden = is_true(&val),
            b"outlineLevel" => props.outline_level = val.parse().unwrap_or(0),
            b"collapsed" => props.collapsed = is_true(&val),
            // Recomputed by readers; stale after rows move
            b"spans" => {}
            _ => props
                .extra
                .push((String::from_utf8_lossy(key).into_owned(), val.into_owned())),
        }
    }

    match (custom_format, style) {
        (true, Some(s)) => props.style_index = Some(s),
        (false, Some(s)) => props.extra.push(("s".to_string(), s.to_string())),
        _ => {}
    }

    let row = row.unwrap_or(next_row);
    storage.set_row_properties(row, props);
    Ok(row)
}

fn read_cell_start(e: &BytesStart<'_>, row: u32, next_col: u16) -> XlsxResult<PendingCell> {
    let mut pending = PendingCell {
        row,
        col: next_col,
        ..Default::default()
    };

    for a in e.attributes().flatten() {
        let val = a.unescape_value()?;
        match a.key.as_ref() {
            b"r" => {
                let addr = CellAddress::parse(&val)?;
                pending.row = addr.row;
                pending.col = addr.col;
            }
            b"t" => pending.cell_type = Some(val.into_owned()),
            b"s" => pending.style = val.parse().unwrap_or(0),
            _ => {}
        }
    }

    Ok(pending)
}

fn read_formula_attrs(e: &BytesStart<'_>, cell: &mut PendingCell) {
    for a in e.attributes().flatten() {
        let Ok(val) = a.unescape_value() else {
            continue;
        };
        match a.key.as_ref() {
            b"t" => cell.formula_type = Some(val.into_owned()),
            b"ref" => cell.formula_ref = Some(val.into_owned()),
            b"si" => cell.formula_si = val.parse().ok(),
            _ => {}
        }
    }
}

/// Turn a fully read `<c>` into a stored cell
fn finish_cell(
    pending: PendingCell,
    shared_strings: Option<&SharedStrings>,
    shared: &mut HashMap<u32, SharedAnchor>,
    storage: &mut CellStorage,
) -> XlsxResult<()> {
    let value = literal_value(&pending, shared_strings)?;

    let value = match pending.formula {
        Some(text) => {
            let (text, kind) = match (pending.formula_type.as_deref(), pending.formula_si) {
                (Some("shared"), Some(si)) => {
                    let range = pending
                        .formula_ref
                        .as_deref()
                        .map(CellRange::parse)
                        .transpose()?;
                    let text = if range.is_some() && !text.is_empty() {
                        shared.insert(
                            si,
                            SharedAnchor {
                                row: pending.row,
                                col: pending.col,
                                text: text.clone(),
                            },
                        );
                        text
                    } else {
                        match shared.get(&si) {
                            Some(anchor) => translate_shared_formula(
                                &anchor.text,
                                pending.row as i64 - anchor.row as i64,
                                pending.col as i64 - anchor.col as i64,
                            ),
                            None => {
                                log::warn!(
                                    "shared formula {} used before its anchor at {}",
                                    si,
                                    CellAddress::new(pending.row, pending.col)
                                );
                                text
                            }
                        }
                    };
                    (text, FormulaKind::Shared { index: si, range })
                }
                (Some("array"), _) => match pending.formula_ref.as_deref() {
                    Some(r) => (
                        text,
                        FormulaKind::Array {
                            range: CellRange::parse(r)?,
                        },
                    ),
                    None => (text, FormulaKind::Normal),
                },
                _ => (text, FormulaKind::Normal),
            };

            CellValue::Formula {
                text: format!("={}", text),
                cached_value: (!value.is_empty()).then(|| Box::new(value)),
                kind,
            }
        }
        None => value,
    };

    storage.insert(pending.row, pending.col, CellData::with_style(value, pending.style));
    Ok(())
}

/// The cell's literal (or cached) value from `<v>` / `<is>`
fn literal_value(
    pending: &PendingCell,
    shared_strings: Option<&SharedStrings>,
) -> XlsxResult<CellValue> {
    let raw = pending.value.as_deref();

    let value = match pending.cell_type.as_deref() {
        Some("s") => match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(index) => {
                let index: u32 = index
                    .parse()
                    .map_err(|_| XlsxError::Parse(format!("invalid string index '{}'", index)))?;
                let text = shared_strings.and_then(|sst| sst.get(index)).ok_or_else(|| {
                    XlsxError::Parse(format!("shared string {} does not exist", index))
                })?;
                CellValue::String(text.to_string())
            }
            None => CellValue::Empty,
        },
        Some("inlineStr") => match pending.inline.as_deref().or(raw) {
            Some(text) => CellValue::String(decode_excel_escapes(text)),
            None => CellValue::Empty,
        },
        Some("str") => match raw {
            Some(text) => CellValue::String(decode_excel_escapes(text)),
            None => CellValue::Empty,
        },
        Some("b") => match raw.map(str::trim) {
            Some(v) if !v.is_empty() => CellValue::Boolean(v == "1" || v.eq_ignore_ascii_case("true")),
            _ => CellValue::Empty,
        },
        Some("e") => match raw {
            Some(v) => CellError::parse(v)
                .map(CellValue::Error)
                .unwrap_or_else(|| CellValue::String(v.to_string())),
            None => CellValue::Empty,
        },
        Some("d") => match raw {
            Some(text) => CellValue::Date(text.to_string()),
            None => CellValue::Empty,
        },
        _ => match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(num) => CellValue::Number(
                num.parse()
                    .map_err(|_| XlsxError::Parse(format!("invalid number '{}'", num)))?,
            ),
            None => CellValue::Empty,
        },
    };

    Ok(value)
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

fn is_true(v: &str) -> bool {
    v == "1" || v.eq_ignore_ascii_case("true")
}
