//! XLSX part writers
//!
//! A modified worksheet is written by streaming its original XML through and
//! swapping in a freshly generated `<sheetData>` and `<dimension>`. Column
//! widths, merged cells, conditional formats, page setup, drawings and
//! extension lists pass through untouched.

mod parts;

use std::fmt::Write as _;
use std::io::Write as _;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use quick_xml::Writer;

use crate::error::{XlsxError, XlsxResult};
use crate::shared_strings::SharedStrings;
use quote_sheets_core::{CellAddress, CellData, CellValue, FormulaKind, RowProperties, Worksheet};

pub(crate) use parts::{drop_content_type_override, drop_relationships, force_full_calc_on_load};

/// Escape text for use in XML content or attribute values
pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Encode characters XML 1.0 cannot carry (and literal `_xHHHH_` runs) the
/// way Excel does, as `_xHHHH_`.
pub(crate) fn encode_excel_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        let control = (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r');
        let looks_escaped = c == '_' && is_excel_escape(&s[i..]);
        if control || looks_escaped {
            let _ = write!(out, "_x{:04X}_", c as u32);
        } else {
            out.push(c);
        }
    }
    out
}

fn is_excel_escape(s: &str) -> bool {
    s.len() >= 7
        && s.as_bytes()[1] == b'x'
        && s.as_bytes()[2..6].iter().all(u8::is_ascii_hexdigit)
        && s.as_bytes()[6] == b'_'
}

/// Rewrite a worksheet part from the in-memory sheet.
///
/// `original` is the part's current XML. New strings go to `shared_strings`
/// when the workbook has a table, and inline otherwise.
pub(crate) fn write_worksheet(
    original: &[u8],
    sheet: &Worksheet,
    mut shared_strings: Option<&mut SharedStrings>,
) -> XlsxResult<Vec<u8>> {
    let mut reader = Reader::from_reader(original);
    reader.trim_text(false);
    let mut writer = Writer::new(Vec::with_capacity(original.len()));

    let dimension = sheet
        .used_range()
        .map_or_else(|| "A1".to_string(), |r| r.to_a1_string());

    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();
    let mut wrote_sheet_data = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.local_name().as_ref() == b"sheetData" => {
                let prefix = element_prefix(&e);
                let end = e.to_end().into_owned();
                writer.write_event(Event::Start(e))?;

                let rows = write_rows(sheet, &prefix, shared_strings.as_deref_mut());
                writer.get_mut().write_all(rows.as_bytes())?;

                reader.read_to_end_into(end.name(), &mut skip_buf)?;
                skip_buf.clear();
                writer.write_event(Event::End(end))?;
                wrote_sheet_data = true;
            }
            Event::Empty(e) if e.local_name().as_ref() == b"sheetData" => {
                let prefix = element_prefix(&e);
                let end = e.to_end().into_owned();
                writer.write_event(Event::Start(e))?;

                let rows = write_rows(sheet, &prefix, shared_strings.as_deref_mut());
                writer.get_mut().write_all(rows.as_bytes())?;
                writer.write_event(Event::End(end))?;
                wrote_sheet_data = true;
            }
            Event::Empty(e) if e.local_name().as_ref() == b"dimension" => {
                writer.write_event(Event::Empty(with_ref(&e, &dimension)))?;
            }
            Event::Start(e) if e.local_name().as_ref() == b"dimension" => {
                writer.write_event(Event::Start(with_ref(&e, &dimension)))?;
            }
            Event::Eof => break,
            event => writer.write_event(event)?,
        }
        buf.clear();
    }

    if !wrote_sheet_data {
        return Err(XlsxError::InvalidFormat(format!(
            "worksheet '{}' has no <sheetData>",
            sheet.name()
        )));
    }

    Ok(writer.into_inner())
}

/// `"x:"` for `<x:sheetData>`, empty when unprefixed
fn element_prefix(e: &BytesStart<'_>) -> String {
    e.name()
        .prefix()
        .map(|p| format!("{}:", String::from_utf8_lossy(p.as_ref())))
        .unwrap_or_default()
}

/// Copy of `e` with its `ref` attribute set to `value`
fn with_ref(e: &BytesStart<'_>, value: &str) -> BytesStart<'static> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);
    for a in e.attributes().flatten() {
        if a.key.as_ref() == b"ref" {
            out.push_attribute(("ref", value));
        } else {
            out.push_attribute(a);
        }
    }
    if e.try_get_attribute("ref").ok().flatten().is_none() {
        out.push_attribute(("ref", value));
    }
    out
}

/// Generate the `<row>` elements for every row holding cells or attributes
fn write_rows(sheet: &Worksheet, p: &str, mut sst: Option<&mut SharedStrings>) -> String {
    let mut content = String::new();

    for row in sheet.storage().row_indices() {
        content.push_str(&format!("<{}row r=\"{}\"", p, row + 1));
        if let Some(props) = sheet.row_properties(row) {
            write_row_attrs(&mut content, props);
        }

        let mut cells = sheet.iter_row(row).peekable();
        if cells.peek().is_none() {
            content.push_str("/>");
            continue;
        }
        content.push('>');
        for (col, cell) in cells {
            write_cell(&mut content, p, row, col, cell, sst.as_deref_mut());
        }
        content.push_str(&format!("</{}row>", p));
    }

    content
}

fn write_row_attrs(content: &mut String, props: &RowProperties) {
    if let Some(s) = props.style_index {
        let _ = write!(content, " s=\"{}\" customFormat=\"1\"", s);
    }
    if let Some(ht) = props.height {
        let _ = write!(content, " ht=\"{}\"", ht);
    }
    if props.hidden {
        content.push_str(" hidden=\"1\"");
    }
    if props.custom_height {
        content.push_str(" customHeight=\"1\"");
    }
    if props.outline_level > 0 {
        let _ = write!(content, " outlineLevel=\"{}\"", props.outline_level);
    }
    if props.collapsed {
        content.push_str(" collapsed=\"1\"");
    }
    for (name, value) in &props.extra {
        let _ = write!(content, " {}=\"{}\"", name, escape_xml(value));
    }
}

fn write_cell(
    content: &mut String,
    p: &str,
    row: u32,
    col: u16,
    cell: &CellData,
    sst: Option<&mut SharedStrings>,
) {
    let cell_ref = CellAddress::new(row, col).to_a1_string();
    let style_attr = if cell.style_index != 0 {
        format!(" s=\"{}\"", cell.style_index)
    } else {
        String::new()
    };

    match &cell.value {
        CellValue::Empty => {
            let _ = write!(content, "<{p}c r=\"{}\"{}/>", cell_ref, style_attr);
        }
        CellValue::Number(n) => {
            let _ = match number_text(*n) {
                Some(v) => write!(content, "<{p}c r=\"{}\"{}><{p}v>{}</{p}v></{p}c>", cell_ref, style_attr, v),
                None => write!(
                    content,
                    "<{p}c r=\"{}\"{} t=\"e\"><{p}v>#NUM!</{p}v></{p}c>",
                    cell_ref, style_attr
                ),
            };
        }
        CellValue::String(s) => match sst {
            Some(sst) => {
                let index = sst.index_of_or_insert(s);
                let _ = write!(
                    content,
                    "<{p}c r=\"{}\"{} t=\"s\"><{p}v>{}</{p}v></{p}c>",
                    cell_ref, style_attr, index
                );
            }
            None => {
                let _ = write!(
                    content,
                    "<{p}c r=\"{}\"{} t=\"inlineStr\"><{p}is><{p}t xml:space=\"preserve\">{}</{p}t></{p}is></{p}c>",
                    cell_ref,
                    style_attr,
                    escape_xml(&encode_excel_escapes(s))
                );
            }
        },
        CellValue::Date(iso) => {
            let _ = write!(
                content,
                "<{p}c r=\"{}\"{} t=\"d\"><{p}v>{}</{p}v></{p}c>",
                cell_ref,
                style_attr,
                escape_xml(iso)
            );
        }
        CellValue::Boolean(b) => {
            let _ = write!(
                content,
                "<{p}c r=\"{}\"{} t=\"b\"><{p}v>{}</{p}v></{p}c>",
                cell_ref,
                style_attr,
                u8::from(*b)
            );
        }
        CellValue::Error(e) => {
            let _ = write!(
                content,
                "<{p}c r=\"{}\"{} t=\"e\"><{p}v>{}</{p}v></{p}c>",
                cell_ref,
                style_attr,
                escape_xml(e.as_str())
            );
        }
        CellValue::Formula {
            text,
            cached_value,
            kind,
        } => {
            let formula = escape_xml(text.strip_prefix('=').unwrap_or(text));
            // Shared groups are written out member by member as plain formulas
            let f = match kind {
                FormulaKind::Array { range } => format!(
                    "<{p}f t=\"array\" ref=\"{}\">{}</{p}f>",
                    range.to_a1_string(),
                    formula
                ),
                FormulaKind::Normal | FormulaKind::Shared { .. } => {
                    format!("<{p}f>{}</{p}f>", formula)
                }
            };
            let (t_attr, v) = match cached_value.as_deref() {
                Some(CellValue::Number(n)) => ("", number_text(*n)),
                Some(CellValue::String(s)) => (" t=\"str\"", Some(escape_xml(&encode_excel_escapes(s)))),
                Some(CellValue::Boolean(b)) => (" t=\"b\"", Some(u8::from(*b).to_string())),
                Some(CellValue::Error(e)) => (" t=\"e\"", Some(e.as_str().to_string())),
                _ => ("", None),
            };
            let _ = write!(content, "<{p}c r=\"{}\"{}{}>{}", cell_ref, style_attr, t_attr, f);
            if let Some(v) = v {
                let _ = write!(content, "<{p}v>{}</{p}v>", v);
            }
            let _ = write!(content, "</{p}c>");
        }
    }
}

/// Text of a finite number; `None` for NaN and infinities
fn number_text(n: f64) -> Option<String> {
    n.is_finite().then(|| n.to_string())
}
