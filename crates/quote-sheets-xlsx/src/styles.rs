//! XLSX styles (styles.xml) reading
//!
//! Resolves every `cellXfs` record into a full [`Style`] so callers can
//! inspect what a cell's style index means. The part itself is never
//! rewritten: copying a style only copies the index.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use quote_sheets_core::style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    HorizontalAlignment, NumberFormat, Protection, Style, StyleTable, VerticalAlignment,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    NumFmts,
    Fonts,
    Fills,
    Borders,
    CellXfs,
    /// Containers whose children look like ours but mean something else
    /// (`cellStyleXfs`, `dxfs`, ...)
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
    Diagonal,
}

#[derive(Debug, Default)]
struct FillParts {
    pattern: String,
    foreground: Color,
    background: Color,
    gradient: bool,
}

#[derive(Debug, Default)]
struct XfParts {
    num_fmt_id: u32,
    font_id: u32,
    fill_id: u32,
    border_id: u32,
    alignment: Alignment,
    protection: Protection,
}

#[derive(Debug)]
struct StylesParser {
    section: Section,
    numfmts: HashMap<u32, String>,
    fonts: Vec<FontStyle>,
    fills: Vec<FillStyle>,
    borders: Vec<BorderStyle>,
    cell_xfs: Vec<XfParts>,

    font: Option<FontStyle>,
    fill: Option<FillParts>,
    border: Option<BorderStyle>,
    edge: Option<Edge>,
    xf: Option<XfParts>,
}

/// Parse `styles.xml` into the workbook's style table
pub(crate) fn read_styles_xml(xml: &[u8]) -> XlsxResult<StyleTable> {
    let mut xml_reader = Reader::from_reader(xml);
    xml_reader.trim_text(true);

    let mut parser = StylesParser::new();
    let mut buf = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => parser.open(&e),
            Ok(Event::Empty(e)) => {
                parser.open(&e);
                parser.close(e.local_name().as_ref());
            }
            Ok(Event::End(e)) => parser.close(e.local_name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(parser.finish())
}

impl StylesParser {
    fn new() -> Self {
        Self {
            section: Section::None,
            numfmts: HashMap::new(),
            fonts: Vec::new(),
            fills: Vec::new(),
            borders: Vec::new(),
            cell_xfs: Vec::new(),
            font: None,
            fill: None,
            border: None,
            edge: None,
            xf: None,
        }
    }

    fn open(&mut self, e: &BytesStart<'_>) {
        let name = e.local_name();
        match (self.section, name.as_ref()) {
            (_, b"numFmts") => self.section = Section::NumFmts,
            (_, b"fonts") => self.section = Section::Fonts,
            (_, b"fills") => self.section = Section::Fills,
            (_, b"borders") => self.section = Section::Borders,
            (_, b"cellXfs") => self.section = Section::CellXfs,
            (_, b"cellStyleXfs" | b"cellStyles" | b"dxfs" | b"tableStyles" | b"colors" | b"extLst") => {
                self.section = Section::Skipped
            }

            (Section::NumFmts, b"numFmt") => {
                let id = attr_u32(e, b"numFmtId");
                let code = attr(e, b"formatCode");
                if let (Some(id), Some(code)) = (id, code) {
                    self.numfmts.insert(id, code);
                }
            }

            (Section::Fonts, b"font") => self.font = Some(FontStyle::default()),
            (Section::Fonts, _) => {
                if let Some(font) = self.font.as_mut() {
                    apply_font_child(font, name.as_ref(), e);
                }
            }

            (Section::Fills, b"fill") => self.fill = Some(FillParts::default()),
            (Section::Fills, b"patternFill") => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.pattern = attr(e, b"patternType").unwrap_or_default();
                }
            }
            (Section::Fills, b"gradientFill") => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.gradient = true;
                }
            }
            (Section::Fills, b"fgColor") => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.foreground = parse_color_attrs(e);
                }
            }
            (Section::Fills, b"bgColor") => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.background = parse_color_attrs(e);
                }
            }

            (Section::Borders, b"border") => self.border = Some(BorderStyle::default()),
            (Section::Borders, b"left" | b"start") => self.open_edge(Edge::Left, e),
            (Section::Borders, b"right" | b"end") => self.open_edge(Edge::Right, e),
            (Section::Borders, b"top") => self.open_edge(Edge::Top, e),
            (Section::Borders, b"bottom") => self.open_edge(Edge::Bottom, e),
            (Section::Borders, b"diagonal") => self.open_edge(Edge::Diagonal, e),
            (Section::Borders, b"color") => {
                if let (Some(border), Some(edge)) = (self.border.as_mut(), self.edge) {
                    if let Some(slot) = edge_slot(border, edge).as_mut() {
                        slot.color = parse_color_attrs(e);
                    }
                }
            }

            (Section::CellXfs, b"xf") => {
                self.xf = Some(XfParts {
                    num_fmt_id: attr_u32(e, b"numFmtId").unwrap_or(0),
                    font_id: attr_u32(e, b"fontId").unwrap_or(0),
                    fill_id: attr_u32(e, b"fillId").unwrap_or(0),
                    border_id: attr_u32(e, b"borderId").unwrap_or(0),
                    ..Default::default()
                })
            }
            (Section::CellXfs, b"alignment") => {
                if let Some(xf) = self.xf.as_mut() {
                    xf.alignment = parse_alignment(e);
                }
            }
            (Section::CellXfs, b"protection") => {
                if let Some(xf) = self.xf.as_mut() {
                    if let Some(v) = attr(e, b"locked") {
                        xf.protection.locked = is_true(&v);
                    }
                    if let Some(v) = attr(e, b"hidden") {
                        xf.protection.hidden = is_true(&v);
                    }
                }
            }

            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        match (self.section, name) {
            (_, b"numFmts" | b"fonts" | b"fills" | b"borders" | b"cellXfs") => {
                self.section = Section::None
            }
            (_, b"cellStyleXfs" | b"cellStyles" | b"dxfs" | b"tableStyles" | b"colors" | b"extLst") => {
                self.section = Section::None
            }
            (Section::Fonts, b"font") => {
                if let Some(font) = self.font.take() {
                    self.fonts.push(font);
                }
            }
            (Section::Fills, b"fill") => {
                if let Some(parts) = self.fill.take() {
                    self.fills.push(if parts.gradient {
                        FillStyle::Gradient
                    } else {
                        FillStyle::from_pattern(&parts.pattern, parts.foreground, parts.background)
                    });
                }
            }
            (Section::Borders, b"border") => {
                if let Some(border) = self.border.take() {
                    self.borders.push(border);
                }
            }
            (Section::Borders, b"left" | b"start" | b"right" | b"end" | b"top" | b"bottom" | b"diagonal") => {
                self.edge = None
            }
            (Section::CellXfs, b"xf") => {
                if let Some(xf) = self.xf.take() {
                    self.cell_xfs.push(xf);
                }
            }
            _ => {}
        }
    }

    fn open_edge(&mut self, edge: Edge, e: &BytesStart<'_>) {
        let Some(border) = self.border.as_mut() else {
            return;
        };
        self.edge = Some(edge);
        let style = attr(e, b"style")
            .map(|s| BorderLineStyle::from_ooxml(&s))
            .unwrap_or_default();
        // Create edge with default color; a nested <color> may overwrite it
        *edge_slot(border, edge) = (style != BorderLineStyle::None).then(|| BorderEdge {
            style,
            color: Color::Auto,
        });
    }

    fn finish(self) -> StyleTable {
        let styles = self
            .cell_xfs
            .into_iter()
            .map(|xf| resolve_style(xf, &self.numfmts, &self.fonts, &self.fills, &self.borders))
            .collect();
        StyleTable::from_styles(styles)
    }
}

fn resolve_style(
    xf: XfParts,
    numfmts: &HashMap<u32, String>,
    fonts: &[FontStyle],
    fills: &[FillStyle],
    borders: &[BorderStyle],
) -> Style {
    let number_format = if xf.num_fmt_id == 0 {
        NumberFormat::General
    } else if let Some(code) = numfmts.get(&xf.num_fmt_id) {
        NumberFormat::Custom {
            id: xf.num_fmt_id,
            code: code.clone(),
        }
    } else {
        NumberFormat::BuiltIn(xf.num_fmt_id)
    };

    Style {
        font: fonts.get(xf.font_id as usize).cloned().unwrap_or_default(),
        fill: fills.get(xf.fill_id as usize).cloned().unwrap_or_default(),
        border: borders.get(xf.border_id as usize).cloned().unwrap_or_default(),
        alignment: xf.alignment,
        number_format,
        protection: xf.protection,
    }
}

fn apply_font_child(font: &mut FontStyle, name: &[u8], e: &BytesStart<'_>) {
    // Toggles are on unless val says otherwise (<b/>, <b val="0"/>)
    let toggle = || attr(e, b"val").map_or(true, |v| is_true(&v));
    match name {
        b"b" => font.bold = toggle(),
        b"i" => font.italic = toggle(),
        b"strike" => font.strikethrough = toggle(),
        b"u" => font.underline = attr(e, b"val").map_or(true, |v| v != "none"),
        b"sz" => {
            if let Some(size) = attr(e, b"val").and_then(|v| v.parse::<f64>().ok()) {
                font.size = size;
            }
        }
        b"name" => {
            if let Some(v) = attr(e, b"val") {
                font.name = v;
            }
        }
        b"color" => font.color = parse_color_attrs(e),
        _ => {}
    }
}

fn parse_alignment(e: &BytesStart<'_>) -> Alignment {
    let mut align = Alignment::default();
    for a in e.attributes().flatten() {
        let val = match a.unescape_value() {
            Ok(v) => v,
            Err(_) => continue,
        };
        match a.key.local_name().as_ref() {
            b"horizontal" => align.horizontal = HorizontalAlignment::from_ooxml(&val),
            b"vertical" => align.vertical = VerticalAlignment::from_ooxml(&val),
            b"wrapText" => align.wrap_text = is_true(&val),
            b"shrinkToFit" => align.shrink_to_fit = is_true(&val),
            b"indent" => align.indent = val.parse::<u8>().unwrap_or(0),
            b"textRotation" => align.rotation = val.parse::<i16>().unwrap_or(0),
            _ => {}
        }
    }
    align
}

fn parse_color_attrs(e: &BytesStart<'_>) -> Color {
    // Priority: rgb > theme > indexed > auto
    if let Some(color) = attr(e, b"rgb").and_then(|rgb| Color::from_hex(&rgb)) {
        return color;
    }
    if let Some(index) = attr(e, b"theme").and_then(|s| s.parse::<u8>().ok()) {
        let tint = attr(e, b"tint")
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.0);
        return Color::theme(index, tint);
    }
    if let Some(i) = attr(e, b"indexed").and_then(|s| s.parse::<u8>().ok()) {
        return Color::Indexed(i);
    }
    Color::Auto
}

fn edge_slot(border: &mut BorderStyle, edge: Edge) -> &mut Option<BorderEdge> {
    match edge {
        Edge::Left => &mut border.left,
        Edge::Right => &mut border.right,
        Edge::Top => &mut border.top,
        Edge::Bottom => &mut border.bottom,
        Edge::Diagonal => &mut border.diagonal,
    }
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

fn attr_u32(e: &BytesStart<'_>, key: &[u8]) -> Option<u32> {
    attr(e, key).and_then(|v| v.parse().ok())
}

fn is_true(v: &str) -> bool {
    v == "1" || v.eq_ignore_ascii_case("true")
}
