//! Shared string table (`xl/sharedStrings.xml`)
//!
//! Existing `<si>` items are never rewritten: they may carry rich text runs
//! that the plain-text view below does not model. New strings are appended
//! at the end of the table, so every index a sheet already uses stays valid.

use ahash::AHashMap;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::reader::decode_excel_escapes;
use crate::writer::{encode_excel_escapes, escape_xml};

/// Plain-text view of a workbook's shared string table
#[derive(Debug, Clone)]
pub(crate) struct SharedStrings {
    part: String,
    items: Vec<String>,
    lookup: AHashMap<String, u32>,
    original_len: usize,
}

impl SharedStrings {
    /// Parse the table stored at `part`
    pub fn parse(part: &str, xml: &[u8]) -> XlsxResult<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(false);

        let mut buf = Vec::new();
        let mut items = Vec::new();
        let mut current = String::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut phonetic_depth = 0usize;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current.clear();
                    }
                    b"rPh" if in_si => phonetic_depth += 1,
                    b"t" if in_si && phonetic_depth == 0 => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                    items.push(String::new());
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = false;
                        items.push(decode_excel_escapes(&current));
                    }
                    b"rPh" if phonetic_depth > 0 => phonetic_depth -= 1,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    let text = e.unescape()?;
                    current.push_str(&text);
                }
                Ok(Event::CData(e)) if in_t => {
                    current.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(Self::from_items(part, items))
    }

    fn from_items(part: &str, items: Vec<String>) -> Self {
        let mut lookup = AHashMap::with_capacity(items.len());
        for (i, text) in items.iter().enumerate() {
            lookup.entry(text.clone()).or_insert(i as u32);
        }
        Self {
            part: part.to_string(),
            original_len: items.len(),
            items,
            lookup,
        }
    }

    /// Package part holding the table
    pub fn part(&self) -> &str {
        &self.part
    }

    /// Text of item `index`
    pub fn get(&self, index: u32) -> Option<&str> {
        self.items.get(index as usize).map(String::as_str)
    }

    /// Number of items, including appended ones
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether strings were appended since parsing
    pub fn has_new_items(&self) -> bool {
        self.items.len() > self.original_len
    }

    /// Index of `text`, appending it when the table does not hold it yet.
    ///
    /// When several items share the same plain text the first one wins.
    pub fn index_of_or_insert(&mut self, text: &str) -> u32 {
        if let Some(&index) = self.lookup.get(text) {
            return index;
        }
        let index = self.items.len() as u32;
        self.items.push(text.to_string());
        self.lookup.insert(text.to_string(), index);
        index
    }

    /// Append the new items to the original table XML.
    ///
    /// Everything before `</sst>` is kept as-is; `count` and `uniqueCount`
    /// on the root element are refreshed.
    pub fn patch_xml(&self, original: &[u8]) -> XlsxResult<Vec<u8>> {
        let xml = std::str::from_utf8(original)
            .map_err(|e| XlsxError::Parse(format!("sharedStrings.xml is not UTF-8: {}", e)))?;

        let (head, close_tag) = split_before_root_close(xml)?;

        let mut out = String::with_capacity(xml.len() + 64 * (self.items.len() - self.original_len));
        out.push_str(&update_counts(&head, self.items.len()));
        let prefix = close_tag
            .trim_start_matches("</")
            .split_once(':')
            .map(|(p, _)| format!("{}:", p))
            .unwrap_or_default();
        for text in &self.items[self.original_len..] {
            out.push_str(&format!(
                "<{p}si><{p}t xml:space=\"preserve\">{}</{p}t></{p}si>",
                escape_xml(&encode_excel_escapes(text)),
                p = prefix
            ));
        }
        out.push_str(&close_tag);
        Ok(out.into_bytes())
    }
}

/// Split the table XML right before its closing `</sst>`.
///
/// A self-closing root (`<sst .../>`, an empty table) is opened up so items
/// can be appended.
fn split_before_root_close(xml: &str) -> XlsxResult<(String, String)> {
    let trimmed = xml.trim_end();
    if let Some(i) = trimmed.rfind("</") {
        if trimmed[i..].ends_with("sst>") {
            return Ok((xml[..i].to_string(), xml[i..].to_string()));
        }
    }

    let root = find_root_start(trimmed)
        .ok_or_else(|| XlsxError::Parse("sharedStrings.xml has no root element".into()))?;
    match trimmed.strip_suffix("/>") {
        Some(open) if trimmed[root..].ends_with("/>") => {
            let name: String = trimmed[root + 1..]
                .chars()
                .take_while(|c| !c.is_whitespace() && *c != '/' && *c != '>')
                .collect();
            Ok((format!("{}>", open.trim_end()), format!("</{}>", name)))
        }
        _ => Err(XlsxError::Parse(
            "sharedStrings.xml has no closing </sst>".into(),
        )),
    }
}

/// Rewrite `count`/`uniqueCount` on the `<sst>` start tag
fn update_counts(head: &str, unique: usize) -> String {
    let Some(tag_start) = find_root_start(head) else {
        return head.to_string();
    };
    let tag_end = match head[tag_start..].find('>') {
        Some(i) => tag_start + i,
        None => return head.to_string(),
    };
    let tag = &head[tag_start..tag_end];

    let old_count = attr_in_tag(tag, "count")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    let tag = set_attr_in_tag(tag, "uniqueCount", &unique.to_string());
    let tag = set_attr_in_tag(&tag, "count", &old_count.max(unique).to_string());

    format!("{}{}{}", &head[..tag_start], tag, &head[tag_end..])
}

fn find_root_start(head: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(i) = head[from..].find('<') {
        let at = from + i;
        let rest = &head[at + 1..];
        if !rest.starts_with('?') && !rest.starts_with('!') {
            return Some(at);
        }
        from = at + 1;
    }
    None
}

fn attr_in_tag<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!(" {}=\"", name);
    let start = tag.find(&needle)? + needle.len();
    let len = tag[start..].find('"')?;
    Some(&tag[start..start + len])
}

fn set_attr_in_tag(tag: &str, name: &str, value: &str) -> String {
    let needle = format!(" {}=\"", name);
    match tag.find(&needle) {
        Some(i) => {
            let start = i + needle.len();
            let end = tag[start..].find('"').map_or(tag.len(), |len| start + len);
            format!("{}{}{}", &tag[..start], value, &tag[end..])
        }
        None => format!("{} {}=\"{}\"", tag.trim_end_matches('/'), name, value),
    }
}
