//! Small edits to package plumbing parts
//!
//! Each function streams the part through quick-xml and changes only the
//! element it targets, so namespaces, `mc:Ignorable` markup and unknown
//! extensions survive.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use quick_xml::Writer;

use crate::error::XlsxResult;

/// Children of `<workbook>` that must come after `<calcPr>`
const AFTER_CALC_PR: &[&[u8]] = &[
    b"oleSize",
    b"customWorkbookViews",
    b"pivotCaches",
    b"smartTagPr",
    b"smartTagTypes",
    b"webPublishing",
    b"fileRecoveryPr",
    b"webPublishObjects",
    b"extLst",
];

/// Remove the `<Relationship>` entries whose `Id` is in `ids`
pub(crate) fn drop_relationships(xml: &[u8], ids: &[&str]) -> XlsxResult<Vec<u8>> {
    filter_elements(xml, |e| {
        e.local_name().as_ref() == b"Relationship"
            && attr(e, b"Id").map_or(false, |id| ids.contains(&id.as_str()))
    })
}

/// Remove the `<Override>` for `part_name` (e.g. `/xl/calcChain.xml`)
pub(crate) fn drop_content_type_override(xml: &[u8], part_name: &str) -> XlsxResult<Vec<u8>> {
    filter_elements(xml, |e| {
        e.local_name().as_ref() == b"Override"
            && attr(e, b"PartName").map_or(false, |p| p.eq_ignore_ascii_case(part_name))
    })
}

/// Stream `xml` through, leaving out every element `should_drop` matches
fn filter_elements(xml: &[u8], should_drop: impl Fn(&BytesStart<'_>) -> bool) -> XlsxResult<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(false);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));
    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Empty(e) if should_drop(&e) => {}
            Event::Start(e) if should_drop(&e) => {
                let end = e.to_end().into_owned();
                reader.read_to_end_into(end.name(), &mut skip_buf)?;
                skip_buf.clear();
            }
            Event::Eof => break,
            event => writer.write_event(event)?,
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

/// Make the spreadsheet application recalculate every formula on open.
///
/// Sets `fullCalcOnLoad="1"` on `<calcPr>`, adding the element in its
/// schema position when the workbook has none.
pub(crate) fn force_full_calc_on_load(xml: &[u8]) -> XlsxResult<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(false);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + 32));
    let mut buf = Vec::new();

    let mut depth = 0usize;
    let mut root_prefix = String::new();
    let mut done = false;

    loop {
        let event = reader.read_event_into(&mut buf)?;

        // Insert a fresh <calcPr/> right before its first successor
        if !done && depth == 1 {
            let successor = match &event {
                Event::Start(e) | Event::Empty(e) => {
                    AFTER_CALC_PR.contains(&e.local_name().as_ref())
                }
                Event::End(_) => true,
                _ => false,
            };
            if successor {
                let mut calc_pr = BytesStart::new(format!("{}calcPr", root_prefix));
                calc_pr.push_attribute(("fullCalcOnLoad", "1"));
                writer.write_event(Event::Empty(calc_pr))?;
                done = true;
            }
        }

        match event {
            Event::Start(e) if depth == 1 && e.local_name().as_ref() == b"calcPr" => {
                writer.write_event(Event::Start(with_full_calc(&e)))?;
                done = true;
                depth += 1;
            }
            Event::Empty(e) if depth == 1 && e.local_name().as_ref() == b"calcPr" => {
                writer.write_event(Event::Empty(with_full_calc(&e)))?;
                done = true;
            }
            Event::Start(e) => {
                if depth == 0 {
                    root_prefix = e
                        .name()
                        .prefix()
                        .map(|p| format!("{}:", String::from_utf8_lossy(p.as_ref())))
                        .unwrap_or_default();
                }
                depth += 1;
                writer.write_event(Event::Start(e))?;
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                writer.write_event(Event::End(e))?;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

fn with_full_calc(e: &BytesStart<'_>) -> BytesStart<'static> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);
    for a in e.attributes().flatten() {
        if a.key.as_ref() != b"fullCalcOnLoad" {
            out.push_attribute(a);
        }
    }
    out.push_attribute(("fullCalcOnLoad", "1"));
    out
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}
