//! Editing sheets and saving the package back.

use crate::{entry_names, quote_template, raw_entry, read_entry, read_entry_text, VBA_PROJECT};
use pretty_assertions::assert_eq;
use quote_sheets_core::CellValue;
use quote_sheets_xlsx::XlsxDocument;

fn edited_template() -> (Vec<u8>, Vec<u8>) {
    let original = quote_template();
    let mut doc = XlsxDocument::from_bytes(original.clone()).unwrap();

    let sheet = doc.sheet_mut("Cotation").unwrap();
    sheet.insert_rows(8, 1);
    sheet.copy_row_format(7, 8, 7).unwrap();
    sheet.set_cell_value("A8", "L1").unwrap();
    sheet.set_cell_value("A9", "L2").unwrap();
    sheet.set_cell_value("C9", 3.0).unwrap();

    let saved = doc.to_bytes().unwrap();
    (original, saved)
}

#[test]
fn test_unmodified_document_saves_identical_bytes() {
    let original = quote_template();
    let doc = XlsxDocument::from_bytes(original.clone()).unwrap();

    assert_eq!(doc.to_bytes().unwrap(), original);
}

#[test]
fn test_untouched_parts_copied_raw() {
    let (original, saved) = edited_template();

    for part in ["xl/vbaProject.bin", "xl/worksheets/sheet1.xml", "xl/worksheets/sheet3.xml", "xl/styles.xml"] {
        assert_eq!(raw_entry(&saved, part), raw_entry(&original, part), "{}", part);
    }
    assert_eq!(read_entry(&saved, "xl/vbaProject.bin").unwrap(), VBA_PROJECT);
}

#[test]
fn test_entry_order_kept_and_calc_chain_dropped() {
    let (original, saved) = edited_template();

    let expected: Vec<String> = entry_names(&original)
        .into_iter()
        .filter(|n| n != "xl/calcChain.xml")
        .collect();
    assert_eq!(entry_names(&saved), expected);

    let rels = read_entry_text(&saved, "xl/_rels/workbook.xml.rels");
    assert!(!rels.contains("calcChain"));
    assert!(rels.contains(r#"Target="vbaProject.bin""#));

    let types = read_entry_text(&saved, "[Content_Types].xml");
    assert!(!types.contains("/xl/calcChain.xml"));
    assert!(types.contains("/xl/worksheets/sheet2.xml"));

    let workbook = read_entry_text(&saved, "xl/workbook.xml");
    assert!(workbook.contains(r#"<calcPr calcId="191029" fullCalcOnLoad="1"/>"#));
}

#[test]
fn test_edited_sheet_rewritten_around_sheet_data() {
    let (_, saved) = edited_template();
    let xml = read_entry_text(&saved, "xl/worksheets/sheet2.xml");

    assert!(xml.contains(r#"<dimension ref="A1:H11"/>"#));
    assert!(xml.contains(r#"<cols><col min="1" max="8" width="12" customWidth="1"/></cols>"#));
    // Merged ranges are left where they were
    assert!(xml.contains(r#"<mergeCells count="1"><mergeCell ref="A1:D1"/></mergeCells>"#));
    assert!(xml.contains(r#"<row r="9" ht="18" customHeight="1">"#));
    // Total row moved down, its formula text untouched
    assert!(xml.contains(r#"<c r="H11" s="2"><f>SUM(H8:H8)</f><v>0</v></c>"#));
    // Copied formula keeps the literal text and has no cached value
    assert!(xml.contains(r#"<c r="H9" s="2"><f>C8*E8*F8</f></c>"#));
}

#[test]
fn test_new_strings_appended_to_shared_table() {
    let (_, saved) = edited_template();
    let sst = read_entry_text(&saved, "xl/sharedStrings.xml");

    assert!(sst.contains(r#"uniqueCount="8""#));
    assert!(sst.contains("<si><t>Client</t></si>"));
    assert!(sst.ends_with(
        r#"<si><t xml:space="preserve">Devis</t></si><si><t xml:space="preserve">L1</t></si><si><t xml:space="preserve">L2</t></si></sst>"#
    ));
}

#[test]
fn test_saved_file_reopens_with_edits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devis.xlsm");
    std::fs::write(&path, quote_template()).unwrap();

    let mut doc = XlsxDocument::open(&path).unwrap();
    {
        let sheet = doc.sheet_mut("Paramètre").unwrap();
        sheet.set_cell_value("C7", "ACME SA").unwrap();
        sheet.set_cell_value("C8", 42.5).unwrap();
    }
    doc.save(&path).unwrap();

    let reopened = XlsxDocument::open(&path).unwrap();
    let sheet = reopened.sheet("Paramètre").unwrap();
    assert_eq!(sheet.get_value("B7").unwrap(), CellValue::string("Client"));
    assert_eq!(sheet.get_value("C7").unwrap(), CellValue::string("ACME SA"));
    assert_eq!(sheet.get_value("C8").unwrap(), CellValue::Number(42.5));
    assert_eq!(sheet.cell_style_index("C7").unwrap(), 1);
    assert!(reopened.has_macros());

    // Untouched sheet still reads the same
    let notes = reopened.sheet("Notes").unwrap();
    assert_eq!(notes.get_value("A1").unwrap(), CellValue::string("Notes"));
}
