//! Loading the fixture workbook into the model.

use crate::{build_package, quote_template, template_parts};
use pretty_assertions::assert_eq;
use quote_sheets_core::{BorderLineStyle, CellValue, NumberFormat};
use quote_sheets_xlsx::{XlsxDocument, XlsxError};

#[test]
fn test_sheets_in_tab_order() {
    let doc = XlsxDocument::from_bytes(quote_template()).unwrap();

    assert_eq!(doc.sheet_names(), vec!["Paramètre", "Cotation", "Notes"]);
    assert!(doc.has_macros());
}

#[test]
fn test_cell_values_and_styles() {
    let doc = XlsxDocument::from_bytes(quote_template()).unwrap();
    let sheet = doc.sheet("Cotation").unwrap();

    assert_eq!(sheet.get_value("A1").unwrap(), CellValue::string("Devis"));
    assert_eq!(sheet.get_value("B7").unwrap(), CellValue::string("Référence"));
    assert_eq!(sheet.get_value("G10").unwrap(), CellValue::string("Total"));

    let h8 = sheet.get_value("H8").unwrap();
    assert_eq!(h8.formula_text(), Some("=C8*E8*F8"));
    assert_eq!(h8.as_number(), Some(0.0));

    // Styled but empty template cells are kept
    assert!(sheet.get_value("A8").unwrap().is_empty());
    assert_eq!(sheet.cell_style_index("A8").unwrap(), 1);
    assert_eq!(sheet.cell_style_index("C8").unwrap(), 2);

    let props = sheet.row_properties(7).unwrap();
    assert_eq!(props.height, Some(18.0));
    assert!(props.custom_height);
}

#[test]
fn test_styles_resolved_from_cell_xfs() {
    let doc = XlsxDocument::from_bytes(quote_template()).unwrap();

    let bold = doc.workbook().cell_style("Cotation", 7, 0).unwrap();
    assert!(bold.font.bold);
    assert_eq!(
        bold.border.left.as_ref().map(|e| e.style),
        Some(BorderLineStyle::Thin)
    );

    let amount = doc.workbook().cell_style("Cotation", 7, 2).unwrap();
    assert!(!amount.font.bold);
    assert_eq!(amount.number_format, NumberFormat::BuiltIn(4));
}

#[test]
fn test_missing_sheet() {
    let doc = XlsxDocument::from_bytes(quote_template()).unwrap();

    match doc.sheet("Résumé") {
        Err(XlsxError::SheetNotFound(name)) => assert_eq!(name, "Résumé"),
        other => panic!("expected SheetNotFound, got {:?}", other.map(|s| s.name().to_string())),
    }
}

#[test]
fn test_open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.xlsm");

    let err = XlsxDocument::open(&path).unwrap_err();
    assert!(matches!(err, XlsxError::NotFound(p) if p == path));
}

#[test]
fn test_rejects_non_ooxml_zip() {
    let parts: Vec<_> = template_parts()
        .into_iter()
        .filter(|(name, _)| *name != "[Content_Types].xml")
        .collect();

    let err = XlsxDocument::from_bytes(build_package(&parts)).unwrap_err();
    assert!(matches!(err, XlsxError::InvalidFormat(_)));

    let err = XlsxDocument::from_bytes(b"not a zip".to_vec()).unwrap_err();
    assert!(matches!(err, XlsxError::Zip(_)));
}
