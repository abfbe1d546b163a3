//! Builds a small quote template (`.xlsm`) for the fill tests.
//!
//! Sheets: `Paramètre` (labels in B, styled inputs in C), `Cotation`
//! (header row 7, template row 8 with a formula in H, total on row 10) and
//! `Notes`. The package carries a calc chain and a fake VBA project.

#![allow(dead_code)]

use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const VBA_PROJECT: &[u8] = b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1Attribute VB_Name = \"ThisWorkbook\"";

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const WORKSHEET_CT: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";

pub const PARAMETRE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><dimension ref="B7:C22"/><sheetData><row r="7"><c r="B7" t="s"><v>0</v></c><c r="C7" s="1"/></row><row r="21"><c r="B21" t="s"><v>1</v></c><c r="C21" s="1"/></row><row r="22"><c r="C22" s="1"/></row></sheetData><pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/></worksheet>"#;

pub const COTATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><dimension ref="A7:H10"/><cols><col min="1" max="8" width="14" customWidth="1"/></cols><sheetData><row r="7"><c r="A7" s="1" t="s"><v>2</v></c><c r="H7" s="1" t="s"><v>3</v></c></row><row r="8" ht="20.25" customHeight="1"><c r="A8" s="1"/><c r="B8" s="1"/><c r="C8" s="2"/><c r="D8" s="1"/><c r="E8" s="2"/><c r="F8" s="2"/><c r="G8" s="2"/><c r="H8" s="2"><f>C8*E8*F8</f><v>0</v></c></row><row r="10"><c r="G10" s="1" t="s"><v>4</v></c><c r="H10" s="2"><f>SUM(H8:H8)</f><v>0</v></c></row></sheetData><mergeCells count="1"><mergeCell ref="A10:F10"/></mergeCells></worksheet>"#;

pub const NOTES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><dimension ref="A1"/><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>Ne pas modifier</t></is></c></row></sheetData></worksheet>"#;

const STYLES: &str = r##"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><numFmts count="1"><numFmt numFmtId="164" formatCode="#,##0.00\ &quot;$&quot;"/></numFmts><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="2"><border><left/><right/><top/><bottom/><diagonal/></border><border><left style="thin"/><right style="thin"/><top style="thin"/><bottom style="thin"/><diagonal/></border></borders><cellXfs count="3"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="1" applyFont="1" applyBorder="1"/><xf numFmtId="164" fontId="0" fillId="0" borderId="1" applyNumberFormat="1" applyBorder="1"/></cellXfs></styleSheet>"##;

const SHARED_STRINGS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="5" uniqueCount="5"><si><t>Client</t></si><si><t>Projet</t></si><si><t>Ligne</t></si><si><t>Prix</t></si><si><t>Total</t></si></sst>"#;

const CALC_CHAIN: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<calcChain xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><c r="H8" i="2"/><c r="H10"/></calcChain>"#;

/// Template with the three stock sheets
pub fn quote_template() -> Vec<u8> {
    template_with_sheets(&[("Paramètre", PARAMETRE), ("Cotation", COTATION), ("Notes", NOTES)])
}

/// Template holding exactly `sheets` (name, worksheet XML), in tab order
pub fn template_with_sheets(sheets: &[(&str, &str)]) -> Vec<u8> {
    let mut overrides = String::new();
    let mut sheet_entries = String::new();
    let mut rels = String::new();
    let mut parts: Vec<(String, Vec<u8>)> = Vec::new();

    for (i, (name, xml)) in sheets.iter().enumerate() {
        let n = i + 1;
        overrides.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="{WORKSHEET_CT}"/>"#
        ));
        sheet_entries.push_str(&format!(r#"<sheet name="{name}" sheetId="{n}" r:id="rId{n}"/>"#));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{n}.xml"/>"#
        ));
        parts.push((format!("xl/worksheets/sheet{n}.xml"), xml.as_bytes().to_vec()));
    }
    rels.push_str(&format!(
        r#"<Relationship Id="rId101" Type="{REL_NS}/styles" Target="styles.xml"/><Relationship Id="rId102" Type="{REL_NS}/sharedStrings" Target="sharedStrings.xml"/><Relationship Id="rId103" Type="{REL_NS}/calcChain" Target="calcChain.xml"/><Relationship Id="rId104" Type="http://schemas.microsoft.com/office/2006/relationships/vbaProject" Target="vbaProject.bin"/>"#
    ));

    let content_types = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="bin" ContentType="application/vnd.ms-office.vbaProject"/><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.ms-excel.sheet.macroEnabled.main+xml"/>{overrides}<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/><Override PartName="/xl/calcChain.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.calcChain+xml"/></Types>"#
    );
    let root_rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
    );
    let workbook = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><workbookPr codeName="ThisWorkbook"/><sheets>{sheet_entries}</sheets><calcPr calcId="191029"/></workbook>"#
    );
    let workbook_rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
    );

    let mut all: Vec<(String, Vec<u8>)> = vec![
        ("[Content_Types].xml".into(), content_types.into_bytes()),
        ("_rels/.rels".into(), root_rels.into_bytes()),
        ("xl/workbook.xml".into(), workbook.into_bytes()),
        ("xl/_rels/workbook.xml.rels".into(), workbook_rels.into_bytes()),
    ];
    all.extend(parts);
    all.push(("xl/styles.xml".into(), STYLES.as_bytes().to_vec()));
    all.push(("xl/sharedStrings.xml".into(), SHARED_STRINGS.as_bytes().to_vec()));
    all.push(("xl/calcChain.xml".into(), CALC_CHAIN.as_bytes().to_vec()));
    all.push(("xl/vbaProject.bin".into(), VBA_PROJECT.to_vec()));

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in &all {
        let method = if name.ends_with(".bin") {
            CompressionMethod::Stored
        } else {
            CompressionMethod::Deflated
        };
        zip.start_file(name.as_str(), SimpleFileOptions::default().compression_method(method))
            .unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// Write `bytes` as `name` in `dir`
pub fn write_template(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Decompressed content of one package entry
pub fn read_entry(path: &Path, name: &str) -> Option<Vec<u8>> {
    let bytes = std::fs::read(path).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).ok()?;
    let mut data = Vec::new();
    file.read_to_end(&mut data).unwrap();
    Some(data)
}

/// Request JSON for `template` -> `output` with the given `quoteData`
pub fn request_json(template: &Path, output: &Path, quote_data: serde_json::Value) -> String {
    serde_json::json!({
        "templatePath": template,
        "outputPath": output,
        "quoteData": quote_data,
    })
    .to_string()
}
