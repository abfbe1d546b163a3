//! Open, edit and save an existing workbook package

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use quote_sheets_core::{Workbook, Worksheet};

use crate::error::{XlsxError, XlsxResult};
use crate::package::{part_dir, rels_path_for, rel_types, resolve_target, Package};
use crate::reader::{read_relationships, read_workbook_sheets, read_worksheet};
use crate::shared_strings::SharedStrings;
use crate::styles::read_styles_xml;
use crate::writer::{
    drop_content_type_override, drop_relationships, force_full_calc_on_load, write_worksheet,
};

const CONTENT_TYPES: &str = "[Content_Types].xml";
const VBA_PROJECT: &str = "xl/vbaProject.bin";

/// A workbook opened for in-place editing.
///
/// Cells, row attributes and style indices are loaded into a
/// [`Workbook`]; the package keeps every original part. On save, only the
/// worksheets handed out through [`XlsxDocument::sheet_mut`] are regenerated,
/// plus the few plumbing parts that must follow (shared strings, calc
/// settings). Everything else, `xl/vbaProject.bin` included, is copied
/// byte-for-byte.
///
/// # Example
///
/// ```no_run
/// use quote_sheets_xlsx::XlsxDocument;
///
/// let mut doc = XlsxDocument::open("quote.xlsm")?;
/// doc.sheet_mut("Paramètre")?.set_cell_value("C7", "ACME")?;
/// doc.save("quote.xlsm")?;
/// # Ok::<(), quote_sheets_xlsx::XlsxError>(())
/// ```
#[derive(Debug, Clone)]
pub struct XlsxDocument {
    package: Package,
    workbook: Workbook,
    workbook_part: String,
    /// Worksheet part per sheet, index-aligned with the workbook's sheets
    sheet_parts: Vec<String>,
    shared_strings: Option<SharedStrings>,
    /// Relationship id and part name of `calcChain.xml`
    calc_chain: Option<(String, String)>,
    dirty: BTreeSet<usize>,
}

impl XlsxDocument {
    /// Open a workbook file
    pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(XlsxError::NotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        let doc = Self::from_bytes(bytes)?;
        log::info!(
            "opened {} ({} sheets, macros: {})",
            path.display(),
            doc.workbook.sheet_count(),
            doc.has_macros()
        );
        Ok(doc)
    }

    /// Open a workbook from the bytes of an `.xlsx`/`.xlsm` file
    pub fn from_bytes(bytes: Vec<u8>) -> XlsxResult<Self> {
        let package = Package::from_bytes(bytes)?;

        let workbook_part = find_workbook_part(&package)?;
        let workbook_dir = part_dir(&workbook_part).to_string();
        let workbook_rels = read_relationships(&package.read_part(&rels_path_for(&workbook_part))?)?;
        let rel_target = |suffix: &str| {
            workbook_rels
                .iter()
                .find(|r| r.is_type(suffix) && !r.external)
                .map(|r| resolve_target(&workbook_dir, &r.target))
        };

        let shared_strings = match rel_target(rel_types::SHARED_STRINGS) {
            Some(part) => match package.read_optional_part(&part)? {
                Some(xml) => Some(SharedStrings::parse(&part, &xml)?),
                None => None,
            },
            None => None,
        };

        let styles = match rel_target(rel_types::STYLES) {
            Some(part) => match package.read_optional_part(&part)? {
                Some(xml) => read_styles_xml(&xml)?,
                None => Default::default(),
            },
            None => Default::default(),
        };

        let calc_chain = workbook_rels
            .iter()
            .find(|r| r.is_type(rel_types::CALC_CHAIN))
            .map(|r| (r.id.clone(), resolve_target(&workbook_dir, &r.target)));

        let mut workbook = Workbook::with_styles(styles);
        let mut sheet_parts = Vec::new();
        for (name, r_id) in read_workbook_sheets(&package.read_part(&workbook_part)?)? {
            let Some(rel) = workbook_rels.iter().find(|r| r.id == r_id) else {
                return Err(XlsxError::InvalidFormat(format!(
                    "sheet '{}' points at missing relationship {}",
                    name, r_id
                )));
            };
            if !rel.is_type(rel_types::WORKSHEET) {
                // Chart sheets and dialog sheets are carried through untouched
                log::debug!("skipping non-worksheet sheet '{}'", name);
                continue;
            }

            let part = resolve_target(&workbook_dir, &rel.target);
            let xml = package.read_part(&part)?;
            let sheet = read_worksheet(&name, &xml, shared_strings.as_ref())?;
            workbook.add_worksheet(sheet)?;
            sheet_parts.push(part);
        }

        Ok(Self {
            package,
            workbook,
            workbook_part,
            sheet_parts,
            shared_strings,
            calc_chain,
            dirty: BTreeSet::new(),
        })
    }

    /// The loaded workbook model
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    /// Worksheet names in tab order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.workbook.sheet_names()
    }

    /// Whether the package carries a VBA project
    pub fn has_macros(&self) -> bool {
        self.package.contains(VBA_PROJECT)
    }

    /// Get a worksheet by name
    pub fn sheet(&self, name: &str) -> XlsxResult<&Worksheet> {
        self.workbook
            .worksheet_by_name(name)
            .ok_or_else(|| XlsxError::SheetNotFound(name.to_string()))
    }

    /// Get a worksheet for editing; it will be rewritten on save
    pub fn sheet_mut(&mut self, name: &str) -> XlsxResult<&mut Worksheet> {
        let index = self
            .workbook
            .sheet_index(name)
            .ok_or_else(|| XlsxError::SheetNotFound(name.to_string()))?;
        self.dirty.insert(index);
        Ok(self.workbook.require_worksheet_mut(name)?)
    }

    /// Write the workbook to `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> XlsxResult<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        log::info!("saved {}", path.display());
        Ok(())
    }

    /// Serialize the workbook package
    pub fn to_bytes(&self) -> XlsxResult<Vec<u8>> {
        if self.dirty.is_empty() {
            return Ok(self.package.bytes().to_vec());
        }

        let mut replaced: HashMap<String, Vec<u8>> = HashMap::new();
        let mut removed: HashSet<String> = HashSet::new();
        let mut shared_strings = self.shared_strings.clone();

        for &index in &self.dirty {
            let (Some(sheet), Some(part)) =
                (self.workbook.worksheet(index), self.sheet_parts.get(index))
            else {
                continue;
            };
            let original = self.package.read_part(part)?;
            let xml = write_worksheet(&original, sheet, shared_strings.as_mut())?;
            log::debug!("regenerated {} for sheet '{}'", part, sheet.name());
            replaced.insert(part.clone(), xml);
        }

        if let Some(sst) = shared_strings.as_ref().filter(|s| s.has_new_items()) {
            let original = self.package.read_part(sst.part())?;
            replaced.insert(sst.part().to_string(), sst.patch_xml(&original)?);
        }

        // Copied formulas have no cached results; stale calc chains make
        // Excel report the file as corrupt.
        let workbook_xml = self.package.read_part(&self.workbook_part)?;
        replaced.insert(
            self.workbook_part.clone(),
            force_full_calc_on_load(&workbook_xml)?,
        );

        if let Some((r_id, part)) = &self.calc_chain {
            let rels_part = rels_path_for(&self.workbook_part);
            let rels = self.package.read_part(&rels_part)?;
            replaced.insert(rels_part, drop_relationships(&rels, &[r_id.as_str()])?);

            let types = self.package.read_part(CONTENT_TYPES)?;
            replaced.insert(
                CONTENT_TYPES.to_string(),
                drop_content_type_override(&types, &format!("/{}", part))?,
            );
            removed.insert(part.clone());
        }

        self.package.write(&replaced, &removed)
    }
}

/// The main workbook part, from the package relationships
fn find_workbook_part(package: &Package) -> XlsxResult<String> {
    if let Some(xml) = package.read_optional_part("_rels/.rels")? {
        let rels = read_relationships(&xml)?;
        if let Some(rel) = rels.iter().find(|r| r.is_type(rel_types::OFFICE_DOCUMENT)) {
            let part = resolve_target("", &rel.target);
            if package.contains(&part) {
                return Ok(part);
            }
        }
    }

    let fallback = "xl/workbook.xml";
    if package.contains(fallback) {
        Ok(fallback.to_string())
    } else {
        Err(XlsxError::MissingPart(fallback.to_string()))
    }
}
