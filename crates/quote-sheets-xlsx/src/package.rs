//! OOXML package (ZIP container) access
//!
//! The package keeps the original archive bytes. Parts are decompressed on
//! demand, and [`Package::write`] rebuilds the archive with replaced parts
//! re-encoded and every other entry copied raw, so untouched parts (macros,
//! signatures, drawings, ...) come out byte-for-byte identical.

use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{XlsxError, XlsxResult};

/// Relationship type suffixes (the part after the last `/`)
pub(crate) mod rel_types {
    pub const OFFICE_DOCUMENT: &str = "officeDocument";
    pub const WORKSHEET: &str = "worksheet";
    pub const SHARED_STRINGS: &str = "sharedStrings";
    pub const STYLES: &str = "styles";
    pub const CALC_CHAIN: &str = "calcChain";
}

/// A parsed `<Relationship>` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

impl Relationship {
    /// Whether the relationship type ends with `/suffix`
    pub fn is_type(&self, suffix: &str) -> bool {
        self.rel_type
            .rsplit('/')
            .next()
            .map_or(false, |last| last == suffix)
    }
}

/// An opened OOXML package
#[derive(Debug, Clone)]
pub(crate) struct Package {
    bytes: Vec<u8>,
    names: Vec<String>,
}

impl Package {
    /// Index the archive's entries
    pub fn from_bytes(bytes: Vec<u8>) -> XlsxResult<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes.as_slice()))?;
        let names: Vec<String> = archive.file_names().map(str::to_string).collect();

        if !names.iter().any(|n| n == "[Content_Types].xml") {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        Ok(Self { bytes, names })
    }

    /// The unmodified archive
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Check whether a part exists
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Read and decompress a part
    pub fn read_part(&self, name: &str) -> XlsxResult<Vec<u8>> {
        let mut archive = ZipArchive::new(Cursor::new(self.bytes.as_slice()))?;
        let mut file = match archive.by_name(name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(XlsxError::MissingPart(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Read a part if it exists
    pub fn read_optional_part(&self, name: &str) -> XlsxResult<Option<Vec<u8>>> {
        if self.contains(name) {
            self.read_part(name).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Rebuild the archive.
    ///
    /// Entries named in `replaced` get the new content, entries in `removed`
    /// are left out, everything else is copied without recompression. Entry
    /// order is preserved.
    pub fn write(
        &self,
        replaced: &HashMap<String, Vec<u8>>,
        removed: &HashSet<String>,
    ) -> XlsxResult<Vec<u8>> {
        let mut archive = ZipArchive::new(Cursor::new(self.bytes.as_slice()))?;
        let mut zip = ZipWriter::new(Cursor::new(Vec::with_capacity(self.bytes.len())));

        for i in 0..archive.len() {
            let file = archive.by_index_raw(i)?;
            let name = file.name().to_string();

            if removed.contains(&name) {
                log::debug!("dropping part {}", name);
                continue;
            }

            match replaced.get(&name) {
                Some(content) => {
                    let method = match file.compression() {
                        CompressionMethod::Stored => CompressionMethod::Stored,
                        _ => CompressionMethod::Deflated,
                    };
                    log::debug!("rewriting part {}", name);
                    let options = SimpleFileOptions::default().compression_method(method);
                    zip.start_file(name.as_str(), options)?;
                    zip.write_all(content)?;
                }
                None => zip.raw_copy_file(file)?,
            }
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

/// Directory part of a part name (`xl/worksheets/sheet1.xml` -> `xl/worksheets`)
pub(crate) fn part_dir(part: &str) -> &str {
    part.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// The relationships part belonging to `part`
/// (`xl/workbook.xml` -> `xl/_rels/workbook.xml.rels`)
pub(crate) fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the directory of its source part.
///
/// Absolute targets (`/xl/styles.xml`) are package-rooted; `..` segments
/// walk up.
pub(crate) fn resolve_target(base_dir: &str, target: &str) -> String {
    let mut segments: Vec<&str> = match target.strip_prefix('/') {
        Some(_) => Vec::new(),
        None => base_dir.split('/').filter(|s| !s.is_empty()).collect(),
    };

    for segment in target.trim_start_matches('/').split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}
