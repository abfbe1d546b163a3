//! End-to-end fill: copy template, open, populate, expand, save

use std::io;
use std::path::Path;

use quote_sheets_core::Error as SheetError;
use quote_sheets_xlsx::XlsxDocument;
use tracing::{debug, info, warn};

use crate::error::{QuoteError, Result};
use crate::expand::expand;
use crate::fields::populate_fixed_fields;
use crate::layout::TemplateLayout;
use crate::line_items::write_items;
use crate::request::{QuoteData, QuoteRequest};
use crate::response::Response;

/// What a fill changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillSummary {
    /// Cells written on the metadata sheet
    pub fields_written: usize,
    /// Rows inserted below the template row
    pub rows_inserted: u32,
    /// Line items written (0 when the line-items sheet is missing)
    pub items_written: usize,
}

/// Fills quote templates laid out as described by a [`TemplateLayout`]
#[derive(Debug, Clone, Default)]
pub struct QuoteFiller {
    layout: TemplateLayout,
}

impl QuoteFiller {
    pub fn new(layout: TemplateLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &TemplateLayout {
        &self.layout
    }

    /// Run a full request: copy the template to the output path, fill the
    /// copy and save it in place.
    ///
    /// The template itself is never opened for writing. If a step after the
    /// copy fails, the unfilled copy stays on disk.
    pub fn fill(&self, request: &QuoteRequest) -> Result<FillSummary> {
        let template = request.template_path.as_path();
        let output = request.output_path.as_path();

        if !template.exists() {
            return Err(QuoteError::TemplateNotFound(template.to_path_buf()));
        }
        copy_template(template, output)?;

        let mut doc = XlsxDocument::open(output)?;
        let summary = self.fill_document(&mut doc, &request.quote_data)?;
        doc.save(output)?;

        info!(
            output = %output.display(),
            fields = summary.fields_written,
            rows_inserted = summary.rows_inserted,
            items = summary.items_written,
            "quote filled"
        );
        Ok(summary)
    }

    /// Fill an opened workbook in memory.
    ///
    /// The metadata sheet is mandatory and checked before anything is
    /// written. A missing line-items sheet only skips the items.
    pub fn fill_document(&self, doc: &mut XlsxDocument, data: &QuoteData) -> Result<FillSummary> {
        let layout = &self.layout;
        if doc.sheet(&layout.metadata_sheet).is_err() {
            return Err(QuoteError::SheetNotFound(layout.metadata_sheet.clone()));
        }

        let mut summary = FillSummary {
            fields_written: populate_fixed_fields(
                doc.sheet_mut(&layout.metadata_sheet)?,
                layout,
                data,
            )?,
            ..Default::default()
        };

        if doc.sheet(&layout.line_items_sheet).is_err() {
            warn!(
                sheet = %layout.line_items_sheet,
                "line-items sheet not found, items skipped"
            );
            return Ok(summary);
        }
        if data.items.is_empty() {
            debug!("no line items");
            return Ok(summary);
        }

        check_template_styles(doc, layout)?;
        let sheet = doc.sheet_mut(&layout.line_items_sheet)?;
        summary.rows_inserted = expand(sheet, layout.template_row, data.items.len())?;
        write_items(sheet, layout.template_row, &data.items, &data.quote_number)?;
        summary.items_written = data.items.len();

        Ok(summary)
    }

    /// Handle one raw stdin payload, turning every failure into an error
    /// response
    pub fn handle_json(&self, input: &str) -> Response {
        let result = QuoteRequest::from_json(input).and_then(|request| {
            self.fill(&request)?;
            Ok(request.output_path)
        });

        match result {
            Ok(output) => Response::success(output.to_string_lossy()),
            Err(err) => {
                warn!(error = %err, "quote fill failed");
                Response::error(err)
            }
        }
    }
}

/// Byte-for-byte copy of the template to the output path
///
/// Refuses to copy a file onto itself: opening the output truncates it, which
/// would empty the template before it is read.
fn copy_template(template: &Path, output: &Path) -> Result<()> {
    if is_same_file(template, output) {
        return Err(QuoteError::CopyFailed(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{} and {} are the same file",
                template.display(),
                output.display()
            ),
        )));
    }

    let bytes = std::fs::copy(template, output).map_err(QuoteError::CopyFailed)?;
    debug!(
        template = %template.display(),
        output = %output.display(),
        bytes,
        "template copied"
    );
    Ok(())
}

/// Every template-row style must resolve in `styles.xml` before it is
/// copied to the inserted rows
fn check_template_styles(doc: &XlsxDocument, layout: &TemplateLayout) -> Result<()> {
    let workbook = doc.workbook();
    let row = layout.template_row.saturating_sub(1);
    for (col, cell) in doc.sheet(&layout.line_items_sheet)?.iter_row(row) {
        let style = workbook
            .cell_style(&layout.line_items_sheet, row, col)
            .map_err(|_| SheetError::InvalidStyleIndex(cell.style_index))?;
        debug!(
            col,
            style_index = cell.style_index,
            bold = style.font.bold,
            bordered = !style.border.is_empty(),
            "template cell style"
        );
    }
    Ok(())
}

/// An output that does not exist yet cannot be the template
fn is_same_file(template: &Path, output: &Path) -> bool {
    match (std::fs::canonicalize(template), std::fs::canonicalize(output)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
