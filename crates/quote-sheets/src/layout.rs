//! Template layout: where things live in the quote workbook
//!
//! Defaults describe the stock quote template. A TOML file can override any
//! subset of them:
//!
//! ```toml
//! metadata_sheet = "Parameters"
//! template_row = 12
//!
//! [fields]
//! currency = 66
//! ```

use std::path::Path;

use quote_sheets_core::{MAX_COLS, MAX_ROWS};
use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, Result};

/// Sheet names and cell positions of the quote template.
///
/// Rows and columns are 1-based, as shown in the spreadsheet application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateLayout {
    /// Sheet holding the fixed fields (mandatory)
    pub metadata_sheet: String,
    /// Sheet holding the line-items table (skipped when absent)
    pub line_items_sheet: String,
    /// Row of the line-items table that serves as the copy source
    pub template_row: u32,
    /// Column of the metadata sheet the fixed fields are written to
    pub value_column: u16,
    /// Row of each fixed field on the metadata sheet
    pub fields: FieldRows,
}

impl Default for TemplateLayout {
    fn default() -> Self {
        Self {
            metadata_sheet: "Paramètre".to_string(),
            line_items_sheet: "Cotation".to_string(),
            template_row: 8,
            value_column: 3,
            fields: FieldRows::default(),
        }
    }
}

/// Metadata sheet row per fixed field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldRows {
    pub client_name: u32,
    pub client_address1: u32,
    pub client_city: u32,
    pub client_region: u32,
    pub client_country: u32,
    pub client_zip: u32,
    pub contact_first_name: u32,
    pub contact_last_name: u32,
    pub client_phone: u32,
    pub client_email: u32,
    pub project_name: u32,
    pub quote_number: u32,
    pub language: u32,
    pub currency: u32,
}

impl Default for FieldRows {
    fn default() -> Self {
        Self {
            client_name: 7,
            client_address1: 8,
            client_city: 9,
            client_region: 11,
            client_country: 12,
            client_zip: 13,
            contact_first_name: 14,
            contact_last_name: 15,
            client_phone: 16,
            client_email: 18,
            project_name: 21,
            quote_number: 22,
            language: 40,
            currency: 65,
        }
    }
}

impl FieldRows {
    fn named(&self) -> [(&'static str, u32); 14] {
        [
            ("client_name", self.client_name),
            ("client_address1", self.client_address1),
            ("client_city", self.client_city),
            ("client_region", self.client_region),
            ("client_country", self.client_country),
            ("client_zip", self.client_zip),
            ("contact_first_name", self.contact_first_name),
            ("contact_last_name", self.contact_last_name),
            ("client_phone", self.client_phone),
            ("client_email", self.client_email),
            ("project_name", self.project_name),
            ("quote_number", self.quote_number),
            ("language", self.language),
            ("currency", self.currency),
        ]
    }
}

impl TemplateLayout {
    /// Parse a layout from TOML; keys left out keep their defaults
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let layout: TemplateLayout =
            toml::from_str(s).map_err(|e| QuoteError::InvalidLayout(e.to_string()))?;
        layout.validate()?;
        Ok(layout)
    }

    /// Read a layout file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            QuoteError::InvalidLayout(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Check that every position is inside the sheet grid
    pub fn validate(&self) -> Result<()> {
        if self.metadata_sheet.is_empty() || self.line_items_sheet.is_empty() {
            return Err(QuoteError::InvalidLayout("sheet names must not be empty".into()));
        }
        check_row("template_row", self.template_row)?;
        if self.value_column == 0 || self.value_column > MAX_COLS {
            return Err(QuoteError::InvalidLayout(format!(
                "value_column must be between 1 and {}, got {}",
                MAX_COLS, self.value_column
            )));
        }
        for (name, row) in self.fields.named() {
            check_row(name, row)?;
        }
        Ok(())
    }
}

fn check_row(name: &str, row: u32) -> Result<()> {
    if row == 0 || row > MAX_ROWS {
        return Err(QuoteError::InvalidLayout(format!(
            "{} must be between 1 and {}, got {}",
            name, MAX_ROWS, row
        )));
    }
    Ok(())
}
