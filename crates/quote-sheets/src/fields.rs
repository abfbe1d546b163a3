//! Fixed fields of the metadata sheet

use quote_sheets_core::Worksheet;
use tracing::debug;

use crate::error::Result;
use crate::layout::TemplateLayout;
use crate::request::{FieldValue, QuoteData};

/// The (row, value) pairs written to the metadata sheet's value column.
///
/// Every field is listed, empty or not. `language` and `currency` are only
/// listed when the request provides them. Phone and email always come from
/// the client block.
pub fn fixed_fields<'a>(layout: &TemplateLayout, data: &'a QuoteData) -> Vec<(u32, &'a FieldValue)> {
    let rows = &layout.fields;
    let mut fields = vec![
        (rows.client_name, &data.client.name),
        (rows.client_address1, &data.client.address1),
        (rows.client_city, &data.client.city),
        (rows.client_region, &data.client.region),
        (rows.client_country, &data.client.country),
        (rows.client_zip, &data.client.zip),
        (rows.contact_first_name, &data.contact.first_name),
        (rows.contact_last_name, &data.contact.last_name),
        (rows.client_phone, &data.client.phone),
        (rows.client_email, &data.client.email),
        (rows.project_name, &data.project_name),
        (rows.quote_number, &data.quote_number),
    ];
    if let Some(language) = &data.language {
        fields.push((rows.language, language));
    }
    if let Some(currency) = &data.currency {
        fields.push((rows.currency, currency));
    }
    fields
}

/// Write the fixed fields into `sheet`, keeping each cell's style.
///
/// Returns how many cells were written.
pub fn populate_fixed_fields(
    sheet: &mut Worksheet,
    layout: &TemplateLayout,
    data: &QuoteData,
) -> Result<usize> {
    let col = layout.value_column - 1;
    let fields = fixed_fields(layout, data);
    for (row, value) in &fields {
        sheet.set_cell_value_at(row - 1, col, (*value).clone())?;
    }
    debug!(sheet = sheet.name(), count = fields.len(), "fixed fields written");
    Ok(fields.len())
}
