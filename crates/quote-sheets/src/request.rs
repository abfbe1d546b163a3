//! Request model
//!
//! The JSON request is decoded once at the boundary. Missing keys and JSON
//! `null` both fall back to the documented defaults, so the rest of the crate
//! never has to guess.

use std::fmt;
use std::path::PathBuf;

use quote_sheets_core::CellValue;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{QuoteError, Result};

/// A scalar written to a cell as-is.
///
/// JSON numbers become numeric cells, strings become text cells and booleans
/// become boolean cells.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Empty text, `false` and zero all count as "not provided" for
    /// optional fields
    pub fn is_unset(&self) -> bool {
        match self {
            FieldValue::Bool(b) => !b,
            FieldValue::Number(n) => *n == 0.0,
            FieldValue::Text(s) => s.is_empty(),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<FieldValue> for CellValue {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Bool(b) => CellValue::Boolean(b),
            FieldValue::Number(n) => CellValue::Number(n),
            FieldValue::Text(s) => CellValue::String(s),
        }
    }
}

/// Client block of the quote
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Client {
    #[serde(deserialize_with = "null_as_default")]
    pub name: FieldValue,
    #[serde(deserialize_with = "null_as_default")]
    pub address1: FieldValue,
    #[serde(deserialize_with = "null_as_default")]
    pub city: FieldValue,
    #[serde(deserialize_with = "null_as_default")]
    pub region: FieldValue,
    #[serde(deserialize_with = "null_as_default")]
    pub country: FieldValue,
    #[serde(deserialize_with = "null_as_default")]
    pub zip: FieldValue,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: FieldValue,
    #[serde(deserialize_with = "null_as_default")]
    pub email: FieldValue,
}

/// Contact person at the client
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: FieldValue,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: FieldValue,
}

/// One quoted piece
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawLineItem")]
pub struct LineItem {
    pub quantity: FieldValue,
    pub material: FieldValue,
    pub finish: FieldValue,
    pub length: FieldValue,
    pub width: FieldValue,
    pub thickness: FieldValue,
}

impl LineItem {
    /// `"{material} {finish}"`; the space is there even when both are empty
    pub fn description(&self) -> String {
        format!("{} {}", self.material, self.finish)
    }
}

impl Default for LineItem {
    fn default() -> Self {
        RawLineItem::default().into()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLineItem {
    quantity: Option<FieldValue>,
    material: Option<FieldValue>,
    finish: Option<FieldValue>,
    length: Option<FieldValue>,
    width: Option<FieldValue>,
    thickness: Option<FieldValue>,
}

impl From<RawLineItem> for LineItem {
    fn from(raw: RawLineItem) -> Self {
        let zero = || FieldValue::Number(0.0);
        LineItem {
            quantity: raw.quantity.unwrap_or(FieldValue::Number(1.0)),
            material: raw.material.unwrap_or_default(),
            finish: raw.finish.unwrap_or_default(),
            length: raw.length.unwrap_or_else(zero),
            width: raw.width.unwrap_or_else(zero),
            thickness: raw.thickness.unwrap_or_else(zero),
        }
    }
}

/// Everything written into the template
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteData {
    #[serde(deserialize_with = "null_as_default")]
    pub client: Client,
    #[serde(deserialize_with = "null_as_default")]
    pub contact: Contact,
    #[serde(deserialize_with = "null_as_default")]
    pub project_name: FieldValue,
    #[serde(deserialize_with = "null_as_default")]
    pub quote_number: FieldValue,
    /// Written only when provided
    #[serde(deserialize_with = "unset_as_none")]
    pub language: Option<FieldValue>,
    /// Written only when provided
    #[serde(deserialize_with = "unset_as_none")]
    pub currency: Option<FieldValue>,
    /// Output rows, in order
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<LineItem>,
}

/// A validated fill request
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub quote_data: QuoteData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRequest {
    #[serde(default)]
    template_path: Option<String>,
    #[serde(default)]
    output_path: Option<String>,
    #[serde(default)]
    quote_data: Option<Value>,
}

impl QuoteRequest {
    /// Decode and validate the request JSON
    pub fn from_json(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Err(QuoteError::EmptyInput);
        }
        let raw: RawRequest = serde_json::from_str(input)?;

        let template_path = raw.template_path.filter(|s| !s.is_empty());
        let output_path = raw.output_path.filter(|s| !s.is_empty());
        let quote_data = raw.quote_data.filter(|v| !is_empty_value(v));

        match (template_path, output_path, quote_data) {
            (Some(template_path), Some(output_path), Some(quote_data)) => Ok(QuoteRequest {
                template_path: PathBuf::from(template_path),
                output_path: PathBuf::from(output_path),
                quote_data: serde_json::from_value(quote_data)?,
            }),
            _ => Err(QuoteError::MissingArguments),
        }
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn unset_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<FieldValue>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<FieldValue>::deserialize(deserializer)?.filter(|v| !v.is_unset()))
}
