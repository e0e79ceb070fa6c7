//! CSV export and import for tabular page data.
//!
//! Rows are looked up by keys derived from the header labels: `"Sample Name"`
//! reads the row's `sample_name` field. Every data field is double-quoted with
//! embedded quotes doubled.

use crate::config::{CsvConfig, Messages};
use log::{error, info, warn};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8;";

const UTF8_BOM: &str = "\u{feff}";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data to export")]
    NoData,
    #[error("Row {index} is not an object")]
    InvalidRow { index: usize },
    #[error("Failed to serialize rows: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to deliver file: {0}")]
    Sink(String),
}

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("CSV content has no header row")]
    Empty,
    #[error("Malformed CSV: {0}")]
    Malformed(#[from] csv::Error),
}

/// Destination for generated files (a browser download on the page)
pub trait FileSink {
    fn deliver(&self, filename: &str, mime_type: &str, content: &[u8]) -> Result<(), ExportError>;
}

/// Blocking acknowledgment dialogs
pub trait Alerts {
    fn alert(&self, message: &str);
}

/// A generated CSV file ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct CsvDocument {
    pub content: String,
    pub row_count: usize,
}

impl CsvDocument {
    pub fn to_bytes(&self, include_bom: bool) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.content.len() + UTF8_BOM.len());
        if include_bom {
            bytes.extend_from_slice(UTF8_BOM.as_bytes());
        }
        bytes.extend_from_slice(self.content.as_bytes());
        bytes
    }
}

/// Row key for a header label: lower-cased, whitespace runs replaced by `_`
pub fn header_key(header: &str) -> String {
    let lower = header.to_lowercase();
    let mut key = String::with_capacity(lower.len());
    let mut in_whitespace = false;

    for c in lower.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                key.push('_');
            }
            in_whitespace = true;
        } else {
            key.push(c);
            in_whitespace = false;
        }
    }
    key
}

/// Always-quoted field with embedded quotes doubled
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn header_field(label: &str) -> String {
    if label.contains([',', '"', '\r', '\n']) {
        quote_field(label)
    } else {
        label.to_string()
    }
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn format_row(row: &Map<String, Value>, keys: &[String]) -> String {
    keys.iter()
        .map(|key| quote_field(&field_text(row.get(key))))
        .collect::<Vec<_>>()
        .join(",")
}

/// Build CSV content from already-serialized rows
pub fn build_csv_from_values(rows: &[Value], headers: &[&str]) -> Result<CsvDocument, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::NoData);
    }

    let keys: Vec<String> = headers.iter().map(|h| header_key(h)).collect();
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(headers.iter().map(|h| header_field(h)).collect::<Vec<_>>().join(","));

    for (index, row) in rows.iter().enumerate() {
        let object = row.as_object().ok_or(ExportError::InvalidRow { index })?;
        lines.push(format_row(object, &keys));
    }

    Ok(CsvDocument {
        content: lines.join("\n"),
        row_count: rows.len(),
    })
}

/// Build CSV content from any rows that serialize to JSON objects
pub fn build_csv<T: Serialize>(rows: &[T], headers: &[&str]) -> Result<CsvDocument, ExportError> {
    let values = rows
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    build_csv_from_values(&values, headers)
}

/// Page-level CSV export: alerts the user when there is nothing to export,
/// otherwise hands the file to `sink`.
pub struct CsvExporter<'a, F, A> {
    pub sink: &'a F,
    pub alerts: &'a A,
    pub config: &'a CsvConfig,
    pub messages: &'a Messages,
}

impl<'a, F: FileSink, A: Alerts> CsvExporter<'a, F, A> {
    pub fn export_values(&self, rows: &[Value], filename: &str, headers: &[&str]) -> Result<(), ExportError> {
        info!("📄 EXPORT: Exporting {} rows to {}", rows.len(), filename);

        let document = match build_csv_from_values(rows, headers) {
            Ok(document) => document,
            Err(ExportError::NoData) => {
                warn!("⚠️ EXPORT: Nothing to export for {}", filename);
                self.alerts.alert(&self.messages.export_empty);
                return Err(ExportError::NoData);
            }
            Err(e) => {
                error!("❌ EXPORT: {}", e);
                return Err(e);
            }
        };

        let bytes = document.to_bytes(self.config.include_bom);
        if let Err(e) = self.sink.deliver(filename, &self.config.mime_type, &bytes) {
            error!("❌ EXPORT: Could not deliver {}: {}", filename, e);
            return Err(e);
        }

        info!(
            "✅ EXPORT: Delivered {} rows ({} bytes) as {}",
            document.row_count,
            bytes.len(),
            filename
        );
        Ok(())
    }

    pub fn export_to_csv<T: Serialize>(&self, rows: &[T], filename: &str, headers: &[&str]) -> Result<(), ExportError> {
        let values = rows
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        self.export_values(&values, filename, headers)
    }
}

/// Parse CSV text into rows keyed by [`header_key`] of each header label.
///
/// A leading UTF-8 BOM is ignored. Short rows leave their trailing keys out;
/// surplus fields are dropped.
pub fn parse_csv(content: &str) -> Result<Vec<BTreeMap<String, String>>, CsvError> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let keys: Vec<String> = reader.headers()?.iter().map(|h| header_key(h.trim())).collect();
    if keys.iter().all(|k| k.is_empty()) {
        return Err(CsvError::Empty);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = keys
            .iter()
            .zip(record.iter())
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}
