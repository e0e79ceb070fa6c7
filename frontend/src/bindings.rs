//! Functions exposed to page scripts under their JavaScript names.

use crate::app::context;
use crate::services::describe_js_error;
use crate::services::dom_forms::DomForm;
use crate::services::download::{BrowserAlerts, BrowserDownload};
use labsample_shared::formatting::{format_vi_date, INVALID_DATE};
use labsample_shared::{
    format_number as format_fixed, format_number_str, validate_form_with_class, CsvExporter,
    Severity,
};
use log::{error, warn};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlFormElement;

/// `d/m/yyyy` from the date's local-time fields
fn local_numeric_date(date: &js_sys::Date) -> String {
    chrono::NaiveDate::from_ymd_opt(
        date.get_full_year() as i32,
        date.get_month() + 1,
        date.get_date(),
    )
    .map(format_vi_date)
    .unwrap_or_else(|| INVALID_DATE.to_string())
}

/// `date.toLocaleDateString(locale)`, or `None` when the call throws
fn locale_date_string(date: &js_sys::Date, locale: &str) -> Option<String> {
    let method = js_sys::Reflect::get(date, &JsValue::from_str("toLocaleDateString"))
        .ok()?
        .dyn_into::<js_sys::Function>()
        .ok()?;
    match method.call1(date, &JsValue::from_str(locale)) {
        Ok(text) => text.as_string(),
        Err(e) => {
            warn!(
                "⚠️ FORMAT: Cannot format dates for locale {:?}: {}",
                locale,
                describe_js_error(&e)
            );
            None
        }
    }
}

fn format_js_date(date: &js_sys::Date, locale: &str) -> String {
    if date.get_time().is_nan() {
        return INVALID_DATE.to_string();
    }
    locale_date_string(date, locale).unwrap_or_else(|| local_numeric_date(date))
}

/// Short date for a `Date`, date string or epoch milliseconds, rendered for
/// the configured locale in the browser's time zone.
///
/// Strings and numbers are parsed the way `new Date(value)` parses them.
#[wasm_bindgen(js_name = formatDate)]
pub fn format_date(input: JsValue) -> String {
    let ctx = context();
    let locale = ctx.config.locale.as_str();

    if let Some(date) = input.dyn_ref::<js_sys::Date>() {
        format_js_date(date, locale)
    } else if input.is_string() || input.as_f64().is_some() {
        format_js_date(&js_sys::Date::new(&input), locale)
    } else {
        INVALID_DATE.to_string()
    }
}

#[wasm_bindgen(js_name = formatNumber)]
pub fn format_number(value: JsValue, decimals: Option<u32>) -> String {
    let decimals = decimals
        .map(|d| d as usize)
        .unwrap_or_else(|| context().config.default_decimals);

    match (value.as_f64(), value.as_string()) {
        (Some(number), _) => format_fixed(number, decimals),
        (None, Some(text)) => format_number_str(&text, decimals),
        _ => format_fixed(f64::NAN, decimals),
    }
}

/// Round-trip a JS value through `JSON.stringify` into serde's model
fn to_json_value(data: &JsValue) -> Option<Value> {
    let text = js_sys::JSON::stringify(data).ok()?.as_string()?;
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            error!("❌ BINDINGS: Could not read JSON value: {}", e);
            None
        }
    }
}

/// Persist `data` as its `JSON.stringify` text
#[wasm_bindgen(js_name = saveToStorage)]
pub fn save_to_storage(key: &str, data: JsValue) -> bool {
    let json = match js_sys::JSON::stringify(&data) {
        Ok(text) => text.as_string(),
        Err(e) => {
            error!("❌ STORAGE: Error saving to storage: {}", describe_js_error(&e));
            return false;
        }
    };

    match json {
        Some(json) => context().storage.save_raw(key, &json),
        None => {
            error!("❌ STORAGE: Error saving to storage: {} is not JSON-serializable", key);
            false
        }
    }
}

/// Stored value parsed with `JSON.parse`, or `default_value` (`[]` when omitted)
#[wasm_bindgen(js_name = loadFromStorage)]
pub fn load_from_storage(key: &str, default_value: JsValue) -> JsValue {
    let default_value = if default_value.is_undefined() {
        js_sys::Array::new().into()
    } else {
        default_value
    };

    let Some(raw) = context().storage.load_raw(key) else {
        return default_value;
    };
    match js_sys::JSON::parse(&raw) {
        Ok(value) => value,
        Err(e) => {
            error!("❌ STORAGE: Error loading from storage: {}", describe_js_error(&e));
            default_value
        }
    }
}

#[wasm_bindgen(js_name = removeFromStorage)]
pub fn remove_from_storage(key: &str) -> bool {
    context().storage.remove_from_storage(key)
}

/// Download `data` as a CSV file.
///
/// Returns `false` when nothing was downloaded; the reason has been logged,
/// and for empty data the user has been alerted.
#[wasm_bindgen(js_name = exportToCSV)]
pub fn export_to_csv(data: JsValue, filename: &str, headers: Vec<String>) -> bool {
    let rows = if data.is_null() || data.is_undefined() {
        Vec::new()
    } else {
        match to_json_value(&data) {
            Some(Value::Array(rows)) => rows,
            _ => {
                warn!("⚠️ EXPORT: Export data is not an array, nothing to export");
                Vec::new()
            }
        }
    };
    let headers: Vec<&str> = headers.iter().map(String::as_str).collect();

    let ctx = context();
    let exporter = CsvExporter {
        sink: &BrowserDownload,
        alerts: &BrowserAlerts,
        config: &ctx.config.csv,
        messages: &ctx.config.messages,
    };
    exporter.export_values(&rows, filename, &headers).is_ok()
}

#[wasm_bindgen(js_name = validateForm)]
pub fn validate_form(form: HtmlFormElement) -> bool {
    let ctx = context();
    validate_form_with_class(&DomForm::new(form), &ctx.config.invalid_class)
}

#[wasm_bindgen(js_name = showNotification)]
pub fn show_notification(message: &str, kind: Option<String>) {
    let severity = kind
        .as_deref()
        .map(Severity::parse_or_default)
        .unwrap_or_default();
    context()
        .handlers
        .notifier()
        .show_notification(message, severity);
}
