//! Date and number formatting for display in the Vietnamese locale.
//!
//! Date parsing here covers the formats the page stores; in the browser,
//! strings go through the platform's own `Date` parser instead.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Text produced for dates that cannot be parsed
pub const INVALID_DATE: &str = "Invalid Date";

pub const DEFAULT_DECIMALS: usize = 2;

const MAX_DECIMALS: usize = 100;

/// Enough fractional digits to print any finite f64 exactly
const EXACT_DIGITS: usize = 1100;

/// Magnitude from which fixed-point output switches to exponent form
const EXPONENT_THRESHOLD: f64 = 1e21;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("Invalid date: {0:?}")]
    InvalidDate(String),
}

/// Parse the date-like strings the page deals with into a calendar date.
///
/// Timestamps carrying an offset keep the calendar date of that offset.
pub fn parse_date_like(input: &str) -> Result<NaiveDate, FormatError> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }

    Err(FormatError::InvalidDate(input.to_string()))
}

/// Short Vietnamese date, e.g. `5/1/2024` for 5 January 2024
pub fn format_vi_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

pub fn try_format_date(input: &str) -> Result<String, FormatError> {
    parse_date_like(input).map(format_vi_date)
}

/// Format a date-like string for display, yielding `"Invalid Date"` when it
/// cannot be parsed.
pub fn format_date(input: &str) -> String {
    try_format_date(input).unwrap_or_else(|_| INVALID_DATE.to_string())
}

/// Render `value` with exactly `decimals` fractional digits.
///
/// Rounds on the exact binary value, with ties going away from zero, so
/// `2.5` becomes `"3"` and `0.125` becomes `"0.13"` while `1.005` (stored as
/// 1.00499...) stays `"1.00"`.
pub fn format_number(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value.abs() >= EXPONENT_THRESHOLD {
        return exponent_notation(value);
    }

    let decimals = decimals.min(MAX_DECIMALS);
    // -0.0 renders without a sign
    let sign = if value < 0.0 { "-" } else { "" };
    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(decimals))
        .collect();
    let mut int_len = int_part.len();

    if frac_part.as_bytes().get(decimals).is_some_and(|d| *d >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
            int_len += 1;
        }
    }

    let (int_digits, frac_digits) = digits.split_at(int_len);
    let int_digits = String::from_utf8_lossy(int_digits);
    if decimals == 0 {
        format!("{}{}", sign, int_digits)
    } else {
        format!("{}{}.{}", sign, int_digits, String::from_utf8_lossy(frac_digits))
    }
}

/// Large magnitudes print in exponent form, e.g. `1e+21`
fn exponent_notation(value: f64) -> String {
    let text = format!("{:e}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => text,
    }
}

/// Coerce text to a number and format it; non-numeric text yields `"NaN"`.
pub fn format_number_str(text: &str, decimals: usize) -> String {
    format_number(parse_float(text), decimals)
}

/// Lenient float parsing: skips leading whitespace and reads the longest
/// numeric prefix, ignoring whatever follows it.
pub fn parse_float(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}
