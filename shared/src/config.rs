//! Page configuration.
//!
//! Every field has a default matching the static page's built-in behavior, so
//! a partial JSON document only needs to name what it overrides.

use crate::csv_export::CSV_MIME_TYPE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse page configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// User-facing copy shown by the page helpers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Messages {
    pub export_empty: String,
    pub global_error: String,
    pub form_incomplete: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            export_empty: "Không có dữ liệu để xuất!".to_string(),
            global_error: "Đã xảy ra lỗi. Vui lòng thử lại.".to_string(),
            form_incomplete: "Vui lòng điền đầy đủ thông tin bắt buộc.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CsvConfig {
    pub include_bom: bool,
    pub mime_type: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            include_bom: false,
            mime_type: CSV_MIME_TYPE.to_string(),
        }
    }
}

/// Configuration for the page helpers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub locale: String,
    pub notification_timeout_ms: u64,
    pub invalid_class: String,
    pub default_decimals: usize,
    pub log_level: String,
    pub csv: CsvConfig,
    pub messages: Messages,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            locale: "vi-VN".to_string(),
            notification_timeout_ms: 5000,
            invalid_class: "is-invalid".to_string(),
            default_decimals: 2,
            log_level: "info".to_string(),
            csv: CsvConfig::default(),
            messages: Messages::default(),
        }
    }
}

impl PageConfig {
    /// Parse a (possibly partial) JSON configuration document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Maximum log level, falling back to `Info` for unknown names
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page_behavior() {
        let config = PageConfig::default();
        assert_eq!(config.notification_timeout_ms, 5000);
        assert_eq!(config.invalid_class, "is-invalid");
        assert_eq!(config.default_decimals, 2);
        assert_eq!(config.csv.mime_type, "text/csv;charset=utf-8;");
        assert!(!config.csv.include_bom);
        assert_eq!(config.messages.export_empty, "Không có dữ liệu để xuất!");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PageConfig::from_json(r#"{"notification_timeout_ms": 1500, "csv": {"include_bom": true}}"#).unwrap();
        assert_eq!(config.notification_timeout_ms, 1500);
        assert!(config.csv.include_bom);
        assert_eq!(config.csv.mime_type, "text/csv;charset=utf-8;");
        assert_eq!(config.messages, Messages::default());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(PageConfig::from_json("{not json"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_level_filter() {
        let mut config = PageConfig::default();
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
        config.log_level = "debug".to_string();
        assert_eq!(config.level_filter(), log::LevelFilter::Debug);
        config.log_level = "chatty".to_string();
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
    }
}
