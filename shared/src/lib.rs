//! Shared logic for the Lab Sample Management static page.
//!
//! Nothing in this crate touches the browser directly. Storage, banners,
//! downloads, dialogs and timers are reached through traits that the
//! frontend crate implements with `web-sys`, which keeps everything here
//! testable on the host.

pub mod config;
pub mod csv_export;
pub mod formatting;
pub mod forms;
pub mod notifications;
pub mod page;
pub mod storage;

#[cfg(test)]
mod test_utils;

pub use config::{ConfigError, CsvConfig, Messages, PageConfig};
pub use csv_export::{
    build_csv, build_csv_from_values, header_key, parse_csv, Alerts, CsvDocument, CsvError,
    CsvExporter, ExportError, FileSink, CSV_MIME_TYPE,
};
pub use formatting::{
    format_date, format_number, format_number_str, try_format_date, FormatError, DEFAULT_DECIMALS,
};
pub use forms::{validate_form, validate_form_with_class, Form, FormField, INVALID_CLASS};
pub use notifications::{
    BannerHost, Notification, NotificationError, Notifier, Notify, Scheduler, Severity,
};
pub use page::{ErrorReport, PageHandlers, SubmitDecision};
pub use storage::{KeyValueStore, MemoryStore, StorageError, StorageService};
