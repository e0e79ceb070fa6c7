//! # Notifications
//!
//! Transient, dismissible banners. A [`Notifier`] attaches the banner through a
//! [`BannerHost`] (the DOM in the browser) and asks a [`Scheduler`] to take it
//! down again once the display timeout elapses. A banner the user already
//! dismissed is left alone when its timer fires.

use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Inline style placing banners near the top-right corner of the viewport
pub const NOTIFICATION_STYLE: &str = "top: 20px; right: 20px; z-index: 9999; min-width: 300px;";

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Failed to attach notification: {0}")]
    Attach(String),
}

/// Banner severity, matching the page's alert styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
    Primary,
    Secondary,
    Light,
    Dark,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
            Severity::Primary => "primary",
            Severity::Secondary => "secondary",
            Severity::Light => "light",
            Severity::Dark => "dark",
        }
    }

    /// Parse a severity name, falling back to `Info` for unknown names
    pub fn parse_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown notification severity: {0}")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "success" => Ok(Severity::Success),
            "warning" => Ok(Severity::Warning),
            "danger" => Ok(Severity::Danger),
            "primary" => Ok(Severity::Primary),
            "secondary" => Ok(Severity::Secondary),
            "light" => Ok(Severity::Light),
            "dark" => Ok(Severity::Dark),
            _ => Err(UnknownSeverity(s.to_string())),
        }
    }
}

/// A banner to be shown on the page
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            severity,
        }
    }

    /// DOM id of the banner element
    pub fn dom_id(&self) -> String {
        format!("notification-{}", self.id)
    }

    pub fn class_name(&self) -> String {
        format!(
            "alert alert-{} alert-dismissible fade show position-fixed",
            self.severity
        )
    }
}

/// Where banners are displayed
pub trait BannerHost {
    type Handle: Clone + 'static;

    fn attach(&self, notification: &Notification) -> Result<Self::Handle, NotificationError>;

    /// Whether the banner is still part of the page
    fn is_attached(&self, handle: &Self::Handle) -> bool;

    fn detach(&self, handle: &Self::Handle);
}

/// Fire-and-forget deferred execution
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

/// Anything that can put a message in front of the user
pub trait Notify {
    fn notify(&self, message: &str, severity: Severity);
}

pub struct Notifier<H, S> {
    host: Rc<H>,
    scheduler: S,
    timeout: Duration,
}

impl<H, S> Notifier<H, S>
where
    H: BannerHost + 'static,
    S: Scheduler,
{
    pub fn new(host: Rc<H>, scheduler: S) -> Self {
        Self::with_timeout(host, scheduler, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(host: Rc<H>, scheduler: S, timeout: Duration) -> Self {
        Self { host, scheduler, timeout }
    }

    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    /// Attach a banner and schedule its removal.
    ///
    /// Returns the banner id, or `None` when it could not be attached.
    pub fn show_notification(&self, message: &str, severity: Severity) -> Option<Uuid> {
        let notification = Notification::new(message, severity);

        let handle = match self.host.attach(&notification) {
            Ok(handle) => handle,
            Err(e) => {
                error!("❌ NOTIFY: {}", e);
                return None;
            }
        };
        debug!("🔔 NOTIFY: Showing {} banner {}", severity, notification.id);

        let host = Rc::clone(&self.host);
        self.scheduler.schedule(
            self.timeout,
            Box::new(move || {
                if host.is_attached(&handle) {
                    host.detach(&handle);
                }
            }),
        );

        Some(notification.id)
    }
}

impl<H, S> Notify for Notifier<H, S>
where
    H: BannerHost + 'static,
    S: Scheduler,
{
    fn notify(&self, message: &str, severity: Severity) {
        self.show_notification(message, severity);
    }
}
