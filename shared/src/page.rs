//! Page lifecycle handlers.
//!
//! The page reacts to three browser events: document ready, uncaught errors
//! and form submission. Each is a separate method so the browser glue can
//! register them independently.

use crate::config::Messages;
use crate::forms::{validate_form_with_class, Form, INVALID_CLASS};
use crate::notifications::{Notify, Severity};
use log::{error, info, warn};
use std::cell::Cell;
use std::fmt;

pub const LOADED_MESSAGE: &str = "Lab Sample Management System - Static Version loaded";
pub const INITIALIZED_MESSAGE: &str = "App initialized";

/// Whether a form submission may continue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDecision {
    Proceed,
    Cancel,
}

/// Details of an uncaught error
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorReport {
    pub message: String,
    pub source: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(source) = &self.source {
            write!(f, " ({}", source)?;
            if let Some(line) = self.line {
                write!(f, ":{}", line)?;
                if let Some(column) = self.column {
                    write!(f, ":{}", column)?;
                }
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

pub struct PageHandlers<N> {
    notifier: N,
    messages: Messages,
    invalid_class: String,
    started: Cell<bool>,
}

impl<N: Notify> PageHandlers<N> {
    pub fn new(notifier: N, messages: Messages) -> Self {
        Self {
            notifier,
            messages,
            invalid_class: INVALID_CLASS.to_string(),
            started: Cell::new(false),
        }
    }

    pub fn with_invalid_class(mut self, invalid_class: impl Into<String>) -> Self {
        self.invalid_class = invalid_class.into();
        self
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Document ready. Only the first call does anything; returns whether
    /// this call ran the startup.
    pub fn on_ready(&self) -> bool {
        if self.started.replace(true) {
            warn!("⚠️ PAGE: Ready handler invoked more than once, ignoring");
            return false;
        }
        info!("{}", LOADED_MESSAGE);
        self.initialize_app();
        true
    }

    fn initialize_app(&self) {
        info!("{}", INITIALIZED_MESSAGE);
    }

    /// Uncaught error: log it and tell the user something went wrong
    pub fn on_error(&self, report: &ErrorReport) {
        error!("Global error: {}", report);
        self.notifier.notify(&self.messages.global_error, Severity::Danger);
    }

    /// Form submission. `target` is `None` when the event did not come from a
    /// form element.
    pub fn on_submit<F: Form>(&self, target: Option<&F>) -> SubmitDecision {
        let Some(form) = target else {
            return SubmitDecision::Proceed;
        };

        if validate_form_with_class(form, &self.invalid_class) {
            SubmitDecision::Proceed
        } else {
            self.notifier.notify(&self.messages.form_incomplete, Severity::Warning);
            SubmitDecision::Cancel
        }
    }
}
