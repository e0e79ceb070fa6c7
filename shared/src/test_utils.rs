//! Test doubles for the page abstractions.
//!
//! Everything here is single-threaded and records what happened so tests can
//! assert on it afterwards.

use crate::csv_export::{Alerts, ExportError, FileSink};
use crate::forms::{Form, FormField};
use crate::notifications::{BannerHost, Notification, NotificationError, Notify, Scheduler, Severity};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;
use std::sync::Once;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Default)]
struct FieldState {
    value: String,
    required: bool,
    classes: BTreeSet<String>,
}

/// Shared handle to a form control
#[derive(Debug, Clone, Default)]
pub struct MockField(Rc<RefCell<FieldState>>);

impl MockField {
    pub fn set_value(&self, value: &str) {
        self.0.borrow_mut().value = value.to_string();
    }

    pub fn add_class(&self, class: &str) {
        self.0.borrow_mut().classes.insert(class.to_string());
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.contains(class)
    }
}

impl FormField for MockField {
    fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    fn toggle_class(&self, class: &str, present: bool) {
        let mut state = self.0.borrow_mut();
        if present {
            state.classes.insert(class.to_string());
        } else {
            state.classes.remove(class);
        }
    }
}

#[derive(Debug, Default)]
pub struct MockForm {
    fields: RefCell<Vec<MockField>>,
}

impl MockForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required control; the name only documents the test
    pub fn add_required(&self, _name: &str, value: &str) -> MockField {
        self.add_field(value, true)
    }

    pub fn add_optional(&self, _name: &str, value: &str) -> MockField {
        self.add_field(value, false)
    }

    fn add_field(&self, value: &str, required: bool) -> MockField {
        let field = MockField(Rc::new(RefCell::new(FieldState {
            value: value.to_string(),
            required,
            classes: BTreeSet::new(),
        })));
        self.fields.borrow_mut().push(field.clone());
        field
    }
}

impl Form for MockForm {
    type Field = MockField;

    fn required_fields(&self) -> Vec<MockField> {
        self.fields
            .borrow()
            .iter()
            .filter(|f| f.0.borrow().required)
            .cloned()
            .collect()
    }
}

/// Banner host keeping attached notifications in memory
#[derive(Debug, Default)]
pub struct RecordingHost {
    attached: RefCell<Vec<Notification>>,
    detached: Cell<usize>,
    fail: Cell<bool>,
}

impl RecordingHost {
    pub fn contains(&self, id: Uuid) -> bool {
        self.attached.borrow().iter().any(|n| n.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.attached.borrow().is_empty()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.attached.borrow().clone()
    }

    /// Simulate the user clicking the close button
    pub fn dismiss(&self, id: Uuid) {
        self.attached.borrow_mut().retain(|n| n.id != id);
    }

    /// Number of removals performed through [`BannerHost::detach`]
    pub fn detach_count(&self) -> usize {
        self.detached.get()
    }

    pub fn fail_attach(&self, fail: bool) {
        self.fail.set(fail);
    }
}

impl BannerHost for RecordingHost {
    type Handle = Uuid;

    fn attach(&self, notification: &Notification) -> Result<Uuid, NotificationError> {
        if self.fail.get() {
            return Err(NotificationError::Attach("no document body".to_string()));
        }
        self.attached.borrow_mut().push(notification.clone());
        Ok(notification.id)
    }

    fn is_attached(&self, handle: &Uuid) -> bool {
        self.contains(*handle)
    }

    fn detach(&self, handle: &Uuid) {
        self.dismiss(*handle);
        self.detached.set(self.detached.get() + 1);
    }
}

struct ScheduledTask {
    due: Duration,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct Clock {
    now: Duration,
    tasks: Vec<ScheduledTask>,
}

/// Scheduler driven by an explicit clock
#[derive(Clone, Default)]
pub struct ManualScheduler(Rc<RefCell<Clock>>);

impl ManualScheduler {
    /// Move the clock forward, running every task that became due in order
    pub fn advance(&self, by: Duration) {
        let target = self.0.borrow().now + by;
        loop {
            let next = {
                let mut clock = self.0.borrow_mut();
                let due_index = clock
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| t.due)
                    .map(|(i, _)| i);
                due_index.map(|i| {
                    let task = clock.tasks.remove(i);
                    clock.now = task.due;
                    task
                })
            };
            match next {
                Some(scheduled) => (scheduled.task)(),
                None => break,
            }
        }
        self.0.borrow_mut().now = target;
    }

    pub fn pending(&self) -> usize {
        self.0.borrow().tasks.len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let mut clock = self.0.borrow_mut();
        let due = clock.now + delay;
        clock.tasks.push(ScheduledTask { due, task });
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveredFile {
    pub filename: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    files: RefCell<Vec<DeliveredFile>>,
    fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn files(&self) -> Vec<DeliveredFile> {
        self.files.borrow().clone()
    }
}

impl FileSink for RecordingSink {
    fn deliver(&self, filename: &str, mime_type: &str, content: &[u8]) -> Result<(), ExportError> {
        if self.fail {
            return Err(ExportError::Sink("download blocked".to_string()));
        }
        self.files.borrow_mut().push(DeliveredFile {
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
            content: content.to_vec(),
        });
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingAlerts(RefCell<Vec<String>>);

impl RecordingAlerts {
    pub fn messages(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

impl Alerts for RecordingAlerts {
    fn alert(&self, message: &str) {
        self.0.borrow_mut().push(message.to_string());
    }
}

/// [`Notify`] implementation remembering every message
#[derive(Debug, Default)]
pub struct RecordingNotify(RefCell<Vec<(String, Severity)>>);

impl RecordingNotify {
    pub fn shown(&self) -> Vec<(String, Severity)> {
        self.0.borrow().clone()
    }
}

impl Notify for RecordingNotify {
    fn notify(&self, message: &str, severity: Severity) {
        self.0.borrow_mut().push((message.to_string(), severity));
    }
}

thread_local! {
    static CAPTURED: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Logger keeping error records per test thread
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Error
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let line = record.args().to_string();
            CAPTURED.with(|lines| lines.borrow_mut().push(line));
        }
    }

    fn flush(&self) {}
}

static CAPTURE_LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

/// Start capturing error logs on the current thread
pub fn capture_logs() {
    INSTALL.call_once(|| {
        if log::set_logger(&CAPTURE_LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
    CAPTURED.with(|lines| lines.borrow_mut().clear());
}

/// Error lines logged on the current thread since [`capture_logs`]
pub fn captured_errors() -> Vec<String> {
    CAPTURED.with(|lines| lines.borrow().clone())
}
