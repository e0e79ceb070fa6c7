//! Page-wide state and the three browser event registrations.

use crate::services::banners::{DomBannerHost, TimeoutScheduler};
use crate::services::dom_forms::DomForm;
use crate::services::local_storage::BrowserStorage;
use crate::services::logging::ConsoleLogger;
use gloo::events::{EventListener, EventListenerOptions};
use labsample_shared::{
    ErrorReport, KeyValueStore, MemoryStore, Notifier, PageConfig, PageHandlers, StorageService,
    SubmitDecision,
};
use log::{info, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::JsCast;
use web_sys::{ErrorEvent, HtmlFormElement};

/// Id of the optional `<script type="application/json">` holding overrides
pub const CONFIG_ELEMENT_ID: &str = "page-config";

pub type BrowserNotifier = Notifier<DomBannerHost, TimeoutScheduler>;

pub struct PageContext {
    pub config: PageConfig,
    pub storage: StorageService<Box<dyn KeyValueStore>>,
    pub handlers: PageHandlers<BrowserNotifier>,
}

thread_local! {
    static CONTEXT: RefCell<Option<Rc<PageContext>>> = const { RefCell::new(None) };
    static LISTENERS_INSTALLED: Cell<bool> = const { Cell::new(false) };
}

impl PageContext {
    fn new(config: PageConfig) -> Self {
        let store: Box<dyn KeyValueStore> = match BrowserStorage::local() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                warn!("⚠️ STORAGE: {}; falling back to in-memory storage", e);
                Box::new(MemoryStore::new())
            }
        };

        let notifier = Notifier::with_timeout(
            Rc::new(DomBannerHost),
            TimeoutScheduler,
            Duration::from_millis(config.notification_timeout_ms),
        );
        let handlers = PageHandlers::new(notifier, config.messages.clone())
            .with_invalid_class(config.invalid_class.clone());

        Self {
            config,
            storage: StorageService::new(store),
            handlers,
        }
    }
}

/// Configuration embedded in the page, or defaults when absent or invalid
pub fn load_config() -> PageConfig {
    let text = gloo::utils::document()
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content());

    match text {
        Some(json) if !json.trim().is_empty() => PageConfig::from_json(&json).unwrap_or_else(|e| {
            warn!("⚠️ CONFIG: {}; using defaults", e);
            PageConfig::default()
        }),
        _ => PageConfig::default(),
    }
}

/// The page context, created on first use
pub fn context() -> Rc<PageContext> {
    CONTEXT.with(|cell| {
        Rc::clone(
            cell.borrow_mut()
                .get_or_insert_with(|| Rc::new(PageContext::new(load_config()))),
        )
    })
}

/// Run the ready handler once the document has been parsed
pub fn register_ready_handler(ctx: Rc<PageContext>) {
    let document = gloo::utils::document();
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", move |_| {
            ctx.handlers.on_ready();
        })
        .forget();
    } else {
        ctx.handlers.on_ready();
    }
}

/// Surface uncaught errors as a banner
pub fn register_error_handler(ctx: Rc<PageContext>) {
    EventListener::new(&gloo::utils::window(), "error", move |event| {
        let report = event
            .dyn_ref::<ErrorEvent>()
            .map(|e| ErrorReport {
                message: e.message(),
                source: Some(e.filename()).filter(|f| !f.is_empty()),
                line: Some(e.lineno()).filter(|l| *l > 0),
                column: Some(e.colno()).filter(|c| *c > 0),
            })
            .unwrap_or_else(|| ErrorReport::new(event.type_()));
        ctx.handlers.on_error(&report);
    })
    .forget();
}

/// Block submission of forms with empty required fields
pub fn register_submit_handler(ctx: Rc<PageContext>) {
    let options = EventListenerOptions::enable_prevent_default();
    EventListener::new_with_options(&gloo::utils::document(), "submit", options, move |event| {
        let form = event
            .target()
            .and_then(|target| target.dyn_into::<HtmlFormElement>().ok())
            .map(DomForm::new);

        if ctx.handlers.on_submit(form.as_ref()) == SubmitDecision::Cancel {
            event.prevent_default();
        }
    })
    .forget();
}

/// Install logging and all page listeners. Safe to call more than once.
pub fn install() {
    if LISTENERS_INSTALLED.with(|installed| installed.replace(true)) {
        return;
    }

    ConsoleLogger::install(log::LevelFilter::Info);
    let ctx = context();
    ConsoleLogger::install(ctx.config.level_filter());
    info!("🚀 PAGE: Registering page listeners (locale {})", ctx.config.locale);

    register_error_handler(Rc::clone(&ctx));
    register_submit_handler(Rc::clone(&ctx));
    register_ready_handler(ctx);
}
