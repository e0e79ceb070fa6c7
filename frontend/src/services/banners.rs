//! Notification banners rendered into the document body.

use super::{describe_js_error, js_error};
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use labsample_shared::notifications::NOTIFICATION_STYLE;
use labsample_shared::{BannerHost, Notification, NotificationError, Scheduler};
use std::time::Duration;
use web_sys::Element;

/// Appends banners to `document.body`
#[derive(Debug, Default)]
pub struct DomBannerHost;

impl DomBannerHost {
    fn build(notification: &Notification) -> anyhow::Result<Element> {
        let document = gloo::utils::document();

        let banner = document.create_element("div").map_err(js_error)?;
        banner.set_id(&notification.dom_id());
        banner.set_class_name(&notification.class_name());
        banner.set_attribute("role", "alert").map_err(js_error)?;
        banner.set_attribute("style", NOTIFICATION_STYLE).map_err(js_error)?;
        // Text only, so messages can never inject markup
        banner.set_text_content(Some(&notification.message));

        let close = document.create_element("button").map_err(js_error)?;
        close.set_class_name("btn-close");
        close.set_attribute("type", "button").map_err(js_error)?;
        close.set_attribute("data-bs-dismiss", "alert").map_err(js_error)?;
        close.set_attribute("aria-label", "Close").map_err(js_error)?;

        // Dismiss without relying on Bootstrap's script being present
        let target = banner.clone();
        EventListener::once(&close, "click", move |_| target.remove()).forget();

        banner.append_child(&close).map_err(js_error)?;
        gloo::utils::body().append_child(&banner).map_err(js_error)?;
        Ok(banner)
    }
}

impl BannerHost for DomBannerHost {
    type Handle = Element;

    fn attach(&self, notification: &Notification) -> Result<Element, NotificationError> {
        Self::build(notification).map_err(|e| NotificationError::Attach(e.to_string()))
    }

    fn is_attached(&self, handle: &Element) -> bool {
        handle.parent_node().is_some()
    }

    fn detach(&self, handle: &Element) {
        if let Some(parent) = handle.parent_node() {
            if let Err(e) = parent.remove_child(handle) {
                log::warn!("⚠️ NOTIFY: Could not remove banner: {}", describe_js_error(&e));
            }
        }
    }
}

/// `setTimeout`-backed scheduler; scheduled tasks cannot be cancelled
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, task).forget();
    }
}
