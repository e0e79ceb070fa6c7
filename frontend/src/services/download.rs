//! File downloads and blocking dialogs.

use super::js_error;
use anyhow::anyhow;
use gloo::file::{Blob, ObjectUrl};
use gloo::timers::callback::Timeout;
use labsample_shared::{Alerts, ExportError, FileSink};
use wasm_bindgen::JsCast;
use web_sys::HtmlAnchorElement;

/// Object URLs stay alive briefly so the browser can start reading them
const REVOKE_DELAY_MS: u32 = 1000;

/// Delivers files through a synthetic click on a hidden download link
#[derive(Debug, Default)]
pub struct BrowserDownload;

impl BrowserDownload {
    fn trigger(filename: &str, mime_type: &str, content: &[u8]) -> anyhow::Result<()> {
        let url = ObjectUrl::from(Blob::new_with_options(content, Some(mime_type)));
        let document = gloo::utils::document();
        let body = gloo::utils::body();

        let link: HtmlAnchorElement = document
            .create_element("a")
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| anyhow!("created element is not an anchor"))?;
        link.set_href(&url);
        link.set_download(filename);
        link.set_attribute("style", "visibility: hidden;").map_err(js_error)?;

        body.append_child(&link).map_err(js_error)?;
        link.click();
        body.remove_child(&link).map_err(js_error)?;

        Timeout::new(REVOKE_DELAY_MS, move || drop(url)).forget();
        Ok(())
    }
}

impl FileSink for BrowserDownload {
    fn deliver(&self, filename: &str, mime_type: &str, content: &[u8]) -> Result<(), ExportError> {
        Self::trigger(filename, mime_type, content).map_err(|e| ExportError::Sink(e.to_string()))
    }
}

/// `window.alert`
#[derive(Debug, Default)]
pub struct BrowserAlerts;

impl Alerts for BrowserAlerts {
    fn alert(&self, message: &str) {
        gloo::dialogs::alert(message);
    }
}
