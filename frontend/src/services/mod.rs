pub mod banners;
pub mod dom_forms;
pub mod download;
pub mod local_storage;
pub mod logging;

use wasm_bindgen::JsValue;

/// Readable text for an exception thrown by a browser API
pub fn describe_js_error(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            js_sys::Reflect::get(err, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", err))
}

pub fn js_error(err: JsValue) -> anyhow::Error {
    anyhow::anyhow!(describe_js_error(&err))
}
