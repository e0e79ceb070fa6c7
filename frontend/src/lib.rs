//! Browser side of the Lab Sample Management static page.
//!
//! Wires the shared page logic to `web-sys`: localStorage, DOM banners and
//! forms, Blob downloads and the page's event listeners. Page scripts call the
//! helpers through the exports in [`bindings`].

pub mod app;
pub mod bindings;
pub mod services;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    app::install();
}
