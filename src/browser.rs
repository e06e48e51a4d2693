//! Thin wrappers over the browser APIs the page touches directly.

use gaydar::{ObjectUrls, UploadError};
use log::warn;
use web_sys::{File, HtmlInputElement, Url};

/// Object URLs backed by `URL.createObjectURL` / `URL.revokeObjectURL`.
pub struct BrowserUrls;

impl ObjectUrls for BrowserUrls {
    type Blob = File;

    fn create(&mut self, file: &File) -> Result<String, UploadError> {
        Url::create_object_url_with_blob(file)
            .map_err(|err| UploadError::ObjectUrl(format!("{:?}", err)))
    }

    fn revoke(&mut self, url: &str) {
        if let Err(err) = Url::revoke_object_url(url) {
            warn!("Failed to revoke object URL {}: {:?}", url, err);
        }
    }
}

/// First file picked in a file input, if any.
pub fn first_file(input: &HtmlInputElement) -> Option<File> {
    input.files().and_then(|files| files.get(0))
}

/// Blocking user-facing notification.
pub fn alert(message: &str) {
    if let Err(err) = gloo_utils::window().alert_with_message(message) {
        warn!("Could not show alert '{}': {:?}", message, err);
    }
}

/// Current viewport size in CSS pixels.
pub fn window_size() -> (u32, u32) {
    let window = gloo_utils::window();
    let dim = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        value
            .ok()
            .and_then(|v| v.as_f64())
            .map(|v| v.max(0.0) as u32)
            .unwrap_or(0)
    };
    (dim(window.inner_width()), dim(window.inner_height()))
}
