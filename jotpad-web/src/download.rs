//! Client-side file download for export payloads.
//!
//! The body is wrapped in a `Blob`, exposed through an object URL, and a
//! detached `<a download>` is clicked. The URL is revoked right after the
//! click; the browser has already started the download by then.

use jotpad_core::ExportPayload;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::storage::js_message;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Could not build file: {0}")]
    Blob(String),
    #[error("Could not create download link: {0}")]
    Link(String),
}

impl From<DownloadError> for JsValue {
    fn from(err: DownloadError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Starts a browser download of `payload`.
///
/// # Errors
///
/// Returns [`DownloadError`] if the blob, its object URL or the link element
/// cannot be created.
pub fn download(payload: &ExportPayload) -> Result<(), DownloadError> {
    let parts = js_sys::Array::of1(&JsValue::from_str(&payload.body));
    let options = BlobPropertyBag::new();
    options.set_type(&payload.mime_type);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|e| DownloadError::Blob(js_message(&e)))?;

    let url =
        Url::create_object_url_with_blob(&blob).map_err(|e| DownloadError::Blob(js_message(&e)))?;

    let result = click_link(&url, &payload.filename);
    if let Err(e) = Url::revoke_object_url(&url) {
        log::debug!("Could not revoke {url}: {}", js_message(&e));
    }
    result?;

    log::info!("Downloaded {} ({} bytes)", payload.filename, payload.body.len());
    Ok(())
}

/// Starts one download per payload, stopping at the first failure.
///
/// # Errors
///
/// Returns the first [`DownloadError`].
pub fn download_all(payloads: &[ExportPayload]) -> Result<(), DownloadError> {
    payloads.iter().try_for_each(download)
}

fn click_link(url: &str, filename: &str) -> Result<(), DownloadError> {
    let link = gloo_utils::document()
        .create_element("a")
        .map_err(|e| DownloadError::Link(js_message(&e)))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| DownloadError::Link("element is not an anchor".to_string()))?;
    link.set_href(url);
    link.set_download(filename);
    link.click();
    Ok(())
}
