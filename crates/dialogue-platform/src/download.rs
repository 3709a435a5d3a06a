//! Browser file download: wraps text in a Blob and clicks a temporary
//! `<a download>` link pointing at an object URL.

use gloo_timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use dialogue_core::ports::DownloadPort;
use dialogue_types::{DialogueError, Result};

const TEXT_MIME: &str = "text/plain;charset=utf-8";

pub struct BrowserDownload;

impl DownloadPort for BrowserDownload {
    fn offer_text(&self, file_name: &str, content: &str) -> Result<()> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| DialogueError::JsInterop("No document".to_string()))?;

        let parts = js_sys::Array::of1(&JsValue::from_str(content));
        let options = BlobPropertyBag::new();
        options.set_type(TEXT_MIME);
        let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(js_err)?;
        let url = Url::create_object_url_with_blob(&blob).map_err(js_err)?;

        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| DialogueError::JsInterop("<a> is not an anchor".to_string()))?;
        anchor.set_href(&url);
        anchor.set_download(file_name);
        anchor.click();

        revoke_object_url_later(url).forget();
        log::info!("Offered {} ({} bytes) for download", file_name, content.len());
        Ok(())
    }
}

/// Release an object URL once the current task has finished.
/// Revoking it in the same task as the click can cancel the download.
pub fn revoke_object_url_later(url: String) -> Timeout {
    Timeout::new(0, move || {
        if let Err(e) = Url::revoke_object_url(&url) {
            log::warn!("Could not revoke {}: {:?}", url, e);
        }
    })
}

fn js_err(e: JsValue) -> DialogueError {
    DialogueError::JsInterop(format!("{:?}", e))
}
