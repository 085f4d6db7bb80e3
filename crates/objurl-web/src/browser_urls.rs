use crate::{js_error, BinaryObject};
use anyhow::Context;
use objurl_core::UrlProvider;
use web_sys::Url;

/// `URL.createObjectURL` and `URL.revokeObjectURL`
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserUrls;

impl UrlProvider for BrowserUrls {
    type Object = BinaryObject;

    fn create(&self, object: &BinaryObject) -> anyhow::Result<String> {
        match object {
            BinaryObject::Blob(blob) => Url::create_object_url_with_blob(blob)
                .map_err(js_error)
                .context("creating object URL for blob"),
            BinaryObject::MediaSource(source) => Url::create_object_url_with_source(source)
                .map_err(js_error)
                .context("creating object URL for media source"),
        }
    }

    fn revoke(&self, url: &str) -> anyhow::Result<()> {
        Url::revoke_object_url(url)
            .map_err(js_error)
            .with_context(|| format!("revoking object URL {url}"))
    }
}
