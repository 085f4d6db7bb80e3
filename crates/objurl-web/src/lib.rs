#![cfg(target_arch = "wasm32")]

mod binary_object;
mod browser_urls;
mod global;
#[cfg(feature = "yew")]
mod hook;

pub use binary_object::BinaryObject;
pub use browser_urls::BrowserUrls;
pub use global::{bind_object_url, global_cache, ObjectUrlBinding};
#[cfg(feature = "yew")]
pub use hook::use_object_url;

pub use objurl_core::{CacheConfig, Error, ObjectKey, ObjectUrl, Result};

use wasm_bindgen::JsCast;

fn js_error(err: wasm_bindgen::JsValue) -> anyhow::Error {
    match err.dyn_ref::<js_sys::Error>() {
        Some(err) => anyhow::anyhow!("{}", String::from(err.to_string())),
        None => anyhow::anyhow!("{err:?}"),
    }
}
