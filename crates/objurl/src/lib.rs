//! Reference-counted object URLs
//!
//! Consumers of a binary object hold a [`Binding`], which acquires the object's URL from an
//! [`ObjectUrlCache`]. The URL is created the first time any binding needs it, and revoked when
//! the last binding holding it is rebound, unbound or dropped.
//!
//! On wasm32, [`web`] provides the browser's `URL.createObjectURL` as a provider, along with a
//! per-thread global cache.

pub use objurl_core::*;

#[cfg(target_arch = "wasm32")]
pub use objurl_web as web;
