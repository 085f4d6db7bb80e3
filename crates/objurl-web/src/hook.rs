use crate::{global_cache, BinaryObject};
use objurl_core::{Binding, ObjectUrl};
use yew::prelude::*;

/// Object URL for `object`, held for as long as the calling component is mounted
///
/// Re-rendering with the same object reuses the URL. Re-rendering with another object releases the
/// previous URL before acquiring the new one.
#[hook]
pub fn use_object_url(object: &BinaryObject) -> objurl_core::Result<ObjectUrl> {
    let binding = use_mut_ref(|| Binding::new(global_cache()));
    {
        let binding = binding.clone();
        use_effect_with((), move |_| move || binding.borrow_mut().unbind());
    }
    let url = binding.borrow_mut().bind(object);
    url
}
