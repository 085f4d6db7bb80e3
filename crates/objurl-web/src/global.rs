use crate::{BinaryObject, BrowserUrls};
use objurl_core::{Binding, CacheConfig, ObjectUrl, ObjectUrlCache};

pub type ObjectUrlBinding = Binding<BrowserUrls>;

thread_local! {
    // One per window or worker, object URLs cannot be shared across them anyway
    static GLOBAL_CACHE: ObjectUrlCache<BrowserUrls> =
        ObjectUrlCache::new(BrowserUrls, CacheConfig::default());
}

/// The cache shared by every consumer running on this thread
pub fn global_cache() -> ObjectUrlCache<BrowserUrls> {
    GLOBAL_CACHE.with(Clone::clone)
}

/// Acquire an object URL from the global cache, for as long as the returned binding lives
pub fn bind_object_url(
    object: impl Into<BinaryObject>,
) -> objurl_core::Result<(ObjectUrlBinding, ObjectUrl)> {
    let mut binding = Binding::new(global_cache());
    let url = binding.bind(&object.into())?;
    Ok((binding, url))
}
