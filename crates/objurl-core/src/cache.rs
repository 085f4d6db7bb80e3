use crate::{
    CacheConfig, Error, Identity, Liveness, ObjectKey, ObjectUrl, UnbalancedRelease, UrlProvider,
};
use std::{
    cell::RefCell,
    collections::{hash_map, HashMap},
    fmt,
    rc::Rc,
};


type Guard<P> = <<P as UrlProvider>::Object as Identity>::Guard;

struct Entry<G> {
    url: ObjectUrl,
    references: usize,
    guard: G,
}

impl<G> fmt::Debug for Entry<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("url", &self.url)
            .field("references", &self.references)
            .finish_non_exhaustive()
    }
}

struct Inner<P: UrlProvider> {
    provider: P,
    config: CacheConfig,
    entries: RefCell<HashMap<ObjectKey, Entry<Guard<P>>>>,
}

/// Reference-counted cache of object URLs
///
/// At most one URL exists per binary object at any time. It is created on the first `acquire` and
/// revoked by the `release` that balances the last outstanding `acquire`.
///
/// Cloning returns another handle to the same cache. The cache only stores identity tokens, never
/// the binary objects themselves.
pub struct ObjectUrlCache<P: UrlProvider> {
    inner: Rc<Inner<P>>,
}

impl<P: UrlProvider> Clone for ObjectUrlCache<P> {
    fn clone(&self) -> ObjectUrlCache<P> {
        ObjectUrlCache {
            inner: self.inner.clone(),
        }
    }
}

impl<P: UrlProvider> fmt::Debug for ObjectUrlCache<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectUrlCache")
            .field("config", &self.inner.config)
            .field("entries", &self.inner.entries)
            .finish_non_exhaustive()
    }
}

impl<P: UrlProvider> ObjectUrlCache<P> {
    pub fn new(provider: P, config: CacheConfig) -> ObjectUrlCache<P> {
        ObjectUrlCache {
            inner: Rc::new(Inner {
                provider,
                config,
                entries: RefCell::new(HashMap::new()),
            }),
        }
    }

    pub fn provider(&self) -> &P {
        &self.inner.provider
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    pub fn acquire(&self, object: &P::Object) -> crate::Result<ObjectUrl> {
        let key = object.identity();
        let stale = {
            let mut entries = self.inner.entries.borrow_mut();
            if let Some(entry) = entries.get_mut(&key) {
                if entry.guard.is_alive() {
                    entry.references += 1;
                    tracing::trace!(?key, references = entry.references, "reusing object URL");
                    return Ok(entry.url.clone());
                }
            }
            take_stale(&mut entries)
        };
        self.revoke_stale(stale);

        // No borrow may be held here, the provider is free to call back into the cache
        let url = ObjectUrl::from(self.inner.provider.create(object).map_err(Error::Create)?);
        tracing::debug!(?key, %url, "created object URL");

        let existing = match self.inner.entries.borrow_mut().entry(key) {
            hash_map::Entry::Vacant(v) => {
                v.insert(Entry {
                    url: url.clone(),
                    references: 1,
                    guard: object.guard(),
                });
                return Ok(url);
            }
            hash_map::Entry::Occupied(mut o) => {
                let entry = o.get_mut();
                entry.references += 1;
                entry.url.clone()
            }
        };

        // The provider acquired the same object while creating it. Keep the first URL so that it
        // stays the only one for this object. The reference is already counted, so a failure to
        // get rid of the extra URL must not fail the acquire.
        if let Err(err) = self.inner.provider.revoke(&url) {
            tracing::error!(?err, ?key, %url, "failed revoking duplicate object URL");
        }
        Ok(existing)
    }

    pub fn release(&self, object: &P::Object) -> crate::Result<()> {
        let key = object.identity();
        let url = {
            let mut entries = self.inner.entries.borrow_mut();
            let hash_map::Entry::Occupied(mut o) = entries.entry(key) else {
                return self.unbalanced_release(key);
            };
            o.get_mut().references -= 1;
            let references = o.get().references;
            tracing::trace!(?key, references, "released object URL");
            if references > 0 {
                return Ok(());
            }
            o.remove().url
        };

        // The entry is gone before revoking, so a failure here cannot leave a dangling URL in
        // the cache
        tracing::debug!(?key, %url, "revoking object URL");
        self.inner
            .provider
            .revoke(&url)
            .map_err(|source| Error::Revoke { url, source })
    }

    fn unbalanced_release(&self, key: ObjectKey) -> crate::Result<()> {
        match self.inner.config.unbalanced_release {
            UnbalancedRelease::Ignore => Ok(()),
            UnbalancedRelease::Warn => {
                tracing::warn!(?key, "released an object URL that was not acquired");
                Ok(())
            }
            UnbalancedRelease::Error => Err(Error::UnbalancedRelease(key)),
        }
    }

    fn revoke_stale(&self, stale: Vec<(ObjectKey, ObjectUrl)>) {
        for (key, url) in stale {
            tracing::warn!(?key, %url, "revoking object URL of an object dropped while acquired");
            if let Err(err) = self.inner.provider.revoke(&url) {
                tracing::error!(?err, ?key, %url, "failed revoking stale object URL");
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn references(&self, key: ObjectKey) -> Option<usize> {
        self.inner
            .entries
            .borrow()
            .get(&key)
            .map(|e| e.references)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self, context: impl Fn() -> String) {
        let entries = self.inner.entries.borrow();
        let mut urls = std::collections::HashSet::new();
        for (key, entry) in entries.iter() {
            assert!(
                entry.references > 0,
                "{}: {key:?} has an entry with no references",
                context()
            );
            assert!(
                urls.insert(entry.url.clone()),
                "{}: {} is shared by two entries",
                context(),
                entry.url
            );
        }
    }
}

/// Remove the entries of objects that were dropped without being released
fn take_stale<G: Liveness>(
    entries: &mut HashMap<ObjectKey, Entry<G>>,
) -> Vec<(ObjectKey, ObjectUrl)> {
    let mut stale = Vec::new();
    entries.retain(|key, entry| {
        let alive = entry.guard.is_alive();
        if !alive {
            stale.push((*key, entry.url.clone()));
        }
        alive
    });
    stale
}
