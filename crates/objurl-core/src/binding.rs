use crate::{Identity, ObjectUrl, ObjectUrlCache, UrlProvider};
use std::fmt;

#[cfg(test)]
mod tests;

/// One consumer's hold on an object URL
///
/// A binding holds at most one acquired URL at a time, and releases it exactly once: when it is
/// bound to another object, on `unbind`, or when it is dropped.
pub struct Binding<P: UrlProvider> {
    cache: ObjectUrlCache<P>,
    bound: Option<(P::Object, ObjectUrl)>,
}

impl<P: UrlProvider> Binding<P> {
    pub fn new(cache: ObjectUrlCache<P>) -> Binding<P> {
        Binding { cache, bound: None }
    }

    pub fn cache(&self) -> &ObjectUrlCache<P> {
        &self.cache
    }

    pub fn current(&self) -> Option<&ObjectUrl> {
        self.bound.as_ref().map(|(_, url)| url)
    }

    pub fn object(&self) -> Option<&P::Object> {
        self.bound.as_ref().map(|(object, _)| object)
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// Returns the URL for `object`, acquiring it if this binding does not already hold it
    ///
    /// Binding again to the object already held is free. Binding to another object first releases
    /// the previous one. If acquiring the new URL then fails, the binding is left unbound.
    pub fn bind(&mut self, object: &P::Object) -> crate::Result<ObjectUrl>
    where
        P::Object: Clone,
    {
        if let Some((current, url)) = &self.bound {
            if current.identity() == object.identity() {
                return Ok(url.clone());
            }
        }
        self.unbind();
        let url = self.cache.acquire(object)?;
        self.bound = Some((object.clone(), url.clone()));
        Ok(url)
    }

    pub fn unbind(&mut self) {
        let Some((object, url)) = self.bound.take() else {
            return;
        };
        if let Err(err) = self.cache.release(&object) {
            tracing::error!(?err, %url, "failed releasing object URL");
        }
    }
}

impl<P: UrlProvider> Drop for Binding<P> {
    fn drop(&mut self) {
        self.unbind();
    }
}

impl<P: UrlProvider> fmt::Debug for Binding<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.object().map(Identity::identity))
            .field("url", &self.current())
            .finish()
    }
}
