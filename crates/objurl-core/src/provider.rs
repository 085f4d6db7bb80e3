use crate::Identity;

/// Creation and disposal primitives for object URLs
///
/// `create` may allocate a limited external resource that stays alive until `revoke` is called
/// with the URL it returned. `ObjectUrlCache` guarantees `revoke` is called at most once per
/// created URL.
pub trait UrlProvider: 'static {
    type Object: Identity;

    fn create(&self, object: &Self::Object) -> anyhow::Result<String>;

    fn revoke(&self, url: &str) -> anyhow::Result<()>;
}

impl<P: UrlProvider> UrlProvider for std::rc::Rc<P> {
    type Object = P::Object;

    fn create(&self, object: &Self::Object) -> anyhow::Result<String> {
        (**self).create(object)
    }

    fn revoke(&self, url: &str) -> anyhow::Result<()> {
        (**self).revoke(url)
    }
}
