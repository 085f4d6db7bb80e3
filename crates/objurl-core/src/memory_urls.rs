use crate::UrlProvider;
use anyhow::Context;
use std::{cell::RefCell, collections::HashMap, sync::Arc};

pub const DEFAULT_ORIGIN: &str = "null";

/// In-process object URL registry, for hosts without a browser
///
/// Like the browser's blob URL store, a URL resolves to its bytes from `create` until `revoke`.
#[derive(Debug)]
pub struct MemoryUrls {
    origin: String,
    registry: RefCell<HashMap<String, Arc<[u8]>>>,
}

impl MemoryUrls {
    pub fn new(origin: impl Into<String>) -> MemoryUrls {
        MemoryUrls {
            origin: origin.into(),
            registry: RefCell::new(HashMap::new()),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn resolve(&self, url: &str) -> Option<Arc<[u8]>> {
        self.registry.borrow().get(url).cloned()
    }

    pub fn live_urls(&self) -> usize {
        self.registry.borrow().len()
    }
}

impl Default for MemoryUrls {
    fn default() -> MemoryUrls {
        MemoryUrls::new(DEFAULT_ORIGIN)
    }
}

impl UrlProvider for MemoryUrls {
    type Object = Arc<[u8]>;

    fn create(&self, object: &Arc<[u8]>) -> anyhow::Result<String> {
        let url = format!(
            "blob:{}/{}",
            self.origin,
            ulid::Ulid::new().to_string().to_lowercase()
        );
        self.registry.borrow_mut().insert(url.clone(), object.clone());
        Ok(url)
    }

    fn revoke(&self, url: &str) -> anyhow::Result<()> {
        self.registry
            .borrow_mut()
            .remove(url)
            .map(|_| ())
            .with_context(|| format!("{url} is not a live object URL"))
    }
}
