//! Recording URL provider, for testing code built on top of `ObjectUrlCache`

use crate::{Identity, ObjectKey, UrlProvider};
use std::{cell::RefCell, collections::VecDeque, rc::Rc, sync::Arc};

#[derive(Debug, Default)]
struct Log {
    created: Vec<(ObjectKey, String)>,
    revoked: Vec<String>,
    scripted: VecDeque<String>,
    fail_creates: usize,
    fail_revokes: usize,
    counter: usize,
}

/// Provider minting `blob:mock-N` URLs for `Arc<[u8]>` objects and recording every call
///
/// Clones share the same log, so a clone can be kept to inspect calls made through a cache.
#[derive(Clone, Debug, Default)]
pub struct RecordingUrls {
    log: Rc<RefCell<Log>>,
}

impl RecordingUrls {
    pub fn new() -> RecordingUrls {
        RecordingUrls::default()
    }

    /// Make the next calls to `create` return these URLs, in order
    pub fn script<I, S>(&self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.log
            .borrow_mut()
            .scripted
            .extend(urls.into_iter().map(Into::into));
    }

    pub fn fail_next_creates(&self, count: usize) {
        self.log.borrow_mut().fail_creates = count;
    }

    pub fn fail_next_revokes(&self, count: usize) {
        self.log.borrow_mut().fail_revokes = count;
    }

    pub fn created(&self) -> Vec<(ObjectKey, String)> {
        self.log.borrow().created.clone()
    }

    pub fn created_urls(&self) -> Vec<String> {
        self.log
            .borrow()
            .created
            .iter()
            .map(|(_, url)| url.clone())
            .collect()
    }

    pub fn revoked(&self) -> Vec<String> {
        self.log.borrow().revoked.clone()
    }

    pub fn create_count(&self) -> usize {
        self.log.borrow().created.len()
    }

    pub fn revoke_count(&self) -> usize {
        self.log.borrow().revoked.len()
    }
}

impl UrlProvider for RecordingUrls {
    type Object = Arc<[u8]>;

    fn create(&self, object: &Arc<[u8]>) -> anyhow::Result<String> {
        let mut log = self.log.borrow_mut();
        if log.fail_creates > 0 {
            log.fail_creates -= 1;
            anyhow::bail!("mock creation failure");
        }
        let url = match log.scripted.pop_front() {
            Some(url) => url,
            None => {
                log.counter += 1;
                format!("blob:mock-{}", log.counter)
            }
        };
        log.created.push((object.identity(), url.clone()));
        Ok(url)
    }

    fn revoke(&self, url: &str) -> anyhow::Result<()> {
        let mut log = self.log.borrow_mut();
        log.revoked.push(url.to_string());
        if log.fail_revokes > 0 {
            log.fail_revokes -= 1;
            anyhow::bail!("mock revocation failure for {url}");
        }
        Ok(())
    }
}

pub fn blob(data: &[u8]) -> Arc<[u8]> {
    Arc::from(data)
}
