use std::{fmt, ops::Deref, rc::Rc, sync::Arc};

/// Identity token of a binary object
///
/// Two tokens are equal if and only if they were derived from the same object, never because two
/// objects happen to hold the same bytes.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ObjectKey(pub u64);

/// Reference identity of a binary object
pub trait Identity {
    /// Held by the cache next to the object's entry, must not keep the object itself alive
    type Guard: Liveness;

    fn identity(&self) -> ObjectKey;

    fn guard(&self) -> Self::Guard;
}

/// Whether the object an identity was taken from can still be reached
pub trait Liveness: 'static {
    fn is_alive(&self) -> bool;
}

impl<T: ?Sized + 'static> Liveness for std::sync::Weak<T> {
    fn is_alive(&self) -> bool {
        self.strong_count() > 0
    }
}

impl<T: ?Sized + 'static> Liveness for std::rc::Weak<T> {
    fn is_alive(&self) -> bool {
        self.strong_count() > 0
    }
}

/// For identities that are never reused
impl Liveness for () {
    fn is_alive(&self) -> bool {
        true
    }
}

// The address is only unique while the allocation exists. The guard is a weak pointer, which keeps
// the allocation (but not the value) around, so the address cannot be reused while the cache still
// has an entry for it.
impl<T: ?Sized + 'static> Identity for Arc<T> {
    type Guard = std::sync::Weak<T>;

    fn identity(&self) -> ObjectKey {
        ObjectKey(Arc::as_ptr(self) as *const () as usize as u64)
    }

    fn guard(&self) -> std::sync::Weak<T> {
        Arc::downgrade(self)
    }
}

impl<T: ?Sized + 'static> Identity for Rc<T> {
    type Guard = std::rc::Weak<T>;

    fn identity(&self) -> ObjectKey {
        ObjectKey(Rc::as_ptr(self) as *const () as usize as u64)
    }

    fn guard(&self) -> std::rc::Weak<T> {
        Rc::downgrade(self)
    }
}

/// URL addressing the content of a binary object, as returned by the creation primitive
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
pub struct ObjectUrl(Arc<str>);

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ObjectUrl {
    fn from(url: String) -> ObjectUrl {
        ObjectUrl(Arc::from(url))
    }
}

impl From<&str> for ObjectUrl {
    fn from(url: &str) -> ObjectUrl {
        ObjectUrl(Arc::from(url))
    }
}

impl Deref for ObjectUrl {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ObjectUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ObjectUrl {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for ObjectUrl {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
