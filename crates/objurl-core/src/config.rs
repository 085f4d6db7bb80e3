use crate::ResultExt;

/// What `ObjectUrlCache::release` does when the object has no live entry
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnbalancedRelease {
    /// Silently do nothing
    #[default]
    Ignore,

    /// Do nothing, but log a warning
    Warn,

    /// Return `Error::UnbalancedRelease`
    Error,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub unbalanced_release: UnbalancedRelease,
}

impl CacheConfig {
    pub fn strict() -> CacheConfig {
        CacheConfig {
            unbalanced_release: UnbalancedRelease::Error,
        }
    }

    pub fn from_json(json: &str) -> crate::Result<CacheConfig> {
        serde_json::from_str(json).wrap_context("parsing object URL cache configuration")
    }
}
