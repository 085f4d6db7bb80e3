mod binding;
mod cache;
mod config;
mod error;
mod ids;
mod memory_urls;
mod provider;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use binding::*;
pub use cache::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use memory_urls::*;
pub use provider::*;
