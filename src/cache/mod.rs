//! Resolution cache and its durable mirror.

pub mod error;
pub mod mirror;
pub mod resolution;
pub mod types;


pub use error::{StorageError, StorageResult};
pub use mirror::{CACHE_NAMESPACE, CacheMirror, FileCacheMirror};
pub use resolution::ResolutionCache;
pub use types::{CacheEntry, CacheStats, now_millis};
