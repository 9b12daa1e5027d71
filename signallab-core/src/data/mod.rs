//! Injected collaborators: the price-history accessor and the key/value cache.

pub mod cache;
pub mod provider;

pub use cache::{cache_key, cached, KvCache, MemoryCache};
pub use provider::{fetch_with_fallback, PriceHistory, StaticHistory};
