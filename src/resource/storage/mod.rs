//! 存储模块
//!
//! 提供消息缓存和键值映射存储。

pub mod cache;
pub mod mapping;

pub use cache::{
    CacheConfig, CacheEntry, CacheKey, CacheLookup, CacheStats, CacheStore, LruCacheStore,
    ResourceCache,
};
pub use mapping::{MappingRecord, MemoryMappingStore};
