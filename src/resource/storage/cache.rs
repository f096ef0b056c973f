//! 资源消息缓存
//!
//! 缓存值区分“已找到”和“查过但没找到”，读取时再区分“从未查过”。

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::resource::config::constants;
use crate::resource::context::RequestContext;

// ============================================================================
// 核心类型
// ============================================================================

/// 缓存中保存的值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    Found(String),
    /// 查过但没找到
    NotFound,
}

impl CacheEntry {
    /// 空字符串同样视为没找到
    pub fn from_message(message: Option<&str>) -> Self {
        match message {
            Some(message) if !message.is_empty() => CacheEntry::Found(message.to_string()),
            _ => CacheEntry::NotFound,
        }
    }
}

/// 缓存读取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Found(String),
    NotFound,
    /// 缓存未命中
    Absent,
}

impl From<Option<CacheEntry>> for CacheLookup {
    fn from(entry: Option<CacheEntry>) -> Self {
        match entry {
            Some(CacheEntry::Found(message)) => CacheLookup::Found(message),
            Some(CacheEntry::NotFound) => CacheLookup::NotFound,
            None => CacheLookup::Absent,
        }
    }
}

/// 缓存键：站点、语言、资源包、消息键与参数片段
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub site_id: String,
    pub locale: String,
    pub bundle: String,
    pub key: String,
    pub args: String,
}

impl CacheKey {
    pub fn new(ctx: &RequestContext, bundle: &str, key: &str) -> Self {
        Self {
            site_id: ctx.site_id.clone(),
            locale: ctx.locale.clone(),
            bundle: bundle.to_string(),
            key: key.to_string(),
            args: String::new(),
        }
    }

    pub fn with_args(mut self, args_segment: impl Into<String>) -> Self {
        self.args = args_segment.into();
        self
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}{}",
            self.site_id, self.locale, self.bundle, self.key, self.args
        )
    }
}

/// 缓存存储能力，按命名区域划分
///
/// 只提供独立的 get/put，不保证并发下的读己所写。
pub trait CacheStore: Send + Sync {
    fn region(&self) -> &str;
    fn get(&self, key: &str) -> Option<CacheEntry>;
    fn put(&self, key: String, entry: CacheEntry);
}

/// 缓存配置
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub region: String,
    pub capacity: usize,
    pub ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            region: constants::DEFAULT_CACHE_REGION.to_string(),
            capacity: constants::DEFAULT_CACHE_CAPACITY,
            ttl: Some(constants::DEFAULT_CACHE_TTL),
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub total_requests: u64,
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub evictions: u64,
    pub expired: u64,
    pub total_entries: usize,
}

impl CacheStats {
    /// 计算缓存命中率
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.hits as f64 / self.total_requests as f64
        }
    }
}

#[derive(Debug)]
struct StoredEntry {
    entry: CacheEntry,
    created_at: Instant,
}

impl StoredEntry {
    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        ttl.is_some_and(|ttl| self.created_at.elapsed() > ttl)
    }
}

// ============================================================================
// 实现
// ============================================================================

/// 进程内LRU缓存存储
pub struct LruCacheStore {
    region: String,
    entries: Mutex<LruCache<String, StoredEntry>>,
    ttl: Option<Duration>,
    stats: Mutex<CacheStats>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl LruCacheStore {
    pub fn new(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            region: config.region,
            entries: Mutex::new(LruCache::new(capacity)),
            ttl: config.ttl,
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// 使用指定区域名和容量创建缓存，不过期
    pub fn with_capacity(region: &str, capacity: usize) -> Self {
        Self::new(CacheConfig {
            region: region.to_string(),
            capacity,
            ttl: None,
        })
    }

    /// 获取缓存大小
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 检查是否包含未过期的键
    pub fn contains_key(&self, key: &str) -> bool {
        lock(&self.entries)
            .peek(key)
            .is_some_and(|stored| !stored.is_expired(self.ttl))
    }

    /// 清理过期条目
    pub fn cleanup_expired(&self) -> usize {
        let mut entries = lock(&self.entries);
        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, stored)| stored.is_expired(self.ttl))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            entries.pop(key);
        }

        let mut stats = lock(&self.stats);
        stats.expired += expired.len() as u64;
        stats.total_entries = entries.len();

        expired.len()
    }

    /// 获取统计信息
    pub fn get_stats(&self) -> CacheStats {
        let mut result = lock(&self.stats).clone();
        result.total_entries = self.len();
        result
    }

    /// 重置统计信息
    pub fn reset_stats(&self) {
        *lock(&self.stats) = CacheStats::default();
    }

    /// 清空缓存
    pub fn clear(&self) {
        lock(&self.entries).clear();
        lock(&self.stats).total_entries = 0;
    }
}

impl CacheStore for LruCacheStore {
    fn region(&self) -> &str {
        &self.region
    }

    fn get(&self, key: &str) -> Option<CacheEntry> {
        let mut entries = lock(&self.entries);
        let mut stats = lock(&self.stats);
        stats.total_requests += 1;

        let expired = match entries.get(key) {
            Some(stored) if !stored.is_expired(self.ttl) => {
                stats.hits += 1;
                return Some(stored.entry.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(key);
            stats.expired += 1;
        }

        stats.misses += 1;
        None
    }

    fn put(&self, key: String, entry: CacheEntry) {
        let mut entries = lock(&self.entries);
        let stored = StoredEntry {
            entry,
            created_at: Instant::now(),
        };

        let displaced = entries.push(key.clone(), stored);

        let mut stats = lock(&self.stats);
        stats.sets += 1;
        if displaced.is_some_and(|(old_key, _)| old_key != key) {
            stats.evictions += 1;
        }
        stats.total_entries = entries.len();
    }
}

/// 解析器使用的缓存视图
///
/// 负责键的组合以及写入前的参数检查。
#[derive(Clone)]
pub struct ResourceCache {
    store: Arc<dyn CacheStore>,
}

impl ResourceCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// 读取缓存，键或资源包为空时视为未命中
    ///
    /// `args` 为 [`args_segment`](crate::resource::format::args_segment) 生成的参数片段。
    pub fn lookup(&self, ctx: &RequestContext, bundle: &str, key: &str, args: &str) -> CacheLookup {
        if key.is_empty() || bundle.is_empty() {
            return CacheLookup::Absent;
        }

        let cache_key = CacheKey::new(ctx, bundle, key).with_args(args).to_string();
        self.store.get(&cache_key).into()
    }

    /// 写入解析结果，`None` 写入为“没找到”
    ///
    /// 键或资源包为空时静默跳过，返回是否真正写入。
    pub fn store(
        &self,
        ctx: &RequestContext,
        bundle: &str,
        key: &str,
        args: &str,
        message: Option<&str>,
    ) -> bool {
        if key.is_empty() || bundle.is_empty() {
            tracing::trace!("跳过无效的缓存写入: bundle={:?} key={:?}", bundle, key);
            return false;
        }

        let cache_key = CacheKey::new(ctx, bundle, key).with_args(args).to_string();
        self.store.put(cache_key, CacheEntry::from_message(message));
        true
    }
}
