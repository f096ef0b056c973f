//! # 本地化资源模块
//!
//! 把 (键, 资源包, 语言, 格式化参数) 解析成展示文本，带缓存与多级回退。
//!
//! ## 模块组织
//!
//! - `resolver` - 消息解析器，缓存与回退的核心流程
//! - `source` - 外部能力：基础查找、键值映射存储、查找策略
//! - `storage` - 消息缓存与内存映射存储
//! - `catalog` - `.properties` 资源包目录
//! - `context` - 请求上下文与语言回退栈
//! - `format` - 位置参数格式化
//! - `config` - 配置加载与校验
//! - `error` - 错误类型

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod resolver;
pub mod source;
pub mod storage;

pub use catalog::PropertiesCatalog;
pub use config::{ConfigManager, ResourceConfig};
pub use context::{LocaleStack, RequestContext};
pub use error::{ResourceError, ResourceResult};
pub use format::format_message;
pub use resolver::{MessageResolver, MessageResolverBuilder};
pub use source::{BaseLookup, MappingKey, MappingStore, MappingValue, MessageSource};
pub use storage::{CacheEntry, CacheLookup, CacheStore, LruCacheStore, MemoryMappingStore};
