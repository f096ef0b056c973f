//! # Storefront Resource
//!
//! 店铺前台本地化消息查找库：缓存优先，按配置的主来源查找，最后回退到平台基础查找。
//!
//! ## 模块组织
//!
//! - `resource` - 消息解析、缓存、资源包与配置
//! - `env` - 类型安全的环境变量访问

pub mod env;
pub mod resource;

// Re-export commonly used items for convenience
pub use resource::{
    BaseLookup, ConfigManager, MessageResolver, MessageSource, PropertiesCatalog, RequestContext,
    ResourceConfig, ResourceError, ResourceResult,
};
