//! 资源配置管理模块
//!
//! 支持配置文件、环境变量和默认值

pub mod manager;

pub use manager::{ConfigManager, ResourceConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    /// 未指定资源包时使用的基础资源包
    pub const DEFAULT_BUNDLE: &str = "message";
    /// 覆盖资源包前缀，`co_message` 覆盖 `message`
    pub const OVERRIDE_BUNDLE_PREFIX: &str = "co_";
    /// 映射组名前缀，后接站点标识
    pub const MAPPING_NAME_PREFIX: &str = "c_resource_bundles_";

    pub const DEFAULT_SITE_ID: &str = "default";
    pub const DEFAULT_LOCALE: &str = "default";

    // 缓存设置
    pub const DEFAULT_CACHE_REGION: &str = "CustomResources";
    pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;
    pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600); // 1小时

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "resource-config.toml",
        "resource-config.json",
        ".resource-config.toml",
        "~/.config/storefront/resource.toml",
        "/etc/storefront/resource.toml",
    ];
}
