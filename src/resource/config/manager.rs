//! 配置管理器
//!
//! 按顺序合并默认值、配置文件和环境变量，最后统一校验

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::env::EnvVar;
use crate::resource::context::RequestContext;
use crate::resource::error::{helpers, ResourceError, ResourceResult};
use crate::resource::source::MessageSource;
use crate::resource::storage::CacheConfig;

/// 资源查找配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ResourceConfig {
    // 查找策略
    pub message_source: MessageSource,
    pub default_bundle: String,
    pub override_bundle_prefix: String,
    pub mapping_name_prefix: String,

    // 请求上下文默认值
    pub site_id: String,
    pub locale: String,

    // 缓存配置
    pub cache_region: String,
    pub cache_capacity: usize,
    /// 0 表示不过期
    pub cache_ttl_secs: u64,

    // 数据来源
    pub bundle_dir: Option<String>,
    pub mapping_file: Option<String>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            message_source: MessageSource::default(),
            default_bundle: constants::DEFAULT_BUNDLE.to_string(),
            override_bundle_prefix: constants::OVERRIDE_BUNDLE_PREFIX.to_string(),
            mapping_name_prefix: constants::MAPPING_NAME_PREFIX.to_string(),

            site_id: constants::DEFAULT_SITE_ID.to_string(),
            locale: constants::DEFAULT_LOCALE.to_string(),

            cache_region: constants::DEFAULT_CACHE_REGION.to_string(),
            cache_capacity: constants::DEFAULT_CACHE_CAPACITY,
            cache_ttl_secs: constants::DEFAULT_CACHE_TTL.as_secs(),

            bundle_dir: None,
            mapping_file: None,
        }
    }
}

impl ResourceConfig {
    /// 验证配置
    pub fn validate(&self) -> ResourceResult<()> {
        if self.default_bundle.trim().is_empty() {
            return Err(helpers::config_error("默认资源包名不能为空"));
        }

        if self.message_source == MessageSource::DynamicFolder
            && self.override_bundle_prefix.is_empty()
        {
            return Err(helpers::config_error("dynamic-folder 模式需要覆盖资源包前缀"));
        }

        if self.site_id.trim().is_empty() {
            return Err(helpers::config_error("站点标识不能为空"));
        }

        if self.message_source.caching_enabled() {
            if self.cache_capacity == 0 {
                return Err(helpers::config_error("启用缓存时缓存容量不能为0"));
            }
            if self.cache_region.trim().is_empty() {
                return Err(helpers::config_error("缓存区域名不能为空"));
            }
        }

        Ok(())
    }

    /// 应用环境变量覆盖，未设置的变量不影响现有值
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{cache, resource};

        match resource::MessageSource::lookup() {
            Some(Ok(source)) => self.message_source = source,
            Some(Err(e)) => tracing::warn!("忽略无效的环境变量: {}", e),
            None => {}
        }

        match resource::SiteId::lookup() {
            Some(Ok(site_id)) => self.site_id = site_id,
            Some(Err(e)) => tracing::warn!("忽略无效的环境变量: {}", e),
            None => {}
        }

        match resource::Locale::lookup() {
            Some(Ok(locale)) => self.locale = locale,
            Some(Err(e)) => tracing::warn!("忽略无效的环境变量: {}", e),
            None => {}
        }

        match resource::BundleDir::lookup() {
            Some(Ok(dir)) => {
                tracing::info!("环境变量覆盖资源包目录: {}", dir);
                self.bundle_dir = Some(dir);
            }
            Some(Err(e)) => tracing::warn!("忽略无效的环境变量: {}", e),
            None => {}
        }

        match resource::MappingFile::lookup() {
            Some(Ok(file)) => self.mapping_file = Some(file),
            Some(Err(e)) => tracing::warn!("忽略无效的环境变量: {}", e),
            None => {}
        }

        match cache::Capacity::lookup() {
            Some(Ok(capacity)) => self.cache_capacity = capacity,
            Some(Err(e)) => tracing::warn!("忽略无效的环境变量: {}", e),
            None => {}
        }

        match cache::Ttl::lookup() {
            Some(Ok(ttl)) => self.cache_ttl_secs = ttl.as_secs(),
            Some(Err(e)) => tracing::warn!("忽略无效的环境变量: {}", e),
            None => {}
        }
    }

    /// 缓存过期时间，0 秒表示不过期
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            region: self.cache_region.clone(),
            capacity: self.cache_capacity,
            ttl: self.cache_ttl(),
        }
    }

    /// 由配置默认值构造请求上下文
    pub fn default_context(&self) -> RequestContext {
        RequestContext::new(&self.site_id, &self.locale)
    }

    /// 站点对应的映射组名
    pub fn mapping_name(&self, site_id: &str) -> String {
        format!("{}{}", self.mapping_name_prefix, site_id)
    }

    /// 覆盖资源包名
    pub fn override_bundle(&self, bundle: &str) -> String {
        format!("{}{}", self.override_bundle_prefix, bundle)
    }

    pub fn bundle_dir(&self) -> Option<PathBuf> {
        self.bundle_dir.as_deref().map(expand_path)
    }

    pub fn mapping_file(&self) -> Option<PathBuf> {
        self.mapping_file.as_deref().map(expand_path)
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// 配置管理器
#[derive(Debug)]
pub struct ConfigManager {
    config: ResourceConfig,
}

impl ConfigManager {
    /// 从默认搜索路径加载并应用环境变量
    pub fn new() -> ResourceResult<Self> {
        let config = Self::load_layered(None)?;
        config.validate()?;

        Ok(Self { config })
    }

    /// 从指定文件加载并应用环境变量
    pub fn from_file(path: &Path) -> ResourceResult<Self> {
        let config = Self::load_layered(Some(path))?;
        config.validate()?;

        Ok(Self { config })
    }

    /// 合并配置文件和环境变量，不做校验
    ///
    /// 调用方还要叠加其他覆盖项时使用，叠加完成后再调用 [`ResourceConfig::validate`]。
    pub fn load_layered(path: Option<&Path>) -> ResourceResult<ResourceConfig> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_config()?,
        };
        config.apply_env_overrides();

        Ok(config)
    }

    /// 获取配置
    pub fn get_config(&self) -> &ResourceConfig {
        &self.config
    }

    pub fn into_config(self) -> ResourceConfig {
        self.config
    }

    fn load_config() -> ResourceResult<ResourceConfig> {
        Self::load_dotenv();

        for path in constants::CONFIG_PATHS {
            let expanded = expand_path(path);
            if expanded.exists() {
                tracing::info!("加载配置文件: {}", expanded.display());
                return Self::load_from_file(&expanded);
            }
        }

        tracing::info!("未找到配置文件，使用默认配置");
        Ok(ResourceConfig::default())
    }

    /// 从指定文件加载配置，`.toml` 以外按JSON解析
    pub fn load_from_file(path: &Path) -> ResourceResult<ResourceConfig> {
        let load = || -> ResourceResult<ResourceConfig> {
            let content = std::fs::read_to_string(path)?;
            if path.extension().and_then(|ext| ext.to_str()) == Some("toml") {
                Ok(toml::from_str(&content)?)
            } else {
                Ok(serde_json::from_str(&content)?)
            }
        };

        load().map_err(|e| e.with_context(path.display()))
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let env_files = [".env.local", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &Path) -> ResourceResult<()> {
        let config = ResourceConfig::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| ResourceError::ConfigError(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ResourceError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::error::ErrorCategory;

    #[test]
    fn test_default_config_is_valid() {
        let config = ResourceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.message_source, MessageSource::DynamicFolder);
        assert_eq!(config.default_bundle, "message");
        assert_eq!(config.cache_region, "CustomResources");
    }

    #[test]
    fn test_validation_errors() {
        let mut config = ResourceConfig::default();
        config.cache_capacity = 0;
        assert!(config.validate().is_err());

        config.message_source = MessageSource::System;
        assert!(config.validate().is_ok());

        config.default_bundle = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_toml_with_defaults() {
        let config: ResourceConfig = toml::from_str(
            r#"
            message_source = "key-value-map"
            site_id = "RefArch"
            cache_ttl_secs = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.message_source, MessageSource::KeyValueMap);
        assert_eq!(config.site_id, "RefArch");
        assert_eq!(config.cache_ttl(), None);
        assert_eq!(config.default_bundle, "message");
        assert_eq!(config.mapping_name("RefArch"), "c_resource_bundles_RefArch");
    }

    #[test]
    fn test_override_bundle_name() {
        let config = ResourceConfig::default();
        assert_eq!(config.override_bundle("checkout"), "co_checkout");
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resource-config.json");
        std::fs::write(&path, r#"{"message_source": "system", "cache_capacity": 0}"#).unwrap();

        let manager = ConfigManager::from_file(&path).unwrap();
        assert_eq!(manager.get_config().message_source, MessageSource::System);
        assert_eq!(manager.get_config().site_id, "default");
    }

    #[test]
    fn test_load_layered_defers_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resource-config.toml");
        std::fs::write(&path, "cache_capacity = 0\n").unwrap();

        assert!(ConfigManager::from_file(&path).is_err());

        let mut config = ConfigManager::load_layered(Some(&path)).unwrap();
        assert_eq!(config.cache_capacity, 0);
        config.message_source = MessageSource::System;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_errors_keep_category() {
        let dir = tempfile::tempdir().unwrap();

        let err = ConfigManager::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Io);

        let path = dir.path().join("resource-config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = ConfigManager::load_from_file(&path).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Parsing);
        assert!(err.to_string().contains("resource-config.json"));
    }

    #[test]
    fn test_example_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resource-config.toml");

        ConfigManager::generate_example_config(&path).unwrap();
        let loaded = ConfigManager::load_from_file(&path).unwrap();
        assert_eq!(loaded, ResourceConfig::default());
    }
}
