//! 本地化消息解析器
//!
//! 查找顺序：缓存 -> 主来源（按 [`MessageSource`] 选择）-> 平台基础查找。
//! 凡是越过缓存的解析都会把最终结果写回缓存，包括“没找到”，
//! 同一个键在缓存有效期内不会再次走回退链。
//!
//! ```ignore
//! let resolver = MessageResolver::builder(ResourceConfig::default())
//!     .base_lookup(Arc::new(catalog))
//!     .build()?;
//! let ctx = RequestContext::new("RefArch", "de_DE");
//! let label = resolver.msg_in_bundle(&ctx, "button.checkout", Some("checkout"), None);
//! ```

use std::sync::Arc;

use super::catalog::PropertiesCatalog;
use super::config::ResourceConfig;
use super::context::RequestContext;
use super::error::{helpers, ResourceResult};
use super::format::{args_segment, format_message};
use super::source::{BaseLookup, MappingKey, MappingStore, MappingValue, MessageSource};
use super::storage::{CacheLookup, CacheStore, LruCacheStore, MemoryMappingStore, ResourceCache};

/// 本地化消息解析器
pub struct MessageResolver {
    config: ResourceConfig,
    base: Arc<dyn BaseLookup>,
    mappings: Option<Arc<dyn MappingStore>>,
    cache: Option<ResourceCache>,
}

/// [`MessageResolver`] 构建器
pub struct MessageResolverBuilder {
    config: ResourceConfig,
    base: Option<Arc<dyn BaseLookup>>,
    mappings: Option<Arc<dyn MappingStore>>,
    cache_store: Option<Arc<dyn CacheStore>>,
}

impl MessageResolverBuilder {
    pub fn base_lookup(mut self, base: Arc<dyn BaseLookup>) -> Self {
        self.base = Some(base);
        self
    }

    pub fn mapping_store(mut self, mappings: Arc<dyn MappingStore>) -> Self {
        self.mappings = Some(mappings);
        self
    }

    /// 未指定时按配置创建 [`LruCacheStore`]
    pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache_store = Some(store);
        self
    }

    pub fn build(self) -> ResourceResult<MessageResolver> {
        self.config.validate()?;

        let base = self
            .base
            .ok_or_else(|| helpers::config_error("缺少基础查找实现"))?;

        if self.config.message_source == MessageSource::KeyValueMap && self.mappings.is_none() {
            return Err(helpers::config_error("key-value-map 模式需要映射存储"));
        }

        let cache = if self.config.message_source.caching_enabled() {
            let store = match self.cache_store {
                Some(store) => store,
                None => Arc::new(LruCacheStore::new(self.config.cache_config())) as Arc<dyn CacheStore>,
            };
            tracing::debug!("消息缓存区域: {}", store.region());
            Some(ResourceCache::new(store))
        } else {
            None
        };

        Ok(MessageResolver {
            config: self.config,
            base,
            mappings: self.mappings,
            cache,
        })
    }
}

impl MessageResolver {
    pub fn builder(config: ResourceConfig) -> MessageResolverBuilder {
        MessageResolverBuilder {
            config,
            base: None,
            mappings: None,
            cache_store: None,
        }
    }

    /// 按配置装配：资源包目录作为基础查找，映射文件导入到站点映射组
    ///
    /// 映射文件只属于 `config.site_id` 对应的映射组，其他站点的请求查不到这些映射。
    pub fn from_config(config: ResourceConfig) -> ResourceResult<Self> {
        let catalog = match config.bundle_dir() {
            Some(dir) => PropertiesCatalog::load_dir(&dir)?,
            None => PropertiesCatalog::new(),
        };

        let mut builder = Self::builder(config.clone()).base_lookup(Arc::new(catalog));

        if let Some(file) = config.mapping_file() {
            let store = MemoryMappingStore::new();
            store.import_json_file(&config.mapping_name(&config.site_id), &file)?;
            builder = builder.mapping_store(Arc::new(store));
        } else if config.message_source == MessageSource::KeyValueMap {
            builder = builder.mapping_store(Arc::new(MemoryMappingStore::new()));
        }

        builder.build()
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    pub fn message_source(&self) -> MessageSource {
        self.config.message_source
    }

    /// 基础资源包中的消息，找不到时返回键本身
    pub fn msg(&self, ctx: &RequestContext, key: &str) -> String {
        self.resolve(ctx, key, &self.config.default_bundle, key, None)
    }

    /// 基础资源包中的消息，默认消息为空时退回键本身
    pub fn msg_with_default(&self, ctx: &RequestContext, key: &str, default: Option<&str>) -> String {
        let default = non_empty(default).unwrap_or(key);
        self.resolve(ctx, key, &self.config.default_bundle, default, None)
    }

    /// 指定资源包中的消息，资源包为空时使用基础资源包
    pub fn msg_in_bundle(
        &self,
        ctx: &RequestContext,
        key: &str,
        bundle: Option<&str>,
        default: Option<&str>,
    ) -> String {
        let default = non_empty(default).unwrap_or(key);
        let bundle = non_empty(bundle).unwrap_or(self.config.default_bundle.as_str());
        self.resolve(ctx, key, bundle, default, None)
    }

    /// 带位置参数的消息，参数参与缓存键
    pub fn msgf(
        &self,
        ctx: &RequestContext,
        key: &str,
        bundle: Option<&str>,
        default: Option<&str>,
        args: &[&str],
    ) -> String {
        let default = non_empty(default).unwrap_or(key);
        let bundle = non_empty(bundle).unwrap_or(self.config.default_bundle.as_str());
        let args = (!args.is_empty()).then_some(args);
        self.resolve(ctx, key, bundle, default, args)
    }

    /// 按参数个数分派：`[key]`、`[key, default]`、`[key, bundle, default]`
    ///
    /// 其他个数返回 `None`，表示调用形式不支持，而不是消息不存在。
    pub fn dispatch(&self, ctx: &RequestContext, args: &[&str]) -> Option<String> {
        match *args {
            [key] => Some(self.msg(ctx, key)),
            [key, default] => Some(self.msg_with_default(ctx, key, Some(default))),
            [key, bundle, default] => Some(self.msg_in_bundle(ctx, key, Some(bundle), Some(default))),
            _ => None,
        }
    }

    fn resolve(
        &self,
        ctx: &RequestContext,
        key: &str,
        bundle: &str,
        default: &str,
        args: Option<&[&str]>,
    ) -> String {
        match self.lookup(ctx, key, bundle, args) {
            Some(message) => message,
            None => match args {
                Some(args) => format_message(default, args),
                None => default.to_string(),
            },
        }
    }

    /// 缓存、主来源、基础查找依次尝试，返回 `None` 表示各层都没有
    fn lookup(
        &self,
        ctx: &RequestContext,
        key: &str,
        bundle: &str,
        args: Option<&[&str]>,
    ) -> Option<String> {
        if key.is_empty() || bundle.is_empty() {
            return None;
        }

        let args_key = args.map(|args| args_segment(args)).unwrap_or_default();

        if let Some(cache) = &self.cache {
            match cache.lookup(ctx, bundle, key, &args_key) {
                CacheLookup::Found(message) => return Some(message),
                CacheLookup::NotFound => return None,
                CacheLookup::Absent => {}
            }
        }

        let resolved = self
            .primary(ctx, key, bundle, args)
            .or_else(|| self.fallback(ctx, key, bundle, args));

        if let Some(cache) = &self.cache {
            cache.store(ctx, bundle, key, &args_key, resolved.as_deref());
        }

        resolved
    }

    fn primary(
        &self,
        ctx: &RequestContext,
        key: &str,
        bundle: &str,
        args: Option<&[&str]>,
    ) -> Option<String> {
        let message = match self.config.message_source {
            MessageSource::System => None,
            MessageSource::DynamicFolder => {
                let override_bundle = self.config.override_bundle(bundle);
                non_empty_owned(self.base.find(key, &override_bundle, &ctx.locale))
                    .or_else(|| non_empty_owned(self.base.find(key, bundle, &ctx.locale)))
            }
            MessageSource::KeyValueMap => self.find_in_mappings(ctx, key, bundle),
        };

        message.map(|message| apply_args(&message, args))
    }

    /// 按语言栈逐级查询映射，单个语言的查询错误不会中断整个查找
    fn find_in_mappings(&self, ctx: &RequestContext, key: &str, bundle: &str) -> Option<String> {
        let mappings = self.mappings.as_ref()?;
        let mapping_name = self.config.mapping_name(&ctx.site_id);

        if !mappings.has_mapping(&mapping_name) {
            tracing::warn!("站点 {} 没有映射组 {}", ctx.site_id, mapping_name);
            return None;
        }

        for locale in ctx.locale_stack().iter() {
            let mapping_key = MappingKey::new(key, bundle, locale);
            match mappings.get(&mapping_name, &mapping_key) {
                Ok(Some(MappingValue { message: Some(message) })) if !message.is_empty() => {
                    return Some(message);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(
                        "映射查询失败，继续下一个语言 {} (可重试: {}): {}",
                        locale,
                        e.is_retryable(),
                        e
                    );
                }
            }
        }

        None
    }

    fn fallback(
        &self,
        ctx: &RequestContext,
        key: &str,
        bundle: &str,
        args: Option<&[&str]>,
    ) -> Option<String> {
        non_empty_owned(self.base.find(key, bundle, &ctx.locale))
            .map(|message| apply_args(&message, args))
    }
}

fn apply_args(message: &str, args: Option<&[&str]>) -> String {
    match args {
        Some(args) => format_message(message, args),
        None => message.to_string(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn non_empty_owned(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
