// 集成测试公共模块
//
// 提供带调用计数的测试替身和解析器构建助手

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use storefront_resource::resource::error::helpers;
use storefront_resource::resource::{
    BaseLookup, LocaleStack, LruCacheStore, MappingKey, MappingStore, MappingValue,
    MessageResolver, MessageSource, RequestContext, ResourceConfig, ResourceResult,
};

pub const SITE: &str = "RefArch";
pub const MAPPING_NAME: &str = "c_resource_bundles_RefArch";

/// 按语言栈查找的基础查找替身，记录调用次数
#[derive(Default)]
pub struct CountingLookup {
    messages: HashMap<(String, String, String), String>,
    calls: AtomicUsize,
}

impl CountingLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, bundle: &str, locale: &str, key: &str, message: &str) -> Self {
        self.messages.insert(
            (bundle.to_string(), locale.to_string(), key.to_string()),
            message.to_string(),
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BaseLookup for CountingLookup {
    fn find(&self, key: &str, bundle: &str, locale: &str) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        LocaleStack::for_locale(locale).iter().find_map(|candidate| {
            self.messages
                .get(&(bundle.to_string(), candidate.to_string(), key.to_string()))
                .cloned()
        })
    }
}

/// 可指定失败语言的映射存储替身，记录查询过的语言顺序
#[derive(Default)]
pub struct ScriptedMappingStore {
    values: HashMap<MappingKey, MappingValue>,
    failing_locales: HashSet<String>,
    probes: Mutex<Vec<String>>,
}

impl ScriptedMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, bundle: &str, locale: &str, message: &str) -> Self {
        self.values
            .insert(MappingKey::new(key, bundle, locale), MappingValue::new(message));
        self
    }

    pub fn failing_for(mut self, locale: &str) -> Self {
        self.failing_locales.insert(locale.to_string());
        self
    }

    pub fn probes(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }

    pub fn probe_count(&self) -> usize {
        self.probes.lock().unwrap().len()
    }
}

impl MappingStore for ScriptedMappingStore {
    fn get(&self, mapping_name: &str, key: &MappingKey) -> ResourceResult<Option<MappingValue>> {
        self.probes.lock().unwrap().push(key.locale.clone());

        if self.failing_locales.contains(&key.locale) {
            return Err(helpers::mapping_error(format!("mapping backend down for {}", key.locale)));
        }

        if mapping_name != MAPPING_NAME {
            return Ok(None);
        }

        Ok(self.values.get(key).cloned())
    }
}

/// 测试用解析器及其替身
pub struct TestEnvironment {
    pub resolver: MessageResolver,
    pub base: Arc<CountingLookup>,
    pub mappings: Arc<ScriptedMappingStore>,
    pub cache: Arc<LruCacheStore>,
}

impl TestEnvironment {
    pub fn new(source: MessageSource, base: CountingLookup, mappings: ScriptedMappingStore) -> Self {
        let base = Arc::new(base);
        let mappings = Arc::new(mappings);
        let cache = Arc::new(LruCacheStore::with_capacity("CustomResources", 100));

        let config = ResourceConfig {
            message_source: source,
            site_id: SITE.to_string(),
            ..ResourceConfig::default()
        };

        let resolver = MessageResolver::builder(config)
            .base_lookup(base.clone())
            .mapping_store(mappings.clone())
            .cache_store(cache.clone())
            .build()
            .expect("test resolver should build");

        Self {
            resolver,
            base,
            mappings,
            cache,
        }
    }

    /// 源调用总数：基础查找加映射查询
    pub fn source_calls(&self) -> usize {
        self.base.calls() + self.mappings.probe_count()
    }
}

pub fn ctx(locale: &str) -> RequestContext {
    RequestContext::new(SITE, locale)
}
