//! 消息来源
//!
//! 定义解析器依赖的外部能力：平台基础查找 [`BaseLookup`] 与键值映射存储 [`MappingStore`]，
//! 以及选择主查找策略的 [`MessageSource`]。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{ResourceError, ResourceResult};
use super::format::format_message;

/// 主查找策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageSource {
    /// 只使用平台基础查找，不启用缓存
    System,
    /// 按语言栈查询键值映射
    KeyValueMap,
    /// 先查 `co_` 前缀的覆盖资源包，再查原资源包
    #[default]
    DynamicFolder,
}

impl MessageSource {
    /// 只有 KeyValueMap 与 DynamicFolder 会读写缓存
    pub fn caching_enabled(&self) -> bool {
        matches!(self, MessageSource::KeyValueMap | MessageSource::DynamicFolder)
    }
}

impl fmt::Display for MessageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageSource::System => "system",
            MessageSource::KeyValueMap => "key-value-map",
            MessageSource::DynamicFolder => "dynamic-folder",
        };
        f.write_str(name)
    }
}

impl FromStr for MessageSource {
    type Err = ResourceError;

    fn from_str(value: &str) -> ResourceResult<Self> {
        match value.trim().to_lowercase().replace('_', "-").as_str() {
            "system" => Ok(MessageSource::System),
            "key-value-map" | "keyvaluemap" | "kvm" => Ok(MessageSource::KeyValueMap),
            "dynamic-folder" | "dynamicfolder" => Ok(MessageSource::DynamicFolder),
            other => Err(ResourceError::InvalidInput(format!(
                "未知的消息来源 '{}'，可选: system, key-value-map, dynamic-folder",
                other
            ))),
        }
    }
}

/// 平台提供的基础查找能力
pub trait BaseLookup: Send + Sync {
    /// 查找原始消息模板，找不到时返回 `None`
    fn find(&self, key: &str, bundle: &str, locale: &str) -> Option<String>;

    /// 查找消息，找不到或为空时返回默认消息
    fn msg(&self, key: &str, bundle: &str, locale: &str, default: &str) -> String {
        self.find(key, bundle, locale)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// 带位置参数的查找，默认消息同样会被格式化
    fn msgf(&self, key: &str, bundle: &str, locale: &str, default: &str, args: &[&str]) -> String {
        format_message(&self.msg(key, bundle, locale, default), args)
    }
}

/// 映射查询键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappingKey {
    pub key: String,
    pub bundle: String,
    pub locale: String,
}

impl MappingKey {
    pub fn new(key: &str, bundle: &str, locale: &str) -> Self {
        Self {
            key: key.to_string(),
            bundle: bundle.to_string(),
            locale: locale.to_string(),
        }
    }
}

/// 映射查询结果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MappingValue {
    pub message: Option<String>,
}

impl MappingValue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

/// 键值映射存储
///
/// 查询可能失败，调用方需要容忍错误。
pub trait MappingStore: Send + Sync {
    fn get(&self, mapping_name: &str, key: &MappingKey) -> ResourceResult<Option<MappingValue>>;

    /// 映射组是否存在，无法判断的实现返回 `true`
    fn has_mapping(&self, _mapping_name: &str) -> bool {
        true
    }
}
