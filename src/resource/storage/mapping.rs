//! 内存键值映射存储

use std::path::Path;

use dashmap::DashMap;
use serde::Deserialize;

use crate::resource::error::ResourceResult;
use crate::resource::source::{MappingKey, MappingStore, MappingValue};

/// 导入文件中的一条映射记录
#[derive(Debug, Clone, Deserialize)]
pub struct MappingRecord {
    pub key: String,
    pub bundle: String,
    pub locale: String,
    pub message: Option<String>,
}

/// 以映射组名划分的并发映射表
#[derive(Debug, Default)]
pub struct MemoryMappingStore {
    groups: DashMap<String, DashMap<MappingKey, MappingValue>>,
}

impl MemoryMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, mapping_name: &str, key: MappingKey, value: MappingValue) {
        self.groups
            .entry(mapping_name.to_string())
            .or_default()
            .insert(key, value);
    }

    /// 批量导入记录到指定映射组
    pub fn import(&self, mapping_name: &str, records: Vec<MappingRecord>) -> usize {
        let count = records.len();
        for record in records {
            let key = MappingKey::new(&record.key, &record.bundle, &record.locale);
            self.insert(mapping_name, key, MappingValue { message: record.message });
        }
        count
    }

    /// 从JSON数组文件导入
    pub fn import_json_file(&self, mapping_name: &str, path: &Path) -> ResourceResult<usize> {
        let content = std::fs::read_to_string(path)?;
        let records: Vec<MappingRecord> = serde_json::from_str(&content)?;
        let count = self.import(mapping_name, records);

        tracing::info!("已导入 {} 条映射到 {}: {}", count, mapping_name, path.display());
        Ok(count)
    }

    /// 指定映射组中的条目数
    pub fn len(&self, mapping_name: &str) -> usize {
        match self.groups.get(mapping_name) {
            Some(group) => group.len(),
            None => 0,
        }
    }
}

impl MappingStore for MemoryMappingStore {
    fn get(&self, mapping_name: &str, key: &MappingKey) -> ResourceResult<Option<MappingValue>> {
        let Some(group) = self.groups.get(mapping_name) else {
            return Ok(None);
        };

        let value = group.get(key).map(|value| value.value().clone());
        Ok(value)
    }

    fn has_mapping(&self, mapping_name: &str) -> bool {
        self.groups.contains_key(mapping_name)
    }
}
