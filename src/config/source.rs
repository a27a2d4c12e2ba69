//! 配置来源
//!
//! 以键值对形式提供配置，进程环境变量是默认实现

use std::collections::BTreeMap;

/// 键值配置来源trait
pub trait ConfigSource: Send + Sync {
    /// 返回全部配置项，顺序即端点解析顺序
    fn entries(&self) -> Vec<(String, String)>;

    /// 读取单个配置项
    fn get(&self, key: &str) -> Option<String> {
        self.entries()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

/// 基于进程环境变量的配置来源
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvConfigSource;

impl ConfigSource for EnvConfigSource {
    fn entries(&self) -> Vec<(String, String)> {
        // 跳过非UTF-8的环境变量，按键排序保证每次运行顺序一致
        let mut entries: Vec<(String, String)> = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// 内存中的配置来源（用于测试和基准测试）
#[derive(Debug, Default, Clone)]
pub struct MapConfigSource {
    entries: BTreeMap<String, String>,
}

impl MapConfigSource {
    /// 创建空的配置来源
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加配置项
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapConfigSource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ConfigSource for MapConfigSource {
    fn entries(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}
