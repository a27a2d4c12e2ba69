//! 端点注册表
//!
//! 从配置来源中按前缀解析出需要探测的端点

use crate::config::source::ConfigSource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// 网关端点的配置键前缀
pub const KEY_PREFIX_GATEWAY: &str = "URL_WS_";

/// 发射器端点的配置键前缀
pub const KEY_PREFIX_EMITTER: &str = "URL_WSE_";

/// 端点类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndpointKind {
    /// 实时消息网关
    Gateway,
    /// 发布/发射器服务
    Emitter,
}

impl EndpointKind {
    /// 该类别对应的配置键前缀
    pub fn key_prefix(&self) -> &'static str {
        match self {
            EndpointKind::Gateway => KEY_PREFIX_GATEWAY,
            EndpointKind::Emitter => KEY_PREFIX_EMITTER,
        }
    }
}

impl std::fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EndpointKind::Gateway => "Gateway",
            EndpointKind::Emitter => "Emitter",
        };
        f.pad(name)
    }
}

/// 待探测的端点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// 端点名称（去掉前缀后的配置键）
    pub name: String,
    /// 端点URL
    pub url: String,
    /// 端点类别
    pub kind: EndpointKind,
}

impl Endpoint {
    /// 创建新的端点
    pub fn new(name: impl Into<String>, url: impl Into<String>, kind: EndpointKind) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            kind,
        }
    }
}

/// 端点注册表
#[derive(Clone)]
pub struct EndpointRegistry {
    /// 配置来源
    source: Arc<dyn ConfigSource>,
}

impl EndpointRegistry {
    /// 创建新的注册表
    pub fn new(source: Arc<dyn ConfigSource>) -> Self {
        Self { source }
    }

    /// 按前缀解析端点
    ///
    /// # 参数
    /// * `prefix` - 配置键前缀（区分大小写）
    /// * `kind` - 解析出的端点类别
    ///
    /// # 返回
    /// * `Vec<Endpoint>` - 按配置来源顺序排列的端点，没有匹配时为空
    pub fn resolve(&self, prefix: &str, kind: EndpointKind) -> Vec<Endpoint> {
        let endpoints: Vec<Endpoint> = self
            .source
            .entries()
            .into_iter()
            .filter_map(|(key, url)| {
                let name = key.strip_prefix(prefix)?;
                if name.is_empty() || url.trim().is_empty() {
                    warn!("忽略无效的端点配置: {}", key);
                    return None;
                }
                Some(Endpoint::new(name, url, kind))
            })
            .collect();

        debug!("前缀 {} 解析出 {} 个端点", prefix, endpoints.len());
        endpoints
    }

    /// 解析某一类别的全部端点
    pub fn resolve_kind(&self, kind: EndpointKind) -> Vec<Endpoint> {
        self.resolve(kind.key_prefix(), kind)
    }

    /// 解析全部网关端点
    pub fn gateways(&self) -> Vec<Endpoint> {
        self.resolve_kind(EndpointKind::Gateway)
    }

    /// 解析全部发射器端点
    pub fn emitters(&self) -> Vec<Endpoint> {
        self.resolve_kind(EndpointKind::Emitter)
    }
}
