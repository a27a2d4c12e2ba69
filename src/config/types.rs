//! 配置数据结构定义
//!
//! 定义探测运行参数和验证逻辑

use crate::error::ConfigError;
use std::time::Duration;

/// 通知渠道标识的配置键
pub const KEY_ALERT_CHANNEL: &str = "ALERT_CHANNEL";

/// 探测运行参数
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSettings {
    /// 单次探测请求超时时间
    pub request_timeout: Duration,
    /// 单次通知发送超时时间
    pub publish_timeout: Duration,
    /// 请求使用的User-Agent
    pub user_agent: String,
    /// 通知签名密钥
    pub channel_secret: Option<String>,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(default_timeout()),
            publish_timeout: Duration::from_secs(default_publish_timeout()),
            user_agent: format!("{}/{}", crate::APP_NAME, crate::VERSION),
            channel_secret: None,
        }
    }
}

// 默认值函数
pub(crate) fn default_timeout() -> u64 {
    10
}
fn default_publish_timeout() -> u64 {
    30
}

impl ProbeSettings {
    /// 设置探测超时时间
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// 设置签名密钥，空字符串视为未设置
    pub fn with_channel_secret(mut self, secret: Option<String>) -> Self {
        self.channel_secret = secret.filter(|s| !s.trim().is_empty());
        self
    }

    /// 验证运行参数
    ///
    /// # 返回
    /// * `Result<(), ConfigError>` - 验证结果
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "请求超时时间不能为0".to_string(),
            ));
        }

        if self.publish_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "通知超时时间不能为0".to_string(),
            ));
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "User-Agent不能为空".to_string(),
            ));
        }

        Ok(())
    }
}
