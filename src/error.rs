//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// Gateway Vitals 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum VitalsError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 通知客户端不可用
    #[error("通知客户端不可用: {0}")]
    DependencyUnavailable(#[source] NotificationError),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),
}

impl VitalsError {
    /// 映射为调用方约定的状态码
    pub fn status_code(&self) -> u16 {
        match self {
            VitalsError::Config(ConfigError::MissingChannel { .. }) => 404,
            _ => 500,
        }
    }
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 通知渠道未配置
    #[error("Unable to find {key} environment variable")]
    MissingChannel { key: String },

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),
}

/// 单个端点的探测错误，由探测器转换为哨兵状态码或告警，不会越过编排器边界
#[derive(Error, Debug)]
pub enum ProbeError {
    /// HTTP请求错误
    #[error("HTTP请求失败: {0}")]
    Request(#[from] reqwest::Error),

    /// 超时错误
    #[error("请求超时: {url}")]
    Timeout { url: String },

    /// 连接错误
    #[error("连接失败: {url}")]
    Connection { url: String },

    /// 响应体无法解析
    #[error("响应体解析失败: {0}")]
    InvalidBody(String),
}

/// 通知错误类型
#[derive(Error, Debug)]
pub enum NotificationError {
    /// 发送失败
    #[error("通知发送失败: {0}")]
    SendError(String),

    /// 通知服务拒绝了消息
    #[error("通知被拒绝: code={code}, msg={msg}")]
    Rejected { code: i64, msg: String },

    /// 无法创建通知客户端
    #[error("无法创建通知客户端: {0}")]
    ClientUnavailable(String),

    /// 消息编码失败
    #[error("消息编码失败: {0}")]
    Encode(String),
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, VitalsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        let missing = VitalsError::from(ConfigError::MissingChannel {
            key: "ALERT_CHANNEL".to_string(),
        });
        assert_eq!(missing.status_code(), 404);

        let unavailable = VitalsError::DependencyUnavailable(
            NotificationError::ClientUnavailable("tls".to_string()),
        );
        assert_eq!(unavailable.status_code(), 500);

        let invalid = VitalsError::from(ConfigError::ValidationError("x".to_string()));
        assert_eq!(invalid.status_code(), 500);
    }

    #[test]
    fn test_missing_channel_message() {
        let err = ConfigError::MissingChannel {
            key: "ALERT_CHANNEL".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unable to find ALERT_CHANNEL environment variable"
        );
    }
}
