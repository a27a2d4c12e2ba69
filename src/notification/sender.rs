//! 通知发送器模块
//!
//! 定义通知发送的trait和基础实现

use crate::error::NotificationError;
use async_trait::async_trait;
use serde_json::json;
use tracing::info;

/// 通知发送器trait
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    /// 向通知渠道发布一条消息
    ///
    /// # 参数
    /// * `channel_id` - 通知渠道标识
    /// * `subject` - 消息标题
    /// * `message` - JSON格式的消息内容
    ///
    /// # 返回
    /// * `Result<(), NotificationError>` - 发送结果
    async fn publish(
        &self,
        channel_id: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), NotificationError>;

    /// 测试连接
    ///
    /// # 参数
    /// * `channel_id` - 通知渠道标识
    ///
    /// # 返回
    /// * `Result<(), NotificationError>` - 测试结果
    async fn test_connection(&self, channel_id: &str) -> Result<(), NotificationError> {
        let message = json!({
            "NewStateValue": "OK",
            "DETAIL": "这是一条测试消息，用于验证通知渠道连接是否正常。",
        });
        self.publish(channel_id, "连接测试", &message.to_string())
            .await
    }
}

/// 空的通知发送器实现（仅记录日志，用于演练模式）
pub struct NoOpSender;

#[async_trait]
impl NotificationPublisher for NoOpSender {
    async fn publish(
        &self,
        channel_id: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), NotificationError> {
        info!("[dry-run] {} <- {}: {}", channel_id, subject, message);
        Ok(())
    }
}
