//! 告警模型与告警出口
//!
//! 告警由各违规类型的构造函数生成，经由 [`AlertSink`] 投递到单一通知渠道

use crate::config::Endpoint;
use crate::error::NotificationError;
use crate::notification::sender::NotificationPublisher;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// 告警状态字段
pub const FIELD_STATE: &str = "NewStateValue";
/// 端点URL字段
pub const FIELD_URL: &str = "URL";
/// HTTP状态码字段
pub const FIELD_HTTP_STATUS_CODE: &str = "HTTP_STATUS_CODE";
/// 发出的请求体字段
pub const FIELD_PAYLOAD: &str = "PAYLOAD";
/// 收到的响应体字段
pub const FIELD_RESPONSE: &str = "RESPONSE";

/// 告警级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// 服务不可用
    Error,
    /// 服务可达但行为异常
    Warning,
}

impl Severity {
    /// 消息中的状态值
    pub fn state_value(&self) -> &'static str {
        match self {
            Severity::Error => "ALARM",
            Severity::Warning => "WARNING",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.state_value())
    }
}

/// 告警
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// 告警级别
    pub severity: Severity,
    /// 告警标题
    pub subject: String,
    /// 告警字段
    pub fields: Map<String, Value>,
}

impl Alert {
    fn new(severity: Severity, subject: String) -> Self {
        Self {
            severity,
            subject,
            fields: Map::new(),
        }
    }

    fn with_field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    /// 网关未返回预期状态码
    pub fn gateway_down(endpoint: &Endpoint, http_status: u16) -> Self {
        Self::new(
            Severity::Error,
            format!(
                "Gateway Down: {} failed with http status code {}",
                endpoint.name, http_status
            ),
        )
        .with_field(FIELD_URL, Value::String(endpoint.url.clone()))
        .with_field(FIELD_HTTP_STATUS_CODE, Value::from(http_status))
    }

    /// 发射器返回非200状态码
    pub fn emitter_down(endpoint: &Endpoint, http_status: u16) -> Self {
        Self::new(
            Severity::Error,
            format!(
                "Emitter Down: {} returned a non-200 http status code: {}",
                endpoint.name, http_status
            ),
        )
        .with_field(FIELD_URL, Value::String(endpoint.url.clone()))
        .with_field(FIELD_HTTP_STATUS_CODE, Value::from(http_status))
    }

    /// 发射器返回200但消息未被发布
    ///
    /// # 参数
    /// * `endpoint` - 发射器端点
    /// * `payload` - 发出的请求体
    /// * `response` - 完整响应体（无法解析时为原始文本）
    /// * `reported_status` - 响应中的 `status` 字段
    pub fn emitter_issue(
        endpoint: &Endpoint,
        payload: &Value,
        response: &Value,
        reported_status: Option<&str>,
    ) -> Self {
        Self::new(
            Severity::Warning,
            format!(
                "Emitter Issue: {} returned a non \"published\" status: {}",
                endpoint.name,
                reported_status.unwrap_or("<missing>")
            ),
        )
        .with_field(FIELD_URL, Value::String(endpoint.url.clone()))
        .with_field(FIELD_PAYLOAD, payload.clone())
        .with_field(FIELD_RESPONSE, response.clone())
    }

    /// 合并级别标记后的消息体
    pub fn message(&self) -> Value {
        let mut message = Map::new();
        message.insert(
            FIELD_STATE.to_string(),
            Value::String(self.severity.state_value().to_string()),
        );
        for (key, value) in &self.fields {
            message.insert(key.clone(), value.clone());
        }
        Value::Object(message)
    }

    /// 渲染为JSON消息文本
    pub fn render_message(&self) -> Result<String, NotificationError> {
        serde_json::to_string(&self.message()).map_err(|e| NotificationError::Encode(e.to_string()))
    }
}

/// 告警投递统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverySummary {
    /// 已派发数量
    pub dispatched: usize,
    /// 投递成功数量
    pub delivered: usize,
    /// 投递失败数量
    pub failed: usize,
}

/// 告警出口
///
/// 每条告警在后台任务中投递，探测流程不等待投递结果；
/// [`AlertSink::flush`] 在运行结束前收集全部投递结果。
pub struct AlertSink {
    /// 通知发送器
    publisher: Arc<dyn NotificationPublisher>,
    /// 通知渠道标识
    channel_id: String,
    /// 尚未完成的投递
    pending: JoinSet<(String, Result<(), NotificationError>)>,
    /// 投递统计
    summary: DeliverySummary,
}

impl AlertSink {
    /// 创建新的告警出口
    pub fn new(publisher: Arc<dyn NotificationPublisher>, channel_id: impl Into<String>) -> Self {
        Self {
            publisher,
            channel_id: channel_id.into(),
            pending: JoinSet::new(),
            summary: DeliverySummary::default(),
        }
    }

    /// 派发一条告警
    ///
    /// 仅在消息编码失败时返回错误，投递失败在 `flush` 中统计。
    pub fn publish(&mut self, alert: &Alert) -> Result<(), NotificationError> {
        let message = match alert.render_message() {
            Ok(message) => message,
            Err(e) => {
                warn!("告警编码失败，跳过投递: {} - {}", alert.subject, e);
                self.summary.failed += 1;
                return Err(e);
            }
        };

        info!(severity = %alert.severity, "派发告警: {}", alert.subject);

        let publisher = Arc::clone(&self.publisher);
        let channel_id = self.channel_id.clone();
        let subject = alert.subject.clone();
        self.pending.spawn(async move {
            let result = publisher.publish(&channel_id, &subject, &message).await;
            (subject, result)
        });
        self.summary.dispatched += 1;

        Ok(())
    }

    /// 等待全部投递完成并返回统计
    pub async fn flush(&mut self) -> DeliverySummary {
        while let Some(joined) = self.pending.join_next().await {
            match joined {
                Ok((subject, Ok(()))) => {
                    debug!("告警投递成功: {}", subject);
                    self.summary.delivered += 1;
                }
                Ok((subject, Err(e))) => {
                    warn!("告警投递失败: {} - {}", subject, e);
                    self.summary.failed += 1;
                }
                Err(e) => {
                    warn!("告警投递任务异常: {}", e);
                    self.summary.failed += 1;
                }
            }
        }
        self.summary
    }
}
