//! 探测结果数据结构
//!
//! 定义单个端点的探测结果和判定

use crate::config::{Endpoint, EndpointKind};
use crate::notification::{Alert, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 传输失败时记录的状态码
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// 探测结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckOutcome {
    /// 符合端点规则
    Healthy,
    /// 违反端点规则
    Violation,
}

impl CheckOutcome {
    /// 判断是否健康
    pub fn is_healthy(&self) -> bool {
        matches!(self, CheckOutcome::Healthy)
    }
}

impl std::fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckOutcome::Healthy => write!(f, "正常"),
            CheckOutcome::Violation => write!(f, "异常"),
        }
    }
}

/// 单个端点的探测结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// 端点类别
    pub kind: EndpointKind,
    /// 端点名称
    pub name: String,
    /// 端点URL
    pub url: String,
    /// HTTP状态码，传输失败时为0
    pub http_status: u16,
    /// 探测结论
    pub outcome: CheckOutcome,
    /// 告警级别（仅违规时存在）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// 响应时间
    #[serde(rename = "response_time_ms", with = "duration_serde")]
    pub response_time: Duration,
    /// 探测时间戳
    pub checked_at: DateTime<Utc>,
    /// 错误信息（如果有）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    /// 创建新的探测结果，结论由 [`Verdict`] 确定
    pub fn new(endpoint: &Endpoint, http_status: u16) -> Self {
        Self {
            kind: endpoint.kind,
            name: endpoint.name.clone(),
            url: endpoint.url.clone(),
            http_status,
            outcome: CheckOutcome::Healthy,
            severity: None,
            response_time: Duration::from_millis(0),
            checked_at: Utc::now(),
            error: None,
        }
    }

    /// 设置响应时间
    pub fn with_response_time(mut self, response_time: Duration) -> Self {
        self.response_time = response_time;
        self
    }

    /// 设置错误信息
    pub fn with_error(mut self, error: String) -> Self {
        self.error = Some(error);
        self
    }

    /// 获取响应时间（毫秒）
    pub fn response_time_ms(&self) -> u64 {
        self.response_time.as_millis() as u64
    }
}

/// 探测判定：结果与违规时对应的告警
///
/// 只能通过 `healthy` / `violation` 构造，保证违规结果总是带有一条告警。
#[derive(Debug, Clone)]
pub struct Verdict {
    result: CheckResult,
    alert: Option<Alert>,
}

impl Verdict {
    /// 健康判定
    pub fn healthy(mut result: CheckResult) -> Self {
        result.outcome = CheckOutcome::Healthy;
        result.severity = None;
        Self {
            result,
            alert: None,
        }
    }

    /// 违规判定
    pub fn violation(mut result: CheckResult, alert: Alert) -> Self {
        result.outcome = CheckOutcome::Violation;
        result.severity = Some(alert.severity);
        Self {
            result,
            alert: Some(alert),
        }
    }

    pub fn result(&self) -> &CheckResult {
        &self.result
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn into_parts(self) -> (CheckResult, Option<Alert>) {
        (self.result, self.alert)
    }
}

/// Duration序列化模块
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
