//! 发射器探测器
//!
//! 向发射器发布一条固定的测试消息，根据状态码和响应体中的 `status` 判定

use crate::config::{Endpoint, EndpointKind};
use crate::error::ProbeError;
use crate::health::checker::EndpointChecker;
use crate::health::result::{CheckResult, Verdict, TRANSPORT_FAILURE_STATUS};
use crate::health::transport::{describe_probe_error, HttpReply, HttpTransport};
use crate::notification::Alert;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 测试消息发布到的频道
pub const EMITTER_CHANNEL: &str = "app.deployed";
/// 测试消息内容
pub const EMITTER_MESSAGE: &str = "now";
/// 发射器正常时返回的状态码
pub const EXPECTED_EMITTER_STATUS: u16 = 200;
/// 消息发布成功时响应中的状态
pub const PUBLISHED_STATUS: &str = "published";

/// 发射器测试消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmitterPayload {
    pub environment: String,
    pub channel: String,
    pub message: String,
}

impl EmitterPayload {
    /// 为端点构建测试消息
    pub fn for_endpoint(endpoint: &Endpoint) -> Self {
        Self {
            environment: endpoint.name.clone(),
            channel: EMITTER_CHANNEL.to_string(),
            message: EMITTER_MESSAGE.to_string(),
        }
    }

    /// 转换为JSON值
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "environment": self.environment,
            "channel": self.channel,
            "message": self.message,
        })
    }
}

/// 发射器探测器
pub struct EmitterChecker {
    /// HTTP传输
    transport: Arc<dyn HttpTransport>,
}

impl EmitterChecker {
    /// 创建新的发射器探测器
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// 提取响应中上报的状态，非字符串视为缺失
    fn reported_status(response: &Value) -> Option<&str> {
        response.get("status").and_then(Value::as_str)
    }

    /// 根据响应给出判定
    ///
    /// # 参数
    /// * `endpoint` - 发射器端点
    /// * `payload` - 发出的请求体
    /// * `reply` - 收到的响应
    /// * `response_time` - 响应时间
    ///
    /// # 返回
    /// * `Verdict` - 判定结果
    pub fn evaluate(
        endpoint: &Endpoint,
        payload: &Value,
        reply: &HttpReply,
        response_time: Duration,
    ) -> Verdict {
        let mut result = CheckResult::new(endpoint, reply.status).with_response_time(response_time);

        if reply.status != EXPECTED_EMITTER_STATUS {
            return Verdict::violation(result, Alert::emitter_down(endpoint, reply.status));
        }

        // 响应体不可用时按未发布处理
        let response = match reply.json() {
            Ok(value) => value,
            Err(e) => {
                result = result.with_error(describe_probe_error(&e));
                Value::String(reply.body.clone())
            }
        };

        match Self::reported_status(&response) {
            Some(PUBLISHED_STATUS) => Verdict::healthy(result),
            other => {
                let alert = Alert::emitter_issue(endpoint, payload, &response, other);
                Verdict::violation(result, alert)
            }
        }
    }

    /// 没有收到响应时的判定
    pub fn unreachable(endpoint: &Endpoint, error: &ProbeError, response_time: Duration) -> Verdict {
        let result = CheckResult::new(endpoint, TRANSPORT_FAILURE_STATUS)
            .with_response_time(response_time)
            .with_error(describe_probe_error(error));
        Verdict::violation(result, Alert::emitter_down(endpoint, TRANSPORT_FAILURE_STATUS))
    }
}

#[async_trait]
impl EndpointChecker for EmitterChecker {
    fn kind(&self) -> EndpointKind {
        EndpointKind::Emitter
    }

    async fn check(&self, endpoint: &Endpoint) -> Verdict {
        let payload = EmitterPayload::for_endpoint(endpoint).to_value();

        let start_time = Instant::now();
        let reply = self.transport.post_json(&endpoint.url, &payload).await;
        let response_time = start_time.elapsed();

        match reply {
            Ok(reply) => Self::evaluate(endpoint, &payload, &reply, response_time),
            Err(e) => Self::unreachable(endpoint, &e, response_time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::result::CheckOutcome;
    use crate::notification::alert::{FIELD_PAYLOAD, FIELD_RESPONSE};
    use crate::notification::Severity;
    use serde_json::json;
    use std::sync::Mutex;

    /// 记录请求体并返回固定响应的传输
    struct ScriptedTransport {
        reply: Option<HttpReply>,
        seen: Mutex<Vec<(String, Value)>>,
    }

    impl ScriptedTransport {
        fn new(reply: Option<HttpReply>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn get(&self, _url: &str) -> Result<HttpReply, ProbeError> {
            unreachable!("emitter probes never GET")
        }

        async fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply, ProbeError> {
            self.seen
                .lock()
                .unwrap()
                .push((url.to_string(), body.clone()));
            self.reply.clone().ok_or_else(|| ProbeError::Timeout {
                url: url.to_string(),
            })
        }
    }

    fn endpoint() -> Endpoint {
        Endpoint::new("staging", "http://svc/emit", EndpointKind::Emitter)
    }

    async fn check_with(reply: Option<HttpReply>) -> (Verdict, Arc<ScriptedTransport>) {
        let transport = ScriptedTransport::new(reply);
        let checker = EmitterChecker::new(transport.clone());
        (checker.check(&endpoint()).await, transport)
    }

    #[tokio::test]
    async fn test_posts_fixed_payload() {
        let (_, transport) =
            check_with(Some(HttpReply::new(200, r#"{"status":"published"}"#))).await;

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "http://svc/emit");
        assert_eq!(
            seen[0].1,
            json!({"environment": "staging", "channel": "app.deployed", "message": "now"})
        );
    }

    #[tokio::test]
    async fn test_published_is_healthy() {
        let (verdict, _) =
            check_with(Some(HttpReply::new(200, r#"{"status":"published"}"#))).await;

        assert_eq!(verdict.result().outcome, CheckOutcome::Healthy);
        assert!(verdict.alert().is_none());
    }

    #[tokio::test]
    async fn test_queued_is_warning() {
        let (verdict, _) = check_with(Some(HttpReply::new(200, r#"{"status":"queued"}"#))).await;

        assert_eq!(verdict.result().outcome, CheckOutcome::Violation);
        let alert = verdict.alert().unwrap();
        assert_eq!(alert.severity, Severity::Warning);
        assert!(alert.subject.contains("staging"));
        assert!(alert.subject.contains("queued"));
        assert_eq!(
            alert.fields.get(FIELD_PAYLOAD),
            Some(&json!({"environment": "staging", "channel": "app.deployed", "message": "now"}))
        );
        assert_eq!(
            alert.fields.get(FIELD_RESPONSE),
            Some(&json!({"status": "queued"}))
        );
    }

    #[tokio::test]
    async fn test_non_200_is_error() {
        let (verdict, _) = check_with(Some(HttpReply::new(502, "bad gateway"))).await;

        let alert = verdict.alert().unwrap();
        assert_eq!(alert.severity, Severity::Error);
        assert!(alert.subject.starts_with("Emitter Down: staging"));
        assert!(alert.subject.contains("502"));
        assert_eq!(verdict.result().http_status, 502);
    }

    #[tokio::test]
    async fn test_transport_failure_is_error() {
        let (verdict, _) = check_with(None).await;

        assert_eq!(verdict.result().http_status, TRANSPORT_FAILURE_STATUS);
        assert_eq!(verdict.result().error.as_deref(), Some("Request timeout"));
        assert_eq!(verdict.alert().unwrap().severity, Severity::Error);
    }

    #[test]
    fn test_invalid_json_is_warning() {
        let payload = EmitterPayload::for_endpoint(&endpoint()).to_value();
        let verdict = EmitterChecker::evaluate(
            &endpoint(),
            &payload,
            &HttpReply::new(200, "<html>ok</html>"),
            Duration::ZERO,
        );

        let alert = verdict.alert().unwrap();
        assert_eq!(alert.severity, Severity::Warning);
        assert!(alert.subject.ends_with("<missing>"));
        assert_eq!(
            alert.fields.get(FIELD_RESPONSE),
            Some(&Value::String("<html>ok</html>".to_string()))
        );
        assert!(verdict
            .result()
            .error
            .as_deref()
            .unwrap()
            .starts_with("Response decode error"));
    }

    #[test]
    fn test_missing_or_non_string_status_is_warning() {
        let payload = EmitterPayload::for_endpoint(&endpoint()).to_value();
        for body in [r#"{}"#, r#"{"status":1}"#, r#"[]"#, r#"{"status":"Published"}"#] {
            let verdict = EmitterChecker::evaluate(
                &endpoint(),
                &payload,
                &HttpReply::new(200, body),
                Duration::ZERO,
            );
            assert_eq!(
                verdict.alert().map(|a| a.severity),
                Some(Severity::Warning),
                "body {body}"
            );
        }
    }

    #[tokio::test]
    async fn test_unreadable_200_body_is_warning() {
        let (verdict, _) =
            check_with(Some(HttpReply::unreadable(200, "connection closed"))).await;

        assert_eq!(verdict.result().http_status, 200);
        assert_eq!(verdict.result().outcome, CheckOutcome::Violation);
        assert_eq!(
            verdict.result().error.as_deref(),
            Some("Response decode error: connection closed")
        );
        let alert = verdict.alert().unwrap();
        assert_eq!(alert.severity, Severity::Warning);
        assert!(alert.subject.starts_with("Emitter Issue: staging"));
        assert!(alert.subject.ends_with("<missing>"));
    }

    #[tokio::test]
    async fn test_unreadable_non_200_body_is_error_with_status() {
        let (verdict, _) = check_with(Some(HttpReply::unreadable(503, "connection closed"))).await;

        assert_eq!(verdict.result().http_status, 503);
        let alert = verdict.alert().unwrap();
        assert_eq!(alert.severity, Severity::Error);
        assert!(alert.subject.ends_with("503"));
    }
}
