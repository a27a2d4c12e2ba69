//! 调用结果封装
//!
//! 将一次运行的结果包装为调用方约定的 `{statusCode, body}` 结构

use crate::core::orchestrator::RunReport;
use crate::error::{Result, VitalsError};
use crate::health::CheckResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 成功运行的响应体
#[derive(Debug, Serialize)]
struct SuccessBody<'a> {
    #[serde(rename = "Status")]
    status: &'static str,
    #[serde(rename = "Log")]
    log: &'a [CheckResult],
}

/// 调用结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    /// 状态码
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// JSON编码的响应体
    pub body: String,
}

impl InvocationResponse {
    /// 成功运行的结果，无论发现多少违规
    pub fn success(report: &RunReport) -> Self {
        let body = SuccessBody {
            status: "Success",
            log: &report.log,
        };
        match serde_json::to_string(&body) {
            Ok(body) => Self {
                status_code: 200,
                body,
            },
            Err(e) => Self::failure(&VitalsError::Json(e)),
        }
    }

    /// 失败运行的结果
    pub fn failure(err: &VitalsError) -> Self {
        let message = match err {
            VitalsError::DependencyUnavailable(e) => {
                format!("Unable to create notification client: {}", e)
            }
            VitalsError::Config(e) => e.to_string(),
            other => other.to_string(),
        };
        Self {
            status_code: err.status_code(),
            body: Value::String(message).to_string(),
        }
    }

    /// 根据运行结果构建
    pub fn from_run(result: &Result<RunReport>) -> Self {
        match result {
            Ok(report) => Self::success(report),
            Err(e) => Self::failure(e),
        }
    }

    /// 是否为成功结果
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Endpoint, EndpointKind};
    use crate::error::{ConfigError, NotificationError};
    use crate::notification::DeliverySummary;
    use chrono::Utc;
    use uuid::Uuid;

    fn report(log: Vec<CheckResult>) -> RunReport {
        RunReport {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            log,
            delivery: DeliverySummary::default(),
        }
    }

    #[test]
    fn test_success_envelope() {
        let endpoint = Endpoint::new("prod", "http://svc/ws", EndpointKind::Gateway);
        let response = InvocationResponse::success(&report(vec![CheckResult::new(&endpoint, 400)]));

        assert_eq!(response.status_code, 200);
        assert!(response.is_success());

        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["Status"], "Success");
        assert_eq!(body["Log"].as_array().unwrap().len(), 1);
        assert_eq!(body["Log"][0]["name"], "prod");
        assert_eq!(body["Log"][0]["http_status"], 400);
    }

    #[test]
    fn test_missing_channel_envelope() {
        let err = VitalsError::from(ConfigError::MissingChannel {
            key: "ALERT_CHANNEL".to_string(),
        });
        let response = InvocationResponse::from_run(&Err(err));

        assert_eq!(response.status_code, 404);
        assert_eq!(
            response.body,
            "\"Unable to find ALERT_CHANNEL environment variable\""
        );
    }

    #[test]
    fn test_client_unavailable_envelope() {
        let err = VitalsError::DependencyUnavailable(NotificationError::ClientUnavailable(
            "tls".to_string(),
        ));
        let response = InvocationResponse::failure(&err);

        assert_eq!(response.status_code, 500);
        let body: String = serde_json::from_str(&response.body).unwrap();
        assert!(body.starts_with("Unable to create notification client"));
    }

    #[test]
    fn test_envelope_field_names() {
        let response = InvocationResponse::success(&report(vec![]));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["body"], r#"{"Status":"Success","Log":[]}"#);
    }
}
