//! 飞书通知发送器模块
//!
//! 实现飞书自定义机器人webhook通知，通知渠道标识即webhook URL

use crate::config::ProbeSettings;
use crate::error::NotificationError;
use crate::notification::sender::NotificationPublisher;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde_json::{json, Value};
use sha2::Sha256;
use tracing::{debug, error, info};

type HmacSha256 = Hmac<Sha256>;

/// 飞书通知发送器
pub struct FeishuPublisher {
    /// HTTP客户端
    client: Client,
    /// 签名密钥
    secret: Option<String>,
}

impl FeishuPublisher {
    /// 创建新的飞书发送器
    ///
    /// # 参数
    /// * `settings` - 运行参数，提供超时时间和签名密钥
    ///
    /// # 返回
    /// * `Result<Self, NotificationError>` - 发送器实例
    pub fn new(settings: &ProbeSettings) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(settings.publish_timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| NotificationError::ClientUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            secret: settings.channel_secret.clone(),
        })
    }

    /// 计算飞书签名
    ///
    /// 以 `timestamp + "\n" + secret` 为密钥对空消息做HmacSHA256，再做base64编码
    pub fn sign(timestamp: i64, secret: &str) -> Result<String, NotificationError> {
        let string_to_sign = format!("{}\n{}", timestamp, secret);
        let mac = HmacSha256::new_from_slice(string_to_sign.as_bytes())
            .map_err(|e| NotificationError::Encode(e.to_string()))?;
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    /// 构建飞书消息体
    fn build_message_body(&self, subject: &str, message: &str) -> Result<Value, NotificationError> {
        let parsed = serde_json::from_str::<Value>(message).ok();

        let color = match parsed
            .as_ref()
            .and_then(|v| v.get("NewStateValue"))
            .and_then(Value::as_str)
        {
            Some("ALARM") => "red",
            Some("WARNING") => "orange",
            _ => "blue",
        };

        let content = match parsed {
            Some(Value::Object(fields)) => fields
                .iter()
                .map(|(key, value)| match value {
                    Value::String(s) => format!("**{}**: {}", key, s),
                    other => format!("**{}**: {}", key, other),
                })
                .collect::<Vec<_>>()
                .join("\n"),
            _ => message.to_string(),
        };

        let mut body = json!({
            "msg_type": "interactive",
            "card": {
                "elements": [
                    {
                        "tag": "div",
                        "text": {
                            "content": content,
                            "tag": "lark_md"
                        }
                    }
                ],
                "header": {
                    "title": {
                        "content": subject,
                        "tag": "plain_text"
                    },
                    "template": color
                }
            }
        });

        if let Some(secret) = &self.secret {
            let timestamp = chrono::Utc::now().timestamp();
            body["timestamp"] = Value::String(timestamp.to_string());
            body["sign"] = Value::String(Self::sign(timestamp, secret)?);
        }

        Ok(body)
    }

    /// 发送消息到飞书
    async fn send_to_webhook(&self, webhook_url: &str, body: &Value) -> Result<(), NotificationError> {
        debug!("发送消息到飞书webhook: {}", webhook_url);

        let response = self
            .client
            .post(webhook_url)
            .json(body)
            .send()
            .await
            .map_err(|e| NotificationError::SendError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("飞书消息发送失败: {} - {}", status, text);
            return Err(NotificationError::SendError(format!(
                "HTTP {}",
                status.as_u16()
            )));
        }

        // 飞书以业务码表示失败，HTTP状态仍为200
        let reply: Value = response.json().await.unwrap_or(Value::Null);
        let code = reply
            .get("code")
            .or_else(|| reply.get("StatusCode"))
            .and_then(Value::as_i64)
            .unwrap_or(0);

        if code != 0 {
            let msg = reply
                .get("msg")
                .or_else(|| reply.get("StatusMessage"))
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string();
            error!("飞书拒绝了消息: code={} msg={}", code, msg);
            return Err(NotificationError::Rejected { code, msg });
        }

        info!("飞书消息发送成功");
        Ok(())
    }
}

#[async_trait]
impl NotificationPublisher for FeishuPublisher {
    async fn publish(
        &self,
        channel_id: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), NotificationError> {
        let body = self.build_message_body(subject, message)?;
        self.send_to_webhook(channel_id, &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publisher(secret: Option<&str>) -> FeishuPublisher {
        let settings =
            ProbeSettings::default().with_channel_secret(secret.map(|s| s.to_string()));
        FeishuPublisher::new(&settings).unwrap()
    }

    #[test]
    fn test_sign_is_deterministic() {
        let a = FeishuPublisher::sign(1_700_000_000, "secret").unwrap();
        let b = FeishuPublisher::sign(1_700_000_000, "secret").unwrap();
        let c = FeishuPublisher::sign(1_700_000_001, "secret").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        // HmacSHA256输出32字节，base64后为44个字符
        assert_eq!(a.len(), 44);
    }

    #[test]
    fn test_message_body_colors_and_fields() {
        let p = publisher(None);
        let body = p
            .build_message_body(
                "Gateway Down: prod failed with http status code 200",
                r#"{"NewStateValue":"ALARM","URL":"http://svc/ws","HTTP_STATUS_CODE":200}"#,
            )
            .unwrap();

        assert_eq!(body["msg_type"], "interactive");
        assert_eq!(body["card"]["header"]["template"], "red");
        assert_eq!(
            body["card"]["header"]["title"]["content"],
            "Gateway Down: prod failed with http status code 200"
        );
        let content = body["card"]["elements"][0]["text"]["content"]
            .as_str()
            .unwrap();
        assert!(content.contains("**URL**: http://svc/ws"));
        assert!(content.contains("**HTTP_STATUS_CODE**: 200"));
        assert!(body.get("sign").is_none());
    }

    #[test]
    fn test_message_body_signed_when_secret_set() {
        let p = publisher(Some("secret"));
        let body = p
            .build_message_body("s", r#"{"NewStateValue":"WARNING"}"#)
            .unwrap();

        assert_eq!(body["card"]["header"]["template"], "orange");
        assert!(body["timestamp"].is_string());
        assert!(body["sign"].is_string());
    }

    #[tokio::test]
    async fn test_publish_to_webhook() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(r#"{"code":0,"msg":"success"}"#)
            .create_async()
            .await;

        let p = publisher(None);
        let url = format!("{}/hook", server.url());
        let result = p.publish(&url, "subject", r#"{"NewStateValue":"ALARM"}"#).await;

        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_publish_rejected_by_business_code() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/hook")
            .with_status(200)
            .with_body(r#"{"code":19021,"msg":"sign match fail"}"#)
            .create_async()
            .await;

        let p = publisher(Some("wrong"));
        let url = format!("{}/hook", server.url());
        let err = p.publish(&url, "subject", "{}").await.unwrap_err();

        match err {
            NotificationError::Rejected { code, msg } => {
                assert_eq!(code, 19021);
                assert_eq!(msg, "sign match fail");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_publish_http_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/hook")
            .with_status(500)
            .create_async()
            .await;

        let p = publisher(None);
        let url = format!("{}/hook", server.url());
        let err = p.publish(&url, "subject", "{}").await.unwrap_err();
        assert!(matches!(err, NotificationError::SendError(_)));
    }
}
