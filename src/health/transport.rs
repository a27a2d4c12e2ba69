//! HTTP传输层
//!
//! 探测器只关心状态码和响应体，具体HTTP客户端通过 [`HttpTransport`] 注入

use crate::config::ProbeSettings;
use crate::error::ProbeError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

/// HTTP响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP状态码
    pub status: u16,
    /// 响应体文本
    pub body: String,
    /// 响应体读取失败的原因，此时 `body` 为空
    pub body_error: Option<String>,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            body_error: None,
        }
    }

    /// 只有状态码的响应
    pub fn status_only(status: u16) -> Self {
        Self::new(status, "")
    }

    /// 已收到状态码，但响应体没能完整读取
    pub fn unreadable(status: u16, error: impl Into<String>) -> Self {
        Self {
            status,
            body: String::new(),
            body_error: Some(error.into()),
        }
    }

    /// 将响应体解析为JSON
    pub fn json(&self) -> Result<Value, ProbeError> {
        if let Some(error) = &self.body_error {
            return Err(ProbeError::InvalidBody(error.clone()));
        }
        serde_json::from_str(&self.body).map_err(|e| ProbeError::InvalidBody(e.to_string()))
    }
}

/// HTTP传输trait
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// 发送不带请求体的GET请求，只返回状态码
    async fn get(&self, url: &str) -> Result<HttpReply, ProbeError>;

    /// 发送JSON请求体的POST请求
    ///
    /// 收到状态码后响应体读取失败不算传输错误，失败原因记录在 `body_error`
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply, ProbeError>;
}

/// 基于reqwest的HTTP传输实现
pub struct ReqwestTransport {
    /// HTTP客户端
    client: Client,
    /// 单次请求超时时间
    timeout: Duration,
}

impl ReqwestTransport {
    /// 创建新的HTTP传输
    ///
    /// # 参数
    /// * `settings` - 运行参数
    ///
    /// # 返回
    /// * `Result<Self, ProbeError>` - 传输实例
    pub fn new(settings: &ProbeSettings) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            timeout: settings.request_timeout,
        })
    }

    /// 发送请求并等待响应头
    async fn send(
        &self,
        url: &str,
        request: RequestBuilder,
        deadline: Instant,
    ) -> Result<Response, ProbeError> {
        match timeout_at(deadline, request.send()).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) if e.is_timeout() => Err(ProbeError::Timeout {
                url: url.to_string(),
            }),
            Ok(Err(e)) if e.is_connect() => Err(ProbeError::Connection {
                url: url.to_string(),
            }),
            Ok(Err(e)) => Err(ProbeError::Request(e)),
            Err(_) => Err(ProbeError::Timeout {
                url: url.to_string(),
            }),
        }
    }

    /// 读取响应体，失败时保留已收到的状态码
    async fn read_body(response: Response, deadline: Instant) -> HttpReply {
        let status = response.status().as_u16();
        match timeout_at(deadline, response.text()).await {
            Ok(Ok(body)) => HttpReply::new(status, body),
            Ok(Err(e)) => HttpReply::unreadable(status, e.to_string()),
            Err(_) => HttpReply::unreadable(status, "response body timed out"),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpReply, ProbeError> {
        let deadline = Instant::now() + self.timeout;
        let response = self.send(url, self.client.get(url), deadline).await?;
        Ok(HttpReply::status_only(response.status().as_u16()))
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply, ProbeError> {
        let deadline = Instant::now() + self.timeout;
        let response = self
            .send(url, self.client.post(url).json(body), deadline)
            .await?;
        Ok(Self::read_body(response, deadline).await)
    }
}

/// 格式化探测错误信息，使其更加清晰易读
pub fn describe_probe_error(error: &ProbeError) -> String {
    match error {
        ProbeError::Timeout { .. } => "Request timeout".to_string(),
        ProbeError::Connection { .. } => "Connection refused".to_string(),
        ProbeError::InvalidBody(e) => format!("Response decode error: {}", e),
        ProbeError::Request(e) => {
            if e.is_request() || e.is_builder() {
                "Invalid request".to_string()
            } else if e.is_decode() || e.is_body() {
                "Response decode error".to_string()
            } else {
                let error_str = e.to_string();
                if error_str.contains("dns") || error_str.contains("DNS") {
                    "DNS resolution failed".to_string()
                } else if error_str.contains("certificate")
                    || error_str.contains("tls")
                    || error_str.contains("ssl")
                {
                    "SSL/TLS certificate error".to_string()
                } else {
                    format!("Request failed: {}", error_str)
                }
            }
        }
    }
}
