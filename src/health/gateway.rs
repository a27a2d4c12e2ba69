//! 网关存活探测器
//!
//! 网关拒绝未认证的裸GET请求时返回400，只有恰好400才视为存活

use crate::config::{Endpoint, EndpointKind};
use crate::health::checker::EndpointChecker;
use crate::health::result::{CheckResult, Verdict, TRANSPORT_FAILURE_STATUS};
use crate::health::transport::{describe_probe_error, HttpTransport};
use crate::notification::Alert;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 网关存活时返回的状态码
pub const EXPECTED_GATEWAY_STATUS: u16 = 400;

/// 网关存活探测器
pub struct GatewayChecker {
    /// HTTP传输
    transport: Arc<dyn HttpTransport>,
}

impl GatewayChecker {
    /// 创建新的网关探测器
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// 判断状态码是否表示存活
    pub fn is_alive(http_status: u16) -> bool {
        http_status == EXPECTED_GATEWAY_STATUS
    }

    /// 根据状态码给出判定
    pub fn evaluate(
        endpoint: &Endpoint,
        http_status: u16,
        response_time: Duration,
        error: Option<String>,
    ) -> Verdict {
        let mut result = CheckResult::new(endpoint, http_status).with_response_time(response_time);
        if let Some(error) = error {
            result = result.with_error(error);
        }

        if Self::is_alive(http_status) {
            Verdict::healthy(result)
        } else {
            Verdict::violation(result, Alert::gateway_down(endpoint, http_status))
        }
    }
}

#[async_trait]
impl EndpointChecker for GatewayChecker {
    fn kind(&self) -> EndpointKind {
        EndpointKind::Gateway
    }

    async fn check(&self, endpoint: &Endpoint) -> Verdict {
        let start_time = Instant::now();
        let reply = self.transport.get(&endpoint.url).await;
        let response_time = start_time.elapsed();

        match reply {
            Ok(reply) => Self::evaluate(endpoint, reply.status, response_time, None),
            Err(e) => Self::evaluate(
                endpoint,
                TRANSPORT_FAILURE_STATUS,
                response_time,
                Some(describe_probe_error(&e)),
            ),
        }
    }
}
