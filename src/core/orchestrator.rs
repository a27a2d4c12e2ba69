//! 运行编排器
//!
//! 一次运行：解析通知渠道 → 创建通知客户端 → 先探测发射器再探测网关 → 汇总运行日志

use crate::config::{ConfigSource, EndpointRegistry, KEY_ALERT_CHANNEL};
use crate::error::{ConfigError, NotificationError, Result, VitalsError};
use crate::health::{CheckResult, EmitterChecker, EndpointChecker, GatewayChecker, HttpTransport};
use crate::logging::{check_result_log, delivery_log};
use crate::notification::{AlertSink, DeliverySummary, NotificationPublisher};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

/// 一次运行的报告
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// 运行ID
    pub run_id: Uuid,
    /// 开始时间
    pub started_at: DateTime<Utc>,
    /// 结束时间
    pub finished_at: DateTime<Utc>,
    /// 按探测顺序排列的结果
    pub log: Vec<CheckResult>,
    /// 告警投递统计
    pub delivery: DeliverySummary,
}

impl RunReport {
    /// 违规端点数量
    pub fn violations(&self) -> usize {
        self.log.iter().filter(|r| !r.outcome.is_healthy()).count()
    }

    /// 健康端点数量
    pub fn healthy(&self) -> usize {
        self.log.len() - self.violations()
    }
}

/// 从配置来源解析通知渠道标识，缺失或为空时返回配置错误
pub fn resolve_channel(source: &dyn ConfigSource) -> Result<String> {
    source
        .get(KEY_ALERT_CHANNEL)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            VitalsError::from(ConfigError::MissingChannel {
                key: KEY_ALERT_CHANNEL.to_string(),
            })
        })
}

/// 运行编排器
pub struct Orchestrator {
    /// 配置来源
    source: Arc<dyn ConfigSource>,
    /// 按探测顺序排列的探测器
    checkers: Vec<Arc<dyn EndpointChecker>>,
}

impl Orchestrator {
    /// 创建编排器，发射器先于网关探测
    pub fn new(source: Arc<dyn ConfigSource>, transport: Arc<dyn HttpTransport>) -> Self {
        let checkers: Vec<Arc<dyn EndpointChecker>> = vec![
            Arc::new(EmitterChecker::new(Arc::clone(&transport))),
            Arc::new(GatewayChecker::new(transport)),
        ];
        Self::with_checkers(source, checkers)
    }

    /// 使用自定义探测器序列创建编排器
    pub fn with_checkers(
        source: Arc<dyn ConfigSource>,
        checkers: Vec<Arc<dyn EndpointChecker>>,
    ) -> Self {
        Self { source, checkers }
    }

    /// 端点注册表
    pub fn registry(&self) -> EndpointRegistry {
        EndpointRegistry::new(Arc::clone(&self.source))
    }

    /// 解析通知渠道标识
    pub fn resolve_channel(&self) -> Result<String> {
        resolve_channel(self.source.as_ref())
    }

    /// 执行一次完整运行
    ///
    /// # 参数
    /// * `connect` - 创建通知客户端，在通知渠道解析成功后调用
    ///
    /// # 返回
    /// * `Result<RunReport>` - 只有两类配置错误会使运行失败，单个端点的问题记录在报告中
    pub async fn run<F>(&self, connect: F) -> Result<RunReport>
    where
        F: FnOnce() -> std::result::Result<Arc<dyn NotificationPublisher>, NotificationError>,
    {
        let run_id = Uuid::new_v4();
        let span = info_span!("probe_run", %run_id);

        async move {
            let started_at = Utc::now();

            let channel_id = self.resolve_channel().inspect_err(|e| error!("{}", e))?;
            let publisher = connect().map_err(|e| {
                error!("创建通知客户端失败: {}", e);
                VitalsError::DependencyUnavailable(e)
            })?;

            let mut sink = AlertSink::new(publisher, channel_id);
            let registry = self.registry();
            let mut log = Vec::new();

            for checker in &self.checkers {
                let endpoints = registry.resolve_kind(checker.kind());
                info!("开始探测 {} 个{}端点", endpoints.len(), checker.kind());

                for endpoint in endpoints {
                    let (result, alert) = checker.check(&endpoint).await.into_parts();
                    check_result_log(&result);

                    if let Some(alert) = alert {
                        if let Err(e) = sink.publish(&alert) {
                            debug!("告警未派发: {}", e);
                        }
                    }
                    log.push(result);
                }
            }

            let delivery = sink.flush().await;
            delivery_log(&delivery);

            let report = RunReport {
                run_id,
                started_at,
                finished_at: Utc::now(),
                log,
                delivery,
            };
            info!(
                "运行完成: 共 {} 个端点, {} 个正常, {} 个异常",
                report.log.len(),
                report.healthy(),
                report.violations()
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }
}
