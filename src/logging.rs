//! 日志系统模块
//!
//! 提供结构化日志配置和管理功能

use crate::health::CheckResult;
use crate::notification::DeliverySummary;
use log::LevelFilter;
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter, Layer};

/// 全局日志初始化状态
#[derive(Debug, Default)]
struct GlobalLoggingState {
    /// 是否已初始化
    initialized: bool,
    /// 当前配置
    current_config: Option<LogConfig>,
}

/// 全局日志状态管理器
static GLOBAL_LOGGING_STATE: OnceLock<Mutex<GlobalLoggingState>> = OnceLock::new();

/// 日志配置结构
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// 日志级别
    pub level: LevelFilter,
    /// 是否使用JSON格式
    pub json_format: bool,
    /// 是否输出彩色日志
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            json_format: false,
            ansi: true,
        }
    }
}

/// 日志系统
pub struct LoggingSystem;

impl LoggingSystem {
    /// 初始化日志系统，重复调用不会重复初始化
    ///
    /// 日志输出到标准错误，标准输出留给运行结果
    pub fn setup_logging(config: LogConfig) -> anyhow::Result<()> {
        let state_mutex = GLOBAL_LOGGING_STATE.get_or_init(|| Mutex::new(GlobalLoggingState::default()));
        let mut state = state_mutex
            .lock()
            .map_err(|_| anyhow::anyhow!("日志状态锁已损坏"))?;

        if state.initialized {
            return Ok(());
        }

        Self::init_tracing_subscriber(&config)?;
        Self::init_log_tracer()?;

        state.initialized = true;
        state.current_config = Some(config);
        Ok(())
    }

    /// 将 log 宏的输出桥接到 tracing
    fn init_log_tracer() -> anyhow::Result<()> {
        match tracing_log::LogTracer::init() {
            Ok(()) => Ok(()),
            // 已经设置过全局logger
            Err(e) if e.to_string().contains("already") => Ok(()),
            Err(e) => Err(anyhow::anyhow!("LogTracer初始化失败: {}", e)),
        }
    }

    /// 初始化 tracing subscriber
    fn init_tracing_subscriber(config: &LogConfig) -> anyhow::Result<()> {
        let env_filter = EnvFilter::from_default_env()
            .add_directive(Self::convert_level_to_directive(config.level));

        let fmt_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_timer(fmt::time::ChronoUtc::rfc_3339())
                .with_current_span(true)
                .boxed()
        } else {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_timer(fmt::time::ChronoUtc::rfc_3339())
                .with_ansi(config.ansi)
                .with_target(false)
                .boxed()
        };

        match registry().with(env_filter).with(fmt_layer).try_init() {
            Ok(()) => {
                tracing::debug!("日志配置: {:?}", config);
                Ok(())
            }
            Err(e) => {
                let error_msg = e.to_string();
                if error_msg.contains("already") {
                    // 这是预期的错误，说明已经初始化过了
                    Ok(())
                } else {
                    Err(anyhow::anyhow!(
                        "tracing subscriber初始化失败: {}",
                        error_msg
                    ))
                }
            }
        }
    }

    /// 将 log::LevelFilter 转换为 tracing 的指令
    fn convert_level_to_directive(level: LevelFilter) -> tracing_subscriber::filter::Directive {
        use tracing_subscriber::filter::{Directive, LevelFilter as TracingLevel};
        let tracing_level = match level {
            LevelFilter::Off => TracingLevel::OFF,
            LevelFilter::Error => TracingLevel::ERROR,
            LevelFilter::Warn => TracingLevel::WARN,
            LevelFilter::Info => TracingLevel::INFO,
            LevelFilter::Debug => TracingLevel::DEBUG,
            LevelFilter::Trace => TracingLevel::TRACE,
        };
        Directive::from(tracing_level)
    }

    /// 检查日志系统是否已初始化
    pub fn is_initialized() -> bool {
        GLOBAL_LOGGING_STATE
            .get()
            .and_then(|m| m.lock().ok().map(|s| s.initialized))
            .unwrap_or(false)
    }

    /// 获取当前日志配置（如果已初始化）
    pub fn current_config() -> Option<LogConfig> {
        GLOBAL_LOGGING_STATE
            .get()
            .and_then(|m| m.lock().ok().and_then(|s| s.current_config.clone()))
    }
}

/// 记录单个端点的探测结果
pub fn check_result_log(result: &CheckResult) {
    if result.outcome.is_healthy() {
        tracing::info!(
            kind = %result.kind,
            name = %result.name,
            url = %result.url,
            http_status = result.http_status,
            response_time_ms = result.response_time_ms(),
            "端点状态: {}",
            result.outcome
        );
    } else {
        tracing::warn!(
            kind = %result.kind,
            name = %result.name,
            url = %result.url,
            http_status = result.http_status,
            response_time_ms = result.response_time_ms(),
            error = result.error.as_deref().unwrap_or(""),
            "端点状态: {}",
            result.outcome
        );
    }
}

/// 记录告警投递统计
pub fn delivery_log(summary: &DeliverySummary) {
    if summary.failed > 0 {
        tracing::warn!(
            dispatched = summary.dispatched,
            delivered = summary.delivered,
            failed = summary.failed,
            "部分告警投递失败"
        );
    } else {
        tracing::info!(
            dispatched = summary.dispatched,
            delivered = summary.delivered,
            "告警投递完成"
        );
    }
}
