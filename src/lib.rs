//! Gateway Vitals - 实时网关与发射器健康探测工具
//!
//! 这是一个按需运行的无状态健康探测工具，支持：
//! - 网关存活探测（裸GET必须返回400）
//! - 发射器发布探测（POST测试消息必须返回 "published"）
//! - 违规时通过飞书通知告警
//! - 结构化日志记录

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod health;
pub mod logging;
pub mod notification;

// 重新导出主要类型
pub use self::config::{ConfigSource, Endpoint, EndpointKind, EndpointRegistry, ProbeSettings};
pub use self::core::{InvocationResponse, Orchestrator, RunReport};
pub use self::error::VitalsError;
pub use self::health::{CheckOutcome, CheckResult};
pub use self::notification::{Alert, Severity};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
