//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use crate::config::ProbeSettings;
use clap::{Parser, Subcommand, ValueEnum};
use std::time::Duration;

/// Gateway Vitals - 实时网关与发射器健康探测工具
#[derive(Parser, Debug, Clone)]
#[command(
    name = "gateway-vitals",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        help = "日志级别",
        env = "VITALS_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// 是否输出JSON格式日志
    #[arg(long, help = "输出JSON格式日志", env = "VITALS_JSON_LOGS")]
    pub json_logs: bool,

    /// 单次请求超时时间（秒）
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        default_value_t = crate::config::types::default_timeout(),
        help = "单次请求超时时间（秒）",
        env = "VITALS_REQUEST_TIMEOUT"
    )]
    pub timeout: u64,

    /// 飞书签名密钥
    #[arg(
        long,
        value_name = "SECRET",
        help = "飞书机器人签名密钥",
        env = "ALERT_CHANNEL_SECRET",
        hide_env_values = true
    )]
    pub channel_secret: Option<String>,

    /// 演练模式：告警只写日志不发送
    #[arg(long, help = "告警只写日志，不发送通知")]
    pub dry_run: bool,

    /// 子命令，默认为 run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Args {
    /// 根据命令行参数构建运行参数
    pub fn settings(&self) -> ProbeSettings {
        ProbeSettings::default()
            .with_request_timeout(Duration::from_secs(self.timeout))
            .with_channel_secret(self.channel_secret.clone())
    }

    /// 实际执行的子命令
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

/// 输出格式
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// 文本格式
    Text,
    /// JSON格式
    Json,
}

/// 子命令定义
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// 执行一次完整探测并输出调用结果
    Run,

    /// 列出解析出的端点
    List {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },

    /// 向通知渠道发送测试消息
    TestNotification,
}
