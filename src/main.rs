//! Gateway Vitals 主程序入口
//!
//! 实时网关与发射器健康探测工具

use anyhow::{Context, Result};
use clap::Parser;
use gateway_vitals::cli::{execute_command, Args};
use gateway_vitals::logging::{LogConfig, LoggingSystem};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 初始化日志系统
    let log_config = LogConfig {
        level: args.log_level.clone().into(),
        json_format: args.json_logs,
        ansi: !args.json_logs,
    };
    LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    info!("Gateway Vitals v{} 启动", gateway_vitals::VERSION);

    // 执行命令
    if let Err(e) = execute_command(&args).await {
        error!("命令执行失败: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
