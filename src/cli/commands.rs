//! CLI命令实现
//!
//! 实现各种CLI子命令的具体逻辑

use crate::cli::args::{Args, Commands, OutputFormat};
use crate::config::{ConfigSource, EndpointRegistry, EnvConfigSource, ProbeSettings};
use crate::core::{resolve_channel, InvocationResponse, Orchestrator};
use crate::error::NotificationError;
use crate::health::ReqwestTransport;
use crate::notification::{FeishuPublisher, NoOpSender, NotificationPublisher};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// CLI命令trait
#[async_trait]
pub trait Command {
    /// 执行命令
    async fn execute(&self, args: &Args) -> Result<()>;
}

/// 执行CLI命令
pub async fn execute_command(args: &Args) -> Result<()> {
    match args.command() {
        Commands::Run => RunCommand.execute(args).await,
        Commands::List { format } => ListCommand { format }.execute(args).await,
        Commands::TestNotification => TestNotificationCommand.execute(args).await,
    }
}

/// 根据运行参数创建通知发送器
fn connect_publisher(
    settings: &ProbeSettings,
    dry_run: bool,
) -> std::result::Result<Arc<dyn NotificationPublisher>, NotificationError> {
    if dry_run {
        return Ok(Arc::new(NoOpSender));
    }
    Ok(Arc::new(FeishuPublisher::new(settings)?))
}

/// 单次探测命令
pub struct RunCommand;

#[async_trait]
impl Command for RunCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let settings = args.settings();
        settings.validate()?;

        let transport = Arc::new(ReqwestTransport::new(&settings).context("创建HTTP客户端失败")?);
        let orchestrator = Orchestrator::new(Arc::new(EnvConfigSource), transport);

        let result = orchestrator
            .run(|| connect_publisher(&settings, args.dry_run))
            .await;
        let response = InvocationResponse::from_run(&result);

        println!("{}", serde_json::to_string_pretty(&response)?);

        if response.is_success() {
            Ok(())
        } else {
            Err(anyhow::anyhow!("运行失败: 状态码 {}", response.status_code))
        }
    }
}

/// 端点列表命令
pub struct ListCommand {
    /// 输出格式
    pub format: OutputFormat,
}

#[async_trait]
impl Command for ListCommand {
    async fn execute(&self, _args: &Args) -> Result<()> {
        let registry = EndpointRegistry::new(Arc::new(EnvConfigSource));
        let endpoints: Vec<_> = registry
            .emitters()
            .into_iter()
            .chain(registry.gateways())
            .collect();

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&endpoints)?);
            }
            OutputFormat::Text => {
                if endpoints.is_empty() {
                    println!("未配置任何端点");
                }
                for endpoint in &endpoints {
                    println!("{:<8} {:<24} {}", endpoint.kind, endpoint.name, endpoint.url);
                }
            }
        }

        Ok(())
    }
}

/// 测试通知命令
pub struct TestNotificationCommand;

#[async_trait]
impl Command for TestNotificationCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let settings = args.settings();
        settings.validate()?;

        let source: &dyn ConfigSource = &EnvConfigSource;
        let channel_id = resolve_channel(source)?;
        let publisher = connect_publisher(&settings, args.dry_run)?;

        publisher
            .test_connection(&channel_id)
            .await
            .context("测试通知发送失败")?;

        info!("测试通知发送成功");
        println!("测试通知发送成功");
        Ok(())
    }
}
