//! 通知模块
//!
//! 提供告警模型、告警出口和飞书通知功能

pub mod alert;
pub mod feishu;
pub mod sender;

// 重新导出主要类型
pub use alert::{Alert, AlertSink, DeliverySummary, Severity};
pub use feishu::FeishuPublisher;
pub use sender::{NoOpSender, NotificationPublisher};
