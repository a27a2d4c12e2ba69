//! 核心模块
//!
//! 包含运行编排和调用结果封装

pub mod orchestrator;
pub mod response;

// 重新导出主要类型
pub use orchestrator::{resolve_channel, Orchestrator, RunReport};
pub use response::InvocationResponse;
