//! 命令行接口模块
//!
//! 提供命令行参数解析和命令执行功能

pub mod args;
pub mod commands;

// 重新导出主要类型
pub use args::{Args, Commands};
pub use commands::execute_command;
