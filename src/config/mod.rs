//! 配置管理模块
//!
//! 提供配置来源抽象、端点解析和运行参数

pub mod registry;
pub mod source;
pub mod types;

// 重新导出主要类型
pub use registry::{Endpoint, EndpointKind, EndpointRegistry, KEY_PREFIX_EMITTER, KEY_PREFIX_GATEWAY};
pub use source::{ConfigSource, EnvConfigSource, MapConfigSource};
pub use types::{ProbeSettings, KEY_ALERT_CHANNEL};
