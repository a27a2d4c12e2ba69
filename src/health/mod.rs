//! 健康检测模块
//!
//! 提供网关和发射器两类端点的探测与判定

pub mod checker;
pub mod emitter;
pub mod gateway;
pub mod result;
pub mod transport;

// 重新导出主要类型
pub use checker::EndpointChecker;
pub use emitter::{EmitterChecker, EmitterPayload};
pub use gateway::GatewayChecker;
pub use result::{CheckOutcome, CheckResult, Verdict, TRANSPORT_FAILURE_STATUS};
pub use transport::{HttpReply, HttpTransport, ReqwestTransport};
