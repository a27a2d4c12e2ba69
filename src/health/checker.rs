//! 端点探测器接口

use crate::config::{Endpoint, EndpointKind};
use crate::health::result::Verdict;
use async_trait::async_trait;

/// 端点探测器trait，定义检测接口
///
/// 探测过程中的网络错误不会向上传播，而是记录在判定结果中。
#[async_trait]
pub trait EndpointChecker: Send + Sync {
    /// 该探测器负责的端点类别
    fn kind(&self) -> EndpointKind;

    /// 探测单个端点并给出判定
    ///
    /// # 参数
    /// * `endpoint` - 待探测端点
    ///
    /// # 返回
    /// * `Verdict` - 探测结果及违规时的告警
    async fn check(&self, endpoint: &Endpoint) -> Verdict;
}
