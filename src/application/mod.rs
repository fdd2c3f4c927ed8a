//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（HttpTransport、Credential、DetectionCache、Backend API）
//! - detection: 检测结果存储与两阶段状态迁移
//! - session: 会话失效处理
//! - error: 客户端错误定义

pub mod detection;
pub mod error;
pub mod ports;
pub mod session;

pub use detection::{DetectionStore, RunTicket};
pub use error::{generic_failure_message, ClientError};
pub use ports::{
    AuthSessionPort, CredentialSourcePort, DetectionApiPort, DetectionCachePort,
    GenerationApiPort, HttpTransportPort, NavigatorPort, RunDetectionRequest, SessionCredential,
    SessionExpiryListener, TransportRequest, TransportResponse,
};
pub use session::SessionExpiryHandler;
