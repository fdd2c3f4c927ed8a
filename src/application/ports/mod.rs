//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod auth_session;
mod backend_api;
mod detection_cache;
mod http_transport;

pub use auth_session::{
    AuthSessionPort, CredentialSourcePort, NavigatorPort, SessionCredential, SessionExpiryListener,
};
pub use backend_api::{DetectionApiPort, GenerationApiPort, RunDetectionRequest};
pub use detection_cache::DetectionCachePort;
pub use http_transport::{HttpTransportPort, TransportRequest, TransportResponse};
