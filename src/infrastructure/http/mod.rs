//! HTTP Layer - 认证请求信封与传输适配器
//!
//! 所有网络调用都经过 `RequestEnvelope`:
//! - 构建请求头并注入 bearer 凭证
//! - 分类 HTTP 结果（401 / 非 2xx / 204 / JSON）
//! - 401 时通知会话失效监听器

mod envelope;
mod reqwest_transport;

pub use envelope::{classify_response, EnvelopeRequest, RequestEnvelope};
pub use reqwest_transport::{ReqwestTransport, ReqwestTransportConfig};

#[cfg(test)]
pub(crate) use envelope::testing;
