//! HTTP Transport Port - 底层 HTTP 传输抽象
//!
//! 只负责把已构建好的请求发出去并取回状态码和响应体，
//! 认证头注入和结果分类由请求信封完成

use async_trait::async_trait;
use http::{HeaderMap, Method};

use crate::application::error::ClientError;

/// 已构建完成的请求
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// 原始响应
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// HTTP Transport Port
#[async_trait]
pub trait HttpTransportPort: Send + Sync {
    /// 发送请求
    ///
    /// 只有传输层失败才返回 `ClientError::NetworkFailure`，任何 HTTP 状态码都算成功返回
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, ClientError>;
}
