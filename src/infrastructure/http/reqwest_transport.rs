//! Reqwest Transport - 基于 reqwest 的 HTTP 传输
//!
//! 只约束连接阶段的超时；请求本身不设客户端超时，检测超时由服务端控制

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::application::error::ClientError;
use crate::application::ports::{HttpTransportPort, TransportRequest, TransportResponse};

/// Reqwest 传输配置
#[derive(Debug, Clone)]
pub struct ReqwestTransportConfig {
    /// 连接超时时间（秒）
    pub connect_timeout_secs: u64,
}

impl Default for ReqwestTransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
        }
    }
}

impl ReqwestTransportConfig {
    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }
}

/// Reqwest HTTP 传输
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: ReqwestTransportConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ClientError::NetworkFailure(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransportPort for ReqwestTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, ClientError> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() {
                ClientError::NetworkFailure(format!("Cannot connect to backend: {}", e))
            } else {
                ClientError::NetworkFailure(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::NetworkFailure(format!("Failed to read response: {}", e)))?
            .to_vec();

        tracing::debug!(
            url = %request.url,
            status = status,
            body_size = body.len(),
            "Response received"
        );

        Ok(TransportResponse { status, body })
    }
}
