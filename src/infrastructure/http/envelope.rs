//! Request Envelope - 认证请求信封
//!
//! 请求头从 `Content-Type: application/json` 开始，叠加调用方的头，
//! 已认证时最后设置 `Authorization: Bearer <token>`。
//!
//! 结果分类:
//! - 401 → SessionExpired（不解析响应体，先通知监听器）
//! - 其他非 2xx → RequestFailed，message 取 `detail` 或通用信息
//! - 204 → 成功，无返回值
//! - 其他 → 成功，返回解析后的 JSON

use http::header::{HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::application::error::{generic_failure_message, ClientError};
use crate::application::ports::{
    CredentialSourcePort, HttpTransportPort, SessionExpiryListener, TransportRequest,
};

/// 经过信封发送的请求
#[derive(Debug, Clone)]
pub struct EnvelopeRequest {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl EnvelopeRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// 设置 JSON 请求体
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ClientError> {
        let bytes =
            serde_json::to_vec(body).map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
        self.body = Some(bytes);
        Ok(self)
    }

    /// 追加调用方请求头（覆盖同名默认头）
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// 对响应进行分类
///
/// 401 必须在任何响应体解析之前判定；错误体解析失败不会抛出，只会退化为通用信息
pub fn classify_response(status: u16, body: &[u8]) -> Result<Option<Value>, ClientError> {
    if status == 401 {
        return Err(ClientError::SessionExpired);
    }

    if !(200..300).contains(&status) {
        let message = extract_detail(body).unwrap_or_else(|| generic_failure_message(status));
        return Err(ClientError::RequestFailed { status, message });
    }

    if status == 204 {
        return Ok(None);
    }

    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ClientError::decode(status, e.to_string()))
}

/// 提取错误体中的 `detail`，非字符串 detail（如校验错误列表）按 JSON 文本返回
fn extract_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// 认证请求信封
///
/// 网络调用的唯一出口，本身无状态；凭证只读
pub struct RequestEnvelope {
    base_url: String,
    transport: Arc<dyn HttpTransportPort>,
    credentials: Arc<dyn CredentialSourcePort>,
    expiry_listener: Option<Arc<dyn SessionExpiryListener>>,
}

impl RequestEnvelope {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransportPort>,
        credentials: Arc<dyn CredentialSourcePort>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            credentials,
            expiry_listener: None,
        }
    }

    /// 注册会话失效监听器（由组合根提供）
    pub fn with_expiry_listener(mut self, listener: Arc<dyn SessionExpiryListener>) -> Self {
        self.expiry_listener = Some(listener);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn build_headers(&self, extra: HeaderMap) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(extra);

        if let Some(token) = self.credentials.current().bearer() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ClientError::InvalidRequest(format!("Invalid bearer token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    async fn dispatch(&self, request: EnvelopeRequest) -> Result<(u16, Option<Value>), ClientError> {
        let EnvelopeRequest {
            method,
            path,
            headers,
            body,
        } = request;
        let url = self.url(&path);
        let headers = self.build_headers(headers)?;

        tracing::debug!(method = %method, url = %url, "Sending request");

        let response = self
            .transport
            .execute(TransportRequest {
                method: method.clone(),
                url: url.clone(),
                headers,
                body,
            })
            .await?;

        let status = response.status;
        match classify_response(status, &response.body) {
            Ok(value) => Ok((status, value)),
            Err(ClientError::SessionExpired) => {
                tracing::warn!(method = %method, url = %url, "Session expired");
                if let Some(listener) = &self.expiry_listener {
                    listener.on_session_expired();
                }
                Err(ClientError::SessionExpired)
            }
            Err(err) => {
                tracing::warn!(
                    method = %method,
                    url = %url,
                    status = status,
                    error = %err,
                    "Request failed"
                );
                Err(err)
            }
        }
    }

    /// 发送请求，返回原始 JSON（204 时为 None）
    pub async fn send(&self, request: EnvelopeRequest) -> Result<Option<Value>, ClientError> {
        self.dispatch(request).await.map(|(_, value)| value)
    }

    /// 发送请求并解码为指定类型
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: EnvelopeRequest,
    ) -> Result<T, ClientError> {
        let (status, value) = self.dispatch(request).await?;
        let value = value.ok_or_else(|| ClientError::decode(status, "empty response body"))?;
        serde_json::from_value(value).map_err(|e| ClientError::decode(status, e.to_string()))
    }

    /// 发送请求并忽略返回值
    pub async fn send_unit(&self, request: EnvelopeRequest) -> Result<(), ClientError> {
        self.dispatch(request).await.map(|_| ())
    }
}
