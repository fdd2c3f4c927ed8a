//! 应用层错误定义
//!
//! 所有经过请求信封的操作共用的错误类型

use thiserror::Error;

/// 非 2xx 且无 detail 时的通用错误信息
pub fn generic_failure_message(status: u16) -> String {
    format!("request failed, status={}", status)
}

/// 客户端错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// 401：会话失效，当前调用必然失败
    #[error("session expired, please log in again")]
    SessionExpired,

    /// 非 2xx 响应，message 取自服务端 detail 或通用信息
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// 传输层错误（DNS、连接、读取响应体等），原样透传
    #[error("{0}")]
    NetworkFailure(String),

    /// 服务端返回的载荷无法解码，对外表现为通用请求失败
    #[error("request failed, status={status}")]
    DecodeFailure { status: u16, reason: String },

    /// 请求体无法序列化
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// 创建 RequestFailed 错误
    pub fn request_failed(status: u16, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            message: message.into(),
        }
    }

    /// 创建 DecodeFailure 错误
    pub fn decode(status: u16, reason: impl Into<String>) -> Self {
        Self::DecodeFailure {
            status,
            reason: reason.into(),
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// 调用方是否可以重试
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::SessionExpired | Self::InvalidRequest(_))
    }

    /// 关联的 HTTP 状态码（如果有）
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SessionExpired => Some(401),
            Self::RequestFailed { status, .. } | Self::DecodeFailure { status, .. } => {
                Some(*status)
            }
            Self::NetworkFailure(_) | Self::InvalidRequest(_) => None,
        }
    }
}
