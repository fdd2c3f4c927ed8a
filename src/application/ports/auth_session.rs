//! Auth Session Ports - 会话凭证与失效处理
//!
//! 凭证由外部认证上下文持有，请求信封只读取，不修改

/// 会话凭证快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCredential {
    pub token: Option<String>,
    pub authenticated: bool,
}

impl SessionCredential {
    pub fn authenticated(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            authenticated: true,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// 仅当已认证且 token 非空时返回 bearer token
    pub fn bearer(&self) -> Option<&str> {
        if !self.authenticated {
            return None;
        }
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// 凭证来源（每次请求读取一次）
pub trait CredentialSourcePort: Send + Sync {
    fn current(&self) -> SessionCredential;
}

/// 可登出的认证会话
pub trait AuthSessionPort: CredentialSourcePort {
    /// 使本地会话失效
    fn logout(&self);
}

/// 导航到登录界面
pub trait NavigatorPort: Send + Sync {
    fn to_login(&self);
}

/// 会话失效监听器
///
/// 请求信封在收到 401 且尚未解析响应体时调用，由组合根决定如何处理
pub trait SessionExpiryListener: Send + Sync {
    fn on_session_expired(&self);
}
