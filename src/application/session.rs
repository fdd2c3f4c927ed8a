//! Session Expiry Handler - 会话失效后的登出与跳转
//!
//! 请求信封只负责识别 401，登出和导航的决定由组合根注入的这个处理器完成

use std::sync::Arc;

use crate::application::ports::{AuthSessionPort, NavigatorPort, SessionExpiryListener};

/// 会话失效处理器
pub struct SessionExpiryHandler {
    auth: Arc<dyn AuthSessionPort>,
    navigator: Arc<dyn NavigatorPort>,
}

impl SessionExpiryHandler {
    pub fn new(auth: Arc<dyn AuthSessionPort>, navigator: Arc<dyn NavigatorPort>) -> Self {
        Self { auth, navigator }
    }
}

impl SessionExpiryListener for SessionExpiryHandler {
    fn on_session_expired(&self) {
        tracing::warn!("Session expired, logging out");
        self.auth.logout();
        self.navigator.to_login();
    }
}
