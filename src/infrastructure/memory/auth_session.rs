//! In-Memory Auth Session Implementation

use std::sync::{Arc, RwLock};

use crate::application::ports::{AuthSessionPort, CredentialSourcePort, SessionCredential};

/// 内存认证会话
///
/// 凭证的持久化不在本 crate 范围内，启动时由组合根注入 token
pub struct InMemoryAuthSession {
    credential: RwLock<SessionCredential>,
}

impl InMemoryAuthSession {
    pub fn new(token: Option<String>) -> Self {
        let credential = match token.filter(|t| !t.is_empty()) {
            Some(token) => SessionCredential::authenticated(token),
            None => SessionCredential::anonymous(),
        };
        Self {
            credential: RwLock::new(credential),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().bearer().is_some()
    }
}

impl CredentialSourcePort for InMemoryAuthSession {
    fn current(&self) -> SessionCredential {
        self.credential
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl AuthSessionPort for InMemoryAuthSession {
    fn logout(&self) {
        let mut credential = self.credential.write().unwrap_or_else(|e| e.into_inner());
        *credential = SessionCredential::anonymous();
        tracing::info!("Session logged out");
    }
}
