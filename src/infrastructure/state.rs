//! Desk State - 会话级组合
//!
//! 持有认证会话、两个资源客户端和检测结果存储；由组合根创建并按引用传递给使用方

use std::sync::Arc;

use crate::application::error::ClientError;
use crate::application::ports::{
    GenerationApiPort, HttpTransportPort, NavigatorPort, SessionExpiryListener,
};
use crate::application::{DetectionStore, SessionExpiryHandler};
use crate::config::AppConfig;
use crate::infrastructure::clients::{NovelClient, VectorClient};
use crate::infrastructure::http::{ReqwestTransport, ReqwestTransportConfig, RequestEnvelope};
use crate::infrastructure::memory::{InMemoryAuthSession, InMemoryDetectionCache};

/// 会话级状态
pub struct DeskState {
    pub auth: Arc<InMemoryAuthSession>,
    pub novels: Arc<NovelClient>,
    pub vectors: Arc<VectorClient>,
    pub generation: Arc<dyn GenerationApiPort>,
    pub detections: DetectionStore,
}

impl DeskState {
    /// 两个客户端共用同一个传输、凭证和会话失效处理器
    pub fn new(
        generation_base_url: String,
        vector_base_url: String,
        transport: Arc<dyn HttpTransportPort>,
        auth: Arc<InMemoryAuthSession>,
        navigator: Arc<dyn NavigatorPort>,
    ) -> Self {
        let expiry: Arc<dyn SessionExpiryListener> =
            Arc::new(SessionExpiryHandler::new(auth.clone(), navigator));
        let envelope = |base_url: String| {
            RequestEnvelope::new(base_url, transport.clone(), auth.clone())
                .with_expiry_listener(expiry.clone())
        };

        let novels = Arc::new(NovelClient::new(envelope(generation_base_url)));
        let vectors = Arc::new(VectorClient::new(envelope(vector_base_url)));
        let detections = DetectionStore::new(InMemoryDetectionCache::new().arc(), novels.clone());

        Self {
            auth,
            generation: novels.clone(),
            novels,
            vectors,
            detections,
        }
    }

    /// 按配置创建（reqwest 传输 + 内存认证会话）
    pub fn from_config(
        config: &AppConfig,
        navigator: Arc<dyn NavigatorPort>,
    ) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(
            ReqwestTransportConfig::default().with_connect_timeout(config.api.connect_timeout_secs),
        )?;
        let auth = InMemoryAuthSession::new(config.auth.token.clone()).arc();

        Ok(Self::new(
            config.api.generation_base_url(),
            config.api.vector_base_url(),
            Arc::new(transport),
            auth,
            navigator,
        ))
    }
}
